//! 翻译会话
//!
//! 组合两条管线，同一时间只有一个活动会话

use std::sync::Arc;
use tracing::info;

use super::event::{Emitter, EventSender, SessionEvent};
use super::playback::PlaybackScheduler;
use super::sign_to_speech::SignToSpeech;
use super::speech_to_sign::SpeechToSign;
use super::translator::GlossTranslator;
use crate::ai::client::TextGenerator;
use crate::config::AppConfig;
use crate::error::Result;
use crate::external::assets::AssetStore;
use crate::external::speech::SpeechRecognizer;
use crate::vocab::{AssetResolver, VocabularyCatalog};

/// 翻译会话
pub struct TranslatorSession<R> {
    session_id: String,
    sign: SignToSpeech,
    speech: Arc<SpeechToSign<R>>,
    emitter: Emitter,
}

impl<R: SpeechRecognizer> TranslatorSession<R> {
    pub fn new(
        config: &AppConfig,
        catalog: Arc<VocabularyCatalog>,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn AssetStore>,
        recognizer: R,
        events: Option<EventSender>,
    ) -> Result<Self> {
        let resolver = Arc::new(AssetResolver::new(Arc::clone(&catalog)));

        let mut playback = PlaybackScheduler::new(config.playback.clone(), resolver, store);
        let mut sign = SignToSpeech::new(config.debounce.clone(), config.session.clone())
            .with_refiner(Arc::clone(&generator));
        let translator = GlossTranslator::new(generator, catalog);

        if let Some(tx) = &events {
            playback = playback.with_event_channel(tx.clone());
            sign = sign.with_event_channel(tx.clone());
        }

        let mut speech = SpeechToSign::new(recognizer, translator, playback)?;
        if let Some(tx) = &events {
            speech = speech.with_event_channel(tx.clone());
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        info!("Session {} ready", session_id);

        Ok(Self {
            session_id,
            sign,
            speech: Arc::new(speech),
            emitter: Emitter::new(events),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 手语 → 语音
    pub fn sign_to_speech(&mut self) -> &mut SignToSpeech {
        &mut self.sign
    }

    /// 语音 → 手语 (可在其他任务中共享)
    pub fn speech_to_sign(&self) -> Arc<SpeechToSign<R>> {
        Arc::clone(&self.speech)
    }

    /// 停止采样、作废进行中的翻译、停止播放，可重复调用
    pub async fn reset(&mut self) {
        self.sign.reset();
        self.speech.reset().await;

        self.session_id = uuid::Uuid::new_v4().to_string();
        info!("Session reset, new id {}", self.session_id);
        self.emitter.emit(SessionEvent::SessionReset);
    }
}
