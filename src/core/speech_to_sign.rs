//! 语音 → 手语管线
//!
//! 语音识别结束后把转录翻译成手语词序列，交给播放器循环播放

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::event::{Emitter, EventSender, SessionEvent};
use super::playback::{PlaybackScheduler, PlaybackStatus};
use super::translator::{GlossTranslator, Translation, TranslationOutcome};
use crate::ai::client::TextGenerator;
use crate::error::{Result, SignBridgeError};
use crate::external::speech::SpeechRecognizer;

/// 语音 → 手语管线
///
/// 方法都只需要 `&self`，翻译等待期间可以从别处调用 `reset`
pub struct SpeechToSign<R> {
    recognizer: tokio::sync::Mutex<R>,
    translator: GlossTranslator<Arc<dyn TextGenerator>>,
    playback: Mutex<PlaybackScheduler>,
    /// 当前有效请求的编号，重置或新请求都会让旧结果失效
    generation: AtomicU64,
    emitter: Emitter,
}

impl<R: SpeechRecognizer> SpeechToSign<R> {
    /// 运行环境不支持语音识别时返回 `UnsupportedEnvironment`
    pub fn new(
        recognizer: R,
        translator: GlossTranslator<Arc<dyn TextGenerator>>,
        playback: PlaybackScheduler,
    ) -> Result<Self> {
        if !recognizer.is_supported() {
            return Err(SignBridgeError::UnsupportedEnvironment {
                capability: "speech recognition",
            });
        }

        Ok(Self {
            recognizer: tokio::sync::Mutex::new(recognizer),
            translator,
            playback: Mutex::new(playback),
            generation: AtomicU64::new(0),
            emitter: Emitter::default(),
        })
    }

    /// 设置事件通道
    pub fn with_event_channel(mut self, tx: EventSender) -> Self {
        self.emitter = Emitter::new(Some(tx));
        self
    }

    /// 清空上一轮结果，开始连续识别
    pub async fn start_listening(&self) -> Result<()> {
        self.invalidate();
        self.playback.lock().stop();

        let mut recognizer = self.recognizer.lock().await;
        recognizer.reset_transcript();
        recognizer.start(true).map_err(SignBridgeError::speech)?;
        info!("Listening");
        Ok(())
    }

    /// 停止识别并翻译转录；转录为空或结果已失效时返回 `None`
    pub async fn stop_listening(&self) -> Result<Option<Translation>> {
        // 在等待识别结束之前就占住请求编号，期间的 reset/start 会让它失效
        let request = self.next_request();

        let transcript = {
            let mut recognizer = self.recognizer.lock().await;
            recognizer.stop().await.map_err(SignBridgeError::speech)?;
            let transcript = recognizer.transcript().trim().to_string();
            recognizer.reset_transcript();
            transcript
        };

        if !self.is_current(request) {
            debug!("Session changed while stopping, dropping transcript");
            return Ok(None);
        }
        if transcript.is_empty() {
            debug!("Empty transcript, nothing to translate");
            return Ok(None);
        }

        self.emitter.emit(SessionEvent::TranscriptFinalized {
            text: transcript.clone(),
        });
        Ok(self.translate_for(request, &transcript).await)
    }

    /// 翻译一段文字 (语音或键入) 并播放
    pub async fn translate_phrase(&self, phrase: &str) -> Option<Translation> {
        let request = self.next_request();
        self.translate_for(request, phrase).await
    }

    async fn translate_for(&self, request: u64, phrase: &str) -> Option<Translation> {
        let translation = self.translator.translate(phrase).await;

        let mut playback = self.playback.lock();
        if !self.is_current(request) {
            debug!("Discarding stale translation for {:?}", phrase);
            return None;
        }

        if let TranslationOutcome::Fallback { reason } = &translation.outcome {
            self.emitter.emit(SessionEvent::TranslationDegraded {
                reason: reason.clone(),
            });
        }
        self.emitter.emit(SessionEvent::GlossReady {
            sequence: translation.sequence.clone(),
        });
        playback.load(translation.sequence.clone());

        Some(translation)
    }

    /// 渲染时资源加载失败
    pub fn report_load_failure(&self, index: usize) {
        self.playback.lock().report_load_failure(index);
    }

    pub fn playback_status(&self) -> PlaybackStatus {
        self.playback.lock().status()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playback.lock().current_index()
    }

    pub async fn is_listening(&self) -> bool {
        self.recognizer.lock().await.is_listening()
    }

    /// 中止识别、作废进行中的翻译、停止播放，可重复调用
    pub async fn reset(&self) {
        self.invalidate();
        self.playback.lock().stop();

        let mut recognizer = self.recognizer.lock().await;
        if recognizer.is_listening() {
            recognizer.abort();
        }
        recognizer.reset_transcript();
    }

    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn next_request(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, request: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == request
    }
}
