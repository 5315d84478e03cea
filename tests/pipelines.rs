use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use sign_bridge::external::{AssetStore, LogSynthesizer, MemoryAssetStore, ScriptedRecognizer};
use sign_bridge::{
    AppConfig, ClassificationSample, PlaybackStatus, SessionEvent, SignBridgeError, TextGenerator,
    TranslatorSession, VocabularyCatalog,
};

/// 固定回复，记录调用次数
struct MockGenerator {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

impl MockGenerator {
    fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply),
            calls: AtomicUsize::new(0),
        })
    }

    fn offline() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> sign_bridge::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Some(reply) => Ok(reply.to_string()),
            None => Err(SignBridgeError::TranslationUnavailable {
                reason: "connection refused".to_string(),
            }),
        }
    }
}

fn session(
    generator: Arc<MockGenerator>,
    phrases: &[&str],
) -> (TranslatorSession<ScriptedRecognizer>, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let store: Arc<dyn AssetStore> = Arc::new(MemoryAssetStore::new(["HUNGRY", "HELLO", "FRIEND"]));
    let session = TranslatorSession::new(
        &AppConfig::default(),
        Arc::new(VocabularyCatalog::default()),
        generator,
        store,
        ScriptedRecognizer::new(phrases.iter().copied()),
        Some(tx),
    )
    .unwrap();
    (session, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(start_paused = true)]
async fn test_signs_become_spoken_sentence() {
    let (mut session, mut rx) = session(MockGenerator::replying("unused"), &[]);
    let sign = session.sign_to_speech();
    let base = Instant::now();

    // 重复、低置信度和 neutral 都不进入句子
    let samples = [
        ("HELLO", 0.92, 0),
        ("HELLO", 0.95, 400),
        ("neutral", 0.99, 600),
        ("MY", 0.5, 800),
        ("MY", 0.81, 900),
        ("FRIEND", 0.88, 1500),
    ];
    for (label, confidence, ms) in samples {
        sign.push_sample(&ClassificationSample::new(label, confidence, base + Duration::from_millis(ms)));
    }
    assert_eq!(sign.current_text(), "HELLO MY FRIEND");

    let synth = LogSynthesizer::new();
    let spoken = sign.speak(&synth).await.unwrap();
    assert_eq!(spoken.as_deref(), Some("HELLO MY FRIEND"));
    assert_eq!(synth.spoken(), vec!["HELLO MY FRIEND".to_string()]);

    let accepted: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::TokenAccepted { text } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(accepted, ["HELLO", "MY", "FRIEND"]);
}

#[tokio::test(start_paused = true)]
async fn test_speech_is_translated_and_played() {
    let generator = MockGenerator::replying("HELLO FRIEND");
    let (session, mut rx) = session(Arc::clone(&generator), &["hi my friend"]);
    let speech = session.speech_to_sign();

    speech.start_listening().await.unwrap();
    let translation = speech.stop_listening().await.unwrap().unwrap();
    assert!(!translation.is_fallback());
    assert_eq!(translation.sequence.as_slice(), ["HELLO", "FRIEND"]);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(speech.playback_status(), PlaybackStatus::Playing);
    assert_eq!(speech.current_index(), Some(0));

    // 1.5 秒一步，循环播放
    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(speech.current_index(), Some(1));
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(speech.current_index(), Some(0));

    let tokens: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::PlaybackStep(step) => Some(step.token),
            _ => None,
        })
        .collect();
    assert_eq!(tokens, ["HELLO", "FRIEND", "HELLO"]);
}

#[tokio::test(start_paused = true)]
async fn test_offline_translation_falls_back_to_words() {
    let (session, mut rx) = session(MockGenerator::offline(), &["hungry now"]);
    let speech = session.speech_to_sign();

    speech.start_listening().await.unwrap();
    let translation = speech.stop_listening().await.unwrap().unwrap();
    assert!(translation.is_fallback());
    assert_eq!(translation.sequence.as_slice(), ["hungry", "now"]);

    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::TranslationDegraded { reason } if reason.contains("connection refused"))));

    // 原文单词仍按资源解析，"hungry" 命中 HUNGRY
    let first_step = events.iter().find_map(|e| match e {
        SessionEvent::PlaybackStep(step) => Some(step.clone()),
        _ => None,
    });
    let first_step = first_step.unwrap();
    assert_eq!(first_step.index, 0);
    assert!(!first_step.display.is_text());
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_both_directions() {
    let (mut session, mut rx) = session(MockGenerator::replying("HUNGRY"), &["I am hungry"]);
    let first_id = session.session_id().to_string();

    session
        .sign_to_speech()
        .push_sample(&ClassificationSample::new("HELLO", 0.9, Instant::now()));
    let speech = session.speech_to_sign();
    speech.start_listening().await.unwrap();
    speech.stop_listening().await.unwrap();
    assert_eq!(speech.playback_status(), PlaybackStatus::Playing);

    session.reset().await;
    session.reset().await;

    assert_ne!(session.session_id(), first_id);
    assert_eq!(session.sign_to_speech().current_text(), "");
    assert_eq!(speech.playback_status(), PlaybackStatus::Idle);
    assert!(!speech.is_listening().await);

    let resets = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::SessionReset))
        .count();
    assert_eq!(resets, 2);

    // 重置后不再有播放步
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_session_requires_speech_recognition() {
    let result = TranslatorSession::new(
        &AppConfig::default(),
        Arc::new(VocabularyCatalog::default()),
        MockGenerator::replying("HELLO"),
        Arc::new(MemoryAssetStore::default()),
        ScriptedRecognizer::unsupported(),
        None,
    );
    assert!(matches!(
        result,
        Err(SignBridgeError::UnsupportedEnvironment { .. })
    ));
}
