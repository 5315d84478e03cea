//! 手语 ↔ 语音翻译演示
//!
//! 用脚本化的分类器和语音识别跑通两条管线

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sign_bridge::external::{
    AssetStore, FsAssetStore, LogSynthesizer, ScriptedClassifier, ScriptedRecognizer,
};
use sign_bridge::utils::time::format_mmss_ms;
use sign_bridge::{
    AiClient, AppConfig, SessionEvent, StepDisplay, TextGenerator, TranslatorSession,
    VocabularyCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::from_env()?;
    info!("Config: {:?}", config);

    let catalog = match &config.assets.catalog_path {
        Some(path) => VocabularyCatalog::load(path)?,
        None => VocabularyCatalog::default(),
    };
    info!("Loaded {} glosses", catalog.len());
    let catalog = Arc::new(catalog);

    let generator: Arc<dyn TextGenerator> = Arc::new(AiClient::from_config(&config.translator)?);
    let store: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new(
        config.assets.asset_dir.clone(),
        config.assets.extension.clone(),
    ));

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    tokio::spawn(log_events(event_rx));

    let recognizer = ScriptedRecognizer::new(["I am hungry", "see you later my friend"]);
    let mut session = TranslatorSession::new(
        &config,
        catalog,
        generator,
        store,
        recognizer,
        Some(event_tx),
    )?;

    info!("=== 手语 → 语音 ===");
    demo_sign_to_speech(&mut session).await?;

    info!("=== 语音 → 手语 ===");
    demo_speech_to_sign(&session).await?;

    session.reset().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    Ok(())
}

async fn demo_sign_to_speech(session: &mut TranslatorSession<ScriptedRecognizer>) -> anyhow::Result<()> {
    // 30 Hz：HELLO 保持 1.5 秒 (冷却后会再次被接受)，然后 MY、FRIEND
    let mut frames = ScriptedClassifier::hold("HELLO", 0.92, 45);
    frames.extend(ScriptedClassifier::hold("neutral", 0.95, 10));
    frames.extend(ScriptedClassifier::hold("MY", 0.81, 20));
    frames.extend(ScriptedClassifier::hold("FRIEND", 0.6, 5));
    frames.extend(ScriptedClassifier::hold("FRIEND", 0.88, 20));

    let sign = session.sign_to_speech();
    sign.start(ScriptedClassifier::new(frames));
    tokio::time::sleep(Duration::from_secs(5)).await;
    sign.stop();

    info!("句子: {:?}", sign.current_text());

    let synthesizer = LogSynthesizer::new();
    match sign.speak(&synthesizer).await {
        Ok(Some(text)) => info!("已朗读: {}", text),
        Ok(None) => info!("没有可朗读的内容"),
        Err(e) => warn!("朗读失败: {}", e),
    }

    Ok(())
}

async fn demo_speech_to_sign(session: &TranslatorSession<ScriptedRecognizer>) -> anyhow::Result<()> {
    let speech = session.speech_to_sign();

    for _ in 0..2 {
        speech.start_listening().await?;
        tokio::time::sleep(Duration::from_millis(500)).await;

        match speech.stop_listening().await? {
            Some(translation) if translation.is_fallback() => {
                warn!("翻译服务不可用，直接显示原文: {:?}", translation.sequence.as_slice())
            }
            Some(translation) => info!("手语序列: {:?}", translation.sequence.as_slice()),
            None => info!("没有识别到内容"),
        }

        // 播放几轮
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    Ok(())
}

async fn log_events(mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    let start = Instant::now();

    while let Some(event) = rx.recv().await {
        let at = format_mmss_ms(start.elapsed());
        match event {
            SessionEvent::LivePrediction { label, confidence } => {
                debug!("[{}] live: {} ({:.2})", at, label, confidence);
            }
            SessionEvent::PlaybackStep(step) => match step.display {
                StepDisplay::Asset { path, .. } => {
                    info!("[{}] 播放 #{} {} -> {}", at, step.index, step.token, path.display());
                }
                StepDisplay::Text(text) => {
                    info!("[{}] 播放 #{} (文字) {}", at, step.index, text);
                }
            },
            other => info!("[{}] {:?}", at, other),
        }
    }
}
