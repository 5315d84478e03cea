//! 手语 → 语音管线
//!
//! 分类器按固定频率采样，去抖后组装成句子，按需朗读

use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::debounce::{ClassificationSample, DebounceConfig, SampleDebouncer, Token};
use super::event::{Emitter, EventSender, SessionEvent};
use super::refiner::SentenceRefiner;
use super::sentence::SentenceAssembler;
use crate::ai::client::TextGenerator;
use crate::config::SessionConfig;
use crate::error::{Result, SignBridgeError};
use crate::external::classifier::{top_prediction, FrameClassifier};
use crate::external::speech::SpeechSynthesizer;

struct SignState {
    debouncer: SampleDebouncer,
    sentence: SentenceAssembler,
    /// 当前停顿是否已经通知过
    pause_notified: bool,
    /// 每次启动/重置递增，旧采样循环的结果据此丢弃
    generation: u64,
}

impl SignState {
    /// 处理一个样本，接受时追加到句子并返回 (词, 新句子)
    fn apply(&mut self, sample: &ClassificationSample) -> Option<(Token, String)> {
        let token = self.debouncer.accept(sample)?;
        self.sentence.append(token.clone());
        self.pause_notified = false;
        Some((token, self.sentence.current_text()))
    }

    /// 停顿超过 `pause` 时返回当前句子 (每次停顿只返回一次)
    fn check_pause(&mut self, now: Instant, pause: Duration) -> Option<String> {
        if self.pause_notified || self.sentence.is_empty() {
            return None;
        }
        let last = self.sentence.last_appended_at()?;
        if now.saturating_duration_since(last) < pause {
            return None;
        }
        self.pause_notified = true;
        Some(self.sentence.current_text())
    }
}

/// 手语 → 语音管线
pub struct SignToSpeech {
    config: SessionConfig,
    state: Arc<Mutex<SignState>>,
    task: Option<JoinHandle<()>>,
    emitter: Emitter,
    refiner: Option<SentenceRefiner<Arc<dyn TextGenerator>>>,
}

impl SignToSpeech {
    pub fn new(debounce: DebounceConfig, config: SessionConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(SignState {
                debouncer: SampleDebouncer::new(debounce),
                sentence: SentenceAssembler::new(),
                pause_notified: false,
                generation: 0,
            })),
            task: None,
            emitter: Emitter::default(),
            refiner: None,
        }
    }

    /// 设置事件通道
    pub fn with_event_channel(mut self, tx: EventSender) -> Self {
        self.emitter = Emitter::new(Some(tx));
        self
    }

    /// 朗读前润色句子 (需要 `refine_before_speaking`)
    pub fn with_refiner(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.refiner = Some(SentenceRefiner::new(generator));
        self
    }

    /// 启动采样循环；已有循环会先被停止，句子保留
    pub fn start<C>(&mut self, classifier: C)
    where
        C: FrameClassifier + 'static,
    {
        self.stop();

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.generation
        };

        info!("Sign recognition started at {} Hz", self.config.tick_hz);
        self.task = Some(tokio::spawn(run_classifier(
            classifier,
            Arc::clone(&self.state),
            self.emitter.clone(),
            self.config.tick_period(),
            self.config.pause_to_finalize,
            generation,
        )));
    }

    /// 停止采样循环，句子保留
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.state.lock().generation += 1;
            debug!("Sign recognition stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// 手动送入一个样本 (不经过采样循环)
    pub fn push_sample(&self, sample: &ClassificationSample) -> Option<Token> {
        let applied = self.state.lock().apply(sample);
        let (token, text) = applied?;
        emit_accepted(&self.emitter, &token, text);
        Some(token)
    }

    pub fn current_text(&self) -> String {
        self.state.lock().sentence.current_text()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.state.lock().sentence.tokens().to_vec()
    }

    /// 朗读当前句子，句子为空时什么也不做
    pub async fn speak(&self, synthesizer: &dyn SpeechSynthesizer) -> Result<Option<String>> {
        if !synthesizer.is_supported() {
            return Err(SignBridgeError::UnsupportedEnvironment {
                capability: "speech synthesis",
            });
        }

        let raw = self.current_text();
        if raw.is_empty() {
            return Ok(None);
        }

        let text = match &self.refiner {
            Some(refiner) if self.config.refine_before_speaking => refiner.refine(&raw).await,
            _ => raw,
        };

        synthesizer.cancel();
        self.emitter.emit(SessionEvent::SpeakingStarted { text: text.clone() });
        let result = synthesizer.speak(&text, self.config.speech_rate).await;
        self.emitter.emit(SessionEvent::SpeakingEnded);

        result.map_err(SignBridgeError::speech)?;
        Ok(Some(text))
    }

    /// 停止采样并清空句子，可重复调用
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        let mut state = self.state.lock();
        state.generation += 1;
        state.debouncer.reset();
        state.sentence.reset();
        state.pause_notified = false;
    }
}

impl Drop for SignToSpeech {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn emit_accepted(emitter: &Emitter, token: &Token, text: String) {
    debug!("Accepted {:?}", token.text);
    emitter.emit(SessionEvent::TokenAccepted {
        text: token.text.clone(),
    });
    emitter.emit(SessionEvent::SentenceUpdated { text });
}

async fn run_classifier<C: FrameClassifier>(
    mut classifier: C,
    state: Arc<Mutex<SignState>>,
    emitter: Emitter,
    period: Duration,
    pause: Duration,
    generation: u64,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let now = interval.tick().await;

        let predictions = match classifier.predict() {
            Ok(predictions) => predictions,
            Err(e) => {
                warn!("Classifier failed, skipping frame: {}", e);
                continue;
            }
        };

        let sample = top_prediction(&predictions)
            .map(|top| ClassificationSample::new(top.label.clone(), top.probability, now));

        // 在锁内检查并发出事件，reset 之后不会再有旧循环的事件
        let mut current = state.lock();
        if current.generation != generation {
            break;
        }

        if let Some(sample) = sample {
            emitter.emit(SessionEvent::LivePrediction {
                label: sample.label.clone(),
                confidence: sample.confidence,
            });
            if let Some((token, text)) = current.apply(&sample) {
                emit_accepted(&emitter, &token, text);
            }
        }
        if let Some(text) = current.check_pause(now, pause) {
            info!("Sentence paused: {:?}", text);
            emitter.emit(SessionEvent::SentencePaused { text });
        }
    }
}
