//! 脚本化的外部组件
//!
//! 演示程序和测试用：按预设脚本产生分类结果、转录文本，语音输出写日志

use std::collections::VecDeque;
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use super::classifier::{FrameClassifier, Prediction};
use super::speech::{SpeechRecognizer, SpeechSynthesizer};

/// 按帧回放预设结果的分类器，脚本结束后一直返回 neutral
pub struct ScriptedClassifier {
    frames: VecDeque<Vec<Prediction>>,
}

impl ScriptedClassifier {
    pub fn new(frames: impl IntoIterator<Item = Vec<Prediction>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// 同一个手势保持 `count` 帧
    pub fn hold(label: &str, probability: f32, count: usize) -> Vec<Vec<Prediction>> {
        (0..count)
            .map(|_| vec![Prediction::new(label, probability), Prediction::new("neutral", 1.0 - probability)])
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameClassifier for ScriptedClassifier {
    fn predict(&mut self) -> anyhow::Result<Vec<Prediction>> {
        Ok(self
            .frames
            .pop_front()
            .unwrap_or_else(|| vec![Prediction::new("neutral", 1.0)]))
    }
}

/// 每次 stop 时"听到"下一句预设文本
pub struct ScriptedRecognizer {
    phrases: VecDeque<String>,
    transcript: String,
    listening: bool,
    supported: bool,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            transcript: String::new(),
            listening: false,
            supported: true,
        }
    }

    /// 模拟不支持语音识别的环境
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(Vec::<String>::new())
        }
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self, _continuous: bool) -> anyhow::Result<()> {
        if !self.supported {
            anyhow::bail!("speech recognition is not supported");
        }
        self.listening = true;
        Ok(())
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        if self.listening {
            if let Some(phrase) = self.phrases.pop_front() {
                self.transcript.push_str(&phrase);
            }
        }
        self.listening = false;
        Ok(())
    }

    fn abort(&mut self) {
        self.listening = false;
    }

    fn transcript(&self) -> String {
        self.transcript.clone()
    }

    fn reset_transcript(&mut self) {
        self.transcript.clear();
    }

    fn is_listening(&self) -> bool {
        self.listening
    }
}

/// 把要朗读的文本写到日志
#[derive(Clone)]
pub struct LogSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
    supported: bool,
}

impl LogSynthesizer {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            supported: true,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// 已朗读的文本
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

impl Default for LogSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for LogSynthesizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn cancel(&self) {}

    async fn speak(&self, text: &str, rate: f32) -> anyhow::Result<()> {
        info!("🔊 ({:.1}x) {}", rate, text);
        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}
