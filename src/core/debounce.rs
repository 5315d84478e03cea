//! 手势去抖
//!
//! 把高频、带噪声的逐帧分类结果变成低频的离散词

use std::time::Duration;
use serde::Serialize;
use tokio::time::Instant;
use tracing::trace;

/// 保留的"无手势"标签
pub const NEUTRAL_LABEL: &str = "neutral";

/// 单帧分类样本
#[derive(Debug, Clone)]
pub struct ClassificationSample {
    pub label: String,
    /// 置信度 (0-1)
    pub confidence: f32,
    pub timestamp: Instant,
}

impl ClassificationSample {
    pub fn new(label: impl Into<String>, confidence: f32, timestamp: Instant) -> Self {
        Self {
            label: label.into(),
            confidence,
            timestamp,
        }
    }
}

/// 被接受的词
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    #[serde(skip)]
    pub accepted_at: Instant,
}

/// 样本被丢弃的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 置信度不超过阈值
    LowConfidence,
    /// neutral 标签
    Neutral,
    /// 与上一个词相同且仍在冷却期内
    DuplicateWithinCooldown,
}

/// 去抖配置
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// 接受阈值，置信度必须严格大于它
    pub threshold: f32,
    /// 相同标签再次接受前的冷却时间
    pub cooldown: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            cooldown: Duration::from_millis(1200),
        }
    }
}

/// 去抖器
#[derive(Debug, Clone)]
pub struct SampleDebouncer {
    config: DebounceConfig,
    /// 上一次接受的标签及时间，只在接受时更新
    last: Option<(String, Instant)>,
}

impl SampleDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// 样本通过则返回新词
    pub fn accept(&mut self, sample: &ClassificationSample) -> Option<Token> {
        self.evaluate(sample).ok()
    }

    /// 与 `accept` 相同，但给出丢弃原因
    pub fn evaluate(&mut self, sample: &ClassificationSample) -> Result<Token, Rejection> {
        if sample.label.eq_ignore_ascii_case(NEUTRAL_LABEL) {
            return Err(Rejection::Neutral);
        }
        if sample.confidence.is_nan() || sample.confidence <= self.config.threshold {
            trace!("Dropped {} ({:.2}): low confidence", sample.label, sample.confidence);
            return Err(Rejection::LowConfidence);
        }

        if let Some((label, at)) = &self.last {
            let elapsed = sample.timestamp.saturating_duration_since(*at);
            if *label == sample.label && elapsed < self.config.cooldown {
                trace!("Dropped {}: within cooldown ({:?})", sample.label, elapsed);
                return Err(Rejection::DuplicateWithinCooldown);
            }
        }

        self.last = Some((sample.label.clone(), sample.timestamp));

        Ok(Token {
            text: sample.label.clone(),
            accepted_at: sample.timestamp,
        })
    }

    /// 上一次接受的标签
    pub fn last_label(&self) -> Option<&str> {
        self.last.as_ref().map(|(label, _)| label.as_str())
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for SampleDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}
