//! 手语 ↔ 语音翻译核心库
//!
//! 两条实时管线：
//! - 手语 → 语音：逐帧分类结果 → 去抖 → 组句 → 朗读
//! - 语音 → 手语：转录 → 受约束的生成式翻译 → 手语词序列 → 定时循环播放

pub mod ai;
pub mod config;
pub mod core;
pub mod error;
pub mod external;
pub mod utils;
pub mod vocab;

// Re-exports - 核心管线
pub use crate::core::debounce::{ClassificationSample, DebounceConfig, Rejection, SampleDebouncer, Token};
pub use crate::core::event::{EventSender, SessionEvent};
pub use crate::core::playback::{PlaybackConfig, PlaybackScheduler, PlaybackState, PlaybackStatus, PlaybackStep};
pub use crate::core::refiner::SentenceRefiner;
pub use crate::core::sentence::SentenceAssembler;
pub use crate::core::session::TranslatorSession;
pub use crate::core::sign_to_speech::SignToSpeech;
pub use crate::core::speech_to_sign::SpeechToSign;
pub use crate::core::translator::{GlossSequence, GlossTranslator, Translation, TranslationOutcome};

// Re-exports - 词汇
pub use crate::vocab::{AssetResolver, StepDisplay, VocabularyCatalog, VocabularyEntry};

// Re-exports - AI / 配置 / 错误
pub use crate::ai::client::{AiClient, TextGenerator};
pub use crate::config::AppConfig;
pub use crate::error::{Result, SignBridgeError};
