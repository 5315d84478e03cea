//! 外部组件接口
//!
//! 分类器、语音识别/合成、资源存储只在接口边界上定义

pub mod assets;
pub mod classifier;
pub mod scripted;
pub mod speech;

pub use assets::{AssetStore, FsAssetStore, MemoryAssetStore};
pub use classifier::{top_prediction, FrameClassifier, Prediction};
pub use scripted::{LogSynthesizer, ScriptedClassifier, ScriptedRecognizer};
pub use speech::{SpeechRecognizer, SpeechSynthesizer};
