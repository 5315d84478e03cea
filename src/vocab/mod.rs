//! 词汇模块

pub mod catalog;
pub mod resolver;

pub use catalog::{VocabularyCatalog, VocabularyEntry, DEFAULT_GLOSSES};
pub use resolver::{AssetResolver, StepDisplay};
