//! 句子润色
//!
//! 把手语词序列改写为自然的英文句子，失败时原样返回

use tracing::{debug, warn};

use crate::ai::client::TextGenerator;

pub struct SentenceRefiner<G> {
    generator: G,
}

impl<G: TextGenerator> SentenceRefiner<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn build_prompt(raw: &str) -> String {
        format!(
            "Convert this raw sign sequence into a natural English sentence: '{}'. Keep it short and meaningful.",
            raw
        )
    }

    pub async fn refine(&self, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }

        match self.generator.generate(&Self::build_prompt(raw)).await {
            Ok(text) if !text.trim().is_empty() => {
                let refined = text.trim().to_string();
                debug!("Refined {:?} -> {:?}", raw, refined);
                refined
            }
            Ok(_) => {
                warn!("Empty refinement, keeping raw sentence");
                raw.to_string()
            }
            Err(e) => {
                warn!("Refinement failed, keeping raw sentence: {}", e);
                raw.to_string()
            }
        }
    }
}
