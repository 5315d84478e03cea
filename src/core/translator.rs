//! 手语词翻译
//!
//! 自由文本 → 词汇表内的手语词序列，借助外部生成式模型做受约束的生成

use std::ops::Deref;
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ai::client::TextGenerator;
use crate::error::{Result, SignBridgeError};
use crate::vocab::VocabularyCatalog;

/// 手语词序列，生成后不可变
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlossSequence(Vec<String>);

impl GlossSequence {
    pub fn new(glosses: Vec<String>) -> Self {
        Self(glosses)
    }

    /// 按空白切分
    pub fn from_words(text: &str) -> Self {
        Self(text.split_whitespace().map(str::to_string).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for GlossSequence {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for GlossSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// 翻译结果来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 模型输出
    Model,
    /// 模型不可用，原文直通
    Fallback { reason: String },
}

/// 翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub sequence: GlossSequence,
    pub outcome: TranslationOutcome,
}

impl Translation {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, TranslationOutcome::Fallback { .. })
    }
}

/// 少样本示例
const EXAMPLES: &[(&str, &str)] = &[
    ("I am hungry", "HUNGRY"),
    ("Goodbye", "BYE"),
    ("See you later", "SEE-YOU-LATER"),
    ("Good morning my friend", "GOOD-MORNING MY FRIEND"),
];

/// 手语词翻译器
///
/// 每次调用只发一次请求，不重试；除了共享的只读词汇表没有可变状态
pub struct GlossTranslator<G> {
    generator: G,
    catalog: Arc<VocabularyCatalog>,
}

impl<G: TextGenerator> GlossTranslator<G> {
    pub fn new(generator: G, catalog: Arc<VocabularyCatalog>) -> Self {
        Self { generator, catalog }
    }

    pub fn catalog(&self) -> &VocabularyCatalog {
        &self.catalog
    }

    /// 构建受约束的提示
    pub fn build_prompt(&self, phrase: &str) -> String {
        let glosses: Vec<&str> = self.catalog.names().collect();
        let examples: Vec<String> = EXAMPLES
            .iter()
            .map(|(input, output)| format!("   \"{}\" -> {}", input, output))
            .collect();

        format!(
            "You are an ASL translation assistant.\n\
             \n\
             Your task:\n\
             1. Translate the following English phrase into one or more ASL gloss keywords.\n\
             2. ONLY use these available glosses:\n\
             {}.\n\
             3. If a word isn't in the list, choose the closest available concept.\n\
             4. Respond ONLY with the matching gloss keywords separated by spaces or dashes.\n\
             5. Example:\n\
             {}\n\
             \n\
             Sentence: \"{}\"\n",
            glosses.join(", "),
            examples.join("\n"),
            phrase
        )
    }

    /// 翻译，失败时回退为原文单词
    pub async fn translate(&self, phrase: &str) -> Translation {
        match self.try_translate(phrase).await {
            Ok(sequence) => Translation {
                sequence,
                outcome: TranslationOutcome::Model,
            },
            Err(e) => {
                warn!("Falling back to raw words: {}", e);
                Translation {
                    sequence: GlossSequence::from_words(phrase),
                    outcome: TranslationOutcome::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// 翻译，服务不可用时返回 `TranslationUnavailable`
    pub async fn try_translate(&self, phrase: &str) -> Result<GlossSequence> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Ok(GlossSequence::default());
        }

        let prompt = self.build_prompt(phrase);
        debug!("Translating {:?}", phrase);

        let output = self.generator.generate(&prompt).await?;
        let sequence = parse_glosses(&output);
        if sequence.is_empty() {
            return Err(SignBridgeError::unavailable("empty model output"));
        }

        let unknown = sequence.iter().filter(|g| !self.catalog.contains(g)).count();
        info!("Translated {:?} -> {:?} ({} outside vocabulary)", phrase, sequence.as_slice(), unknown);

        Ok(sequence)
    }
}

/// 清理模型输出：去首尾空白、转大写、按空白切分，去掉词两端的引号和标点
pub fn parse_glosses(output: &str) -> GlossSequence {
    output
        .trim()
        .to_uppercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-'))
        .map(|word| word.trim_matches('-'))
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// 固定回复的生成器，记录收到的提示
    struct FixedGenerator {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedGenerator {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(SignBridgeError::unavailable("503 Service Unavailable")),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(SignBridgeError::unavailable(e)),
            }
        }
    }

    fn translator(generator: FixedGenerator) -> GlossTranslator<FixedGenerator> {
        GlossTranslator::new(generator, Arc::new(VocabularyCatalog::default()))
    }

    #[tokio::test]
    async fn test_translate_hungry() {
        let translator = translator(FixedGenerator::ok("  hungry\n"));
        let result = translator.translate("I am hungry").await;

        assert_eq!(result.outcome, TranslationOutcome::Model);
        assert_eq!(result.sequence.as_slice(), ["HUNGRY"]);
    }

    #[tokio::test]
    async fn test_prompt_enumerates_catalog() {
        let translator = translator(FixedGenerator::ok("HELLO"));
        translator.translate("hi there").await;

        let prompts = translator.generator.prompts.lock();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        for name in translator.catalog().names() {
            assert!(prompt.contains(name), "prompt missing {}", name);
        }
        assert!(prompt.contains("Sentence: \"hi there\""));
        assert!(prompt.contains("closest available concept"));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_words() {
        let translator = translator(FixedGenerator::failing());
        let result = translator.translate("I am hungry").await;

        assert!(result.is_fallback());
        assert_eq!(result.sequence.as_slice(), ["I", "am", "hungry"]);

        let err = translator.try_translate("I am hungry").await;
        assert!(matches!(err, Err(SignBridgeError::TranslationUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_empty_output_falls_back() {
        let translator = translator(FixedGenerator::ok("   \n"));
        let result = translator.translate("good night").await;

        assert!(result.is_fallback());
        assert_eq!(result.sequence.as_slice(), ["good", "night"]);
    }

    #[tokio::test]
    async fn test_blank_phrase_skips_request() {
        let translator = translator(FixedGenerator::ok("HELLO"));
        let result = translator.translate("   ").await;

        assert!(result.sequence.is_empty());
        assert_eq!(result.outcome, TranslationOutcome::Model);
        assert!(translator.generator.prompts.lock().is_empty());
    }

    #[test]
    fn test_parse_glosses() {
        assert_eq!(
            parse_glosses("good-morning my friend.").as_slice(),
            ["GOOD-MORNING", "MY", "FRIEND"]
        );
        assert_eq!(parse_glosses("\"SEE-YOU-LATER\"").as_slice(), ["SEE-YOU-LATER"]);
        assert!(parse_glosses(" ... ").is_empty());
    }
}
