//! 句子组装器

use tokio::time::Instant;

use super::debounce::Token;

/// 按接受顺序累积词，空格连接
#[derive(Debug, Clone, Default)]
pub struct SentenceAssembler {
    words: Vec<String>,
    last_appended_at: Option<Instant>,
}

impl SentenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, token: Token) {
        self.last_appended_at = Some(token.accepted_at);
        self.words.push(token.text);
    }

    pub fn current_text(&self) -> String {
        self.words.join(" ")
    }

    pub fn tokens(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 最后一个词被接受的时间
    pub fn last_appended_at(&self) -> Option<Instant> {
        self.last_appended_at
    }

    pub fn reset(&mut self) {
        self.words.clear();
        self.last_appended_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> Token {
        Token {
            text: text.to_string(),
            accepted_at: Instant::now(),
        }
    }

    #[test]
    fn test_join_in_order() {
        let mut sentence = SentenceAssembler::new();
        assert_eq!(sentence.current_text(), "");

        sentence.append(token("HELLO"));
        assert_eq!(sentence.current_text(), "HELLO");

        sentence.append(token("MY"));
        sentence.append(token("FRIEND"));
        assert_eq!(sentence.current_text(), "HELLO MY FRIEND");
        assert_eq!(sentence.len(), 3);
    }

    #[test]
    fn test_reset() {
        let mut sentence = SentenceAssembler::new();
        sentence.append(token("HELLO"));
        sentence.reset();

        assert!(sentence.is_empty());
        assert!(sentence.last_appended_at().is_none());
        assert_eq!(sentence.current_text(), "");

        // 重置后没有前导空格
        sentence.append(token("BYE"));
        assert_eq!(sentence.current_text(), "BYE");
    }
}
