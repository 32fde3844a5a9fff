//! Stop-word set
//!
//! Built once at startup and shared read-only across requests.

use std::collections::HashSet;

/// Common Chinese function words and English articles/prepositions
const DEFAULT_STOP_WORDS: &[&str] = &[
    "的", "了", "和", "是", "就", "在", "我", "有", "而", "你", "这", "那", "也", "还", "但", "都",
    "对", "与", "向", "并", "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by",
];

#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Built-in list plus any extra words from configuration
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: HashSet<String> = DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect();
        words.extend(extra.into_iter().map(Into::into));
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Drop stop words, whitespace runs and tokens of one character or less.
    /// Order and repetitions of the survivors are preserved.
    pub fn filter<'a, I>(&self, tokens: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .filter(|t| t.chars().count() > 1 && !t.trim().is_empty() && !self.contains(t))
            .collect()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let stop = StopWords::default();
        assert_eq!(stop.len(), DEFAULT_STOP_WORDS.len());
        assert!(stop.contains("的"));
        assert!(stop.contains("with"));
        // Membership is case-sensitive
        assert!(!stop.contains("The"));
    }

    #[test]
    fn test_filter_drops_stop_words_and_single_chars() {
        let stop = StopWords::default();
        let tokens = vec!["我们", "的", "城市", " ", "很", "the", "river", "城市"];
        assert_eq!(stop.filter(tokens), vec!["我们", "城市", "river", "城市"]);
    }

    #[test]
    fn test_filter_drops_multi_char_whitespace() {
        let stop = StopWords::default();
        let tokens = vec!["城市", "\r\n", "  ", "\u{3000}\u{3000}", "河流"];
        assert_eq!(stop.filter(tokens), vec!["城市", "河流"]);
    }

    #[test]
    fn test_filter_all_stop_words_is_empty() {
        let stop = StopWords::default();
        assert!(stop.filter(vec!["的", "了", "和", "是"]).is_empty());
    }

    #[test]
    fn test_extra_words() {
        let stop = StopWords::new(["城市"]);
        assert!(stop.contains("城市"));
        assert!(stop.contains("的"));
        assert_eq!(stop.filter(vec!["城市", "河流"]), vec!["河流"]);
    }
}
