//! Mixed-script tokenization
//!
//! Chinese text carries no whitespace word boundaries, so segmentation uses
//! the jieba dictionary/HMM segmenter. Latin-script runs come out as whole words.

use jieba_rs::Jieba;

pub struct Segmenter {
    jieba: Jieba,
    hmm: bool,
}

impl Segmenter {
    /// Load the embedded dictionary. Expensive, call once at startup.
    pub fn new(hmm: bool) -> Self {
        Self {
            jieba: Jieba::new(),
            hmm,
        }
    }

    pub fn cut<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, self.hmm)
    }
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter").field("hmm", &self.hmm).finish_non_exhaustive()
    }
}

/// Join surviving tokens with single spaces; repetitions are kept so that
/// frequency is carried by repetition count.
pub fn join_words(words: &[&str]) -> String {
    words.join(" ")
}
