//! Keyword extraction

use std::collections::HashSet;
use std::sync::LazyLock;

use unicode_segmentation::UnicodeSegmentation;

use super::normalize;

/// Tokens shorter than this (in graphemes) carry no signal
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Portuguese articles, prepositions, conjunctions and auxiliaries.
///
/// Entries are stored already normalized; the short ones are listed anyway so the
/// list stays valid if `min_token_len` is lowered.
pub const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "o", "e", "as", "os", "ao", "aos", "de", "da", "do", "das", "dos", "em", "na", "no",
    "nas", "nos", "um", "uma", "uns", "umas", "para", "pra", "com", "sem", "que", "se", "por",
    "pelo", "pela", "pelos", "pelas", "sao", "ser", "sobre", "entre", "ate", "mas", "nem", "ou",
    "mais", "menos", "como", "quando", "onde", "qual", "quais", "isso", "isto", "esse", "essa",
    "este", "esta", "aquele", "aquela", "meu", "minha", "seu", "sua", "seus", "suas", "nao",
    "sim", "foi", "tem", "ter", "ja", "eu", "voce", "ele", "ela", "eles", "elas", "muito",
    "tambem", "estao", "num", "numa",
];

static DEFAULT_EXTRACTOR: LazyLock<KeywordExtractor> = LazyLock::new(KeywordExtractor::new);

/// Extracts keywords with the default Portuguese stopword list
pub fn extract_keywords(text: &str) -> Vec<String> {
    DEFAULT_EXTRACTOR.extract(text)
}

/// Splits text into significant terms, dropping stopwords and short tokens.
///
/// Output keeps input order and duplicates. Input is normalized first, so callers
/// may pass raw text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    min_token_len: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Creates an extractor with the Portuguese stopword list
    pub fn new() -> Self {
        Self {
            stopwords: PORTUGUESE_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Creates an extractor with no stopwords at all
    pub fn without_stopwords() -> Self {
        Self {
            stopwords: HashSet::new(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Adds extra stopwords (normalized before insertion)
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = normalize(word.as_ref());

            if !word.is_empty() {
                self.stopwords.insert(word);
            }
        }
        self
    }

    /// Sets the minimum token length; zero is treated as one
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len.max(1);
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Extracts the ordered keyword sequence from `text`
    pub fn extract(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);

        normalized
            .split(|c: char| c.is_whitespace() || c.is_control())
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|token| token.graphemes(true).count() >= self.min_token_len)
            .filter(|token| !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }
}
