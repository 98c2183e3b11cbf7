//! Text domain - Normalization and keyword extraction for lexical search

mod keywords;
mod normalizer;

pub use keywords::{extract_keywords, KeywordExtractor, DEFAULT_MIN_TOKEN_LEN, PORTUGUESE_STOPWORDS};
pub use normalizer::normalize;
