//! Case and diacritic folding

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes text for lexical comparison.
///
/// Lowercases, decomposes to NFD, drops combining marks and trims surrounding
/// whitespace, so `"Política de FÉRIAS"` becomes `"politica de ferias"`.
/// Lowercasing happens before decomposition because some lowercase mappings
/// (e.g. `İ`) emit combining marks of their own; this keeps the function idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();

    let folded: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    folded.trim().to_string()
}
