//! Text normalization for tolerant comparisons
//!
//! Exported pages mix encodings, so the same header may arrive as
//! "EXPRESSÕES", "EXPRESSOES" or with the accent decomposed. Comparisons go
//! through NFKD decomposition with combining marks removed.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decompose and drop combining marks, keeping case
pub fn fold_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Accent-folded, lower-cased, trimmed, whitespace-collapsed form used for
/// name matching
///
/// # Examples
///
/// ```
/// use lineage_extractor::normalize::normalize_for_matching;
///
/// assert_eq!(normalize_for_matching("  Mês  de Referência "), "mes de referencia");
/// ```
pub fn normalize_for_matching(text: &str) -> String {
    fold_accents(text)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accent-folded upper-case form used for header comparison
pub fn fold_upper(text: &str) -> String {
    fold_accents(text).to_uppercase()
}

/// Whether `haystack` contains `needle`, ignoring case and accents
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_upper(haystack).contains(&fold_upper(needle))
}

/// Collapse runs of whitespace to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
