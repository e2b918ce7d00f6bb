//! Word-level string helpers shared by indexing and querying.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Characters a word may contain. Letters and digits anywhere; the
/// punctuation only inside a word (see [`trim_word`]).
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '&' | '\'' | '-' | '_')
}

/// Strip leading and trailing punctuation so `'quoted'` and `end-` index
/// as `quoted` and `end`.
pub fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_ascii_alphanumeric())
}

/// Fold a word to its index form: strip diacritics, then lowercase.
///
/// - "Café" → "cafe"
/// - "naïve" → "naive"
///
/// Characters that survive folding but are not word characters are left in
/// place; callers split on them.
#[cfg(feature = "unicode-normalization")]
pub fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Lowercase only (no diacritic folding without `unicode-normalization`).
#[cfg(not(feature = "unicode-normalization"))]
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Check if a character is a combining mark (diacritic).
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
