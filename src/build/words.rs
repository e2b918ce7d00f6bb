//! Turning text into candidate words.
//!
//! Text is folded (lowercase, diacritics stripped) and split on anything that
//! is not a word character. Each piece is one candidate and consumes one word
//! position whether or not it ends up indexed, so proximity distances reflect
//! the text as written.

use crate::utils::{fold, is_word_char, trim_word};

/// Why a candidate word was not indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    TooLong,
    NoLetters,
    BadCharacter,
}

/// Split folded text into candidate words (not yet trimmed or checked).
pub fn candidates(folded: &str) -> impl Iterator<Item = &str> {
    folded.split(|c: char| !is_word_char(c)).filter(|w| !w.is_empty())
}

/// Fold and trim one raw word into its index form.
pub fn prepare(raw: &str) -> String {
    let folded = fold(raw);
    trim_word(&folded).to_string()
}

/// Check a prepared word against the length limits and alphabet.
pub fn check(word: &str, min_size: usize, max_size: usize) -> Result<(), Rejection> {
    let len = word.chars().count();
    if len < min_size {
        return Err(Rejection::TooShort);
    }
    if len > max_size {
        return Err(Rejection::TooLong);
    }
    if !word.chars().all(is_word_char) {
        return Err(Rejection::BadCharacter);
    }
    if !word.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(Rejection::NoLetters);
    }
    Ok(())
}
