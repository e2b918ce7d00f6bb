// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word normalization seam.
//!
//! The same stemmer must be used to build an index and to query it. A stemmer
//! is shared by concurrent queries, so it must be `Send + Sync`, free of side
//! effects, and idempotent: `stem(stem(w)) == stem(w)`.
//!
//! Stop words are matched against both the word and its stem, at index time
//! and at query time, so a stemmer that maps a word onto a stop word drops it.

pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Leaves words unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStemmer;

impl Stemmer for NoStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String {
        self(word)
    }
}
