// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking math.
//!
//! Each file posting carries an integer rank computed once, when its word's
//! final posting list is known:
//!
//! ```text
//! rank = max(1, floor((ln(occurrences_in_doc) + 10) * (RANK_SCALE / total_occurrences) / words_in_doc))
//! ```
//!
//! More occurrences in a document raise its rank logarithmically; a word that is
//! common across the corpus or a long document lowers it. At query time scores
//! are summed or averaged by the operator tree, then scaled so the best result
//! reads 100.

use serde::{Deserialize, Serialize};

/// Keeps integer ranks well spread for typical document sizes.
pub const RANK_SCALE: f64 = 1_000_000.0;

/// When a word is in too many documents to be worth indexing or searching.
///
/// Applied at merge time (the word becomes a stop word) and again at query
/// time (the word is ignored and reported).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyLimit {
    /// Absolute maximum number of documents
    pub files_max: u64,
    /// Maximum percentage of the corpus, 0..=100 (100 disables the check)
    pub percent_max: u8,
}

impl Default for FrequencyLimit {
    fn default() -> Self {
        Self {
            files_max: u64::MAX,
            percent_max: 100,
        }
    }
}

impl FrequencyLimit {
    /// True if a word in `doc_count` of `total_docs` documents is too frequent.
    pub fn exceeded(&self, doc_count: u64, total_docs: u64) -> bool {
        if doc_count > self.files_max {
            return true;
        }
        self.percent_max < 100
            && u128::from(doc_count) * 100 > u128::from(self.percent_max) * u128::from(total_docs)
    }
}

/// Score given to every document a `not` node emits.
pub const NOT_SCORE: u64 = 100;

/// Rank of one file posting.
///
/// `occurrences` is the count in this document, `total_occurrences` the count
/// across all documents, `words_in_doc` the document's word count.
pub fn posting_rank(occurrences: u32, total_occurrences: u64, words_in_doc: u32) -> u32 {
    if occurrences == 0 || total_occurrences == 0 {
        return 1;
    }
    let words = f64::from(words_in_doc.max(1));
    let rank = (f64::from(occurrences).ln() + 10.0) * (RANK_SCALE / total_occurrences as f64) / words;
    if rank >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (rank.floor() as u32).max(1)
    }
}

/// Scale a raw score against the best score to 1..=100.
pub fn normalize_rank(score: u64, top: u64) -> u32 {
    if top == 0 {
        return 1;
    }
    let scaled = (u128::from(score) * 100 / u128::from(top)) as u32;
    scaled.clamp(1, 100)
}
