// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the query language.
//!
//! Any string is either a valid query or a `MalformedQuery`. Valid queries
//! return hits with ranks in 1..=100, sorted best first.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::{Error, IndexFile, Searcher};

fuzz_target!(|query: &str| {
    static INDEX: std::sync::OnceLock<(tempfile::TempDir, IndexFile)> = std::sync::OnceLock::new();
    let (_, index) = INDEX.get_or_init(|| {
        quarry::testing::index_from_docs(&[
            "the quick brown fox jumps over the lazy dog",
            "a cat and a dog",
            "brown bread and butter",
        ])
    });

    match Searcher::new(index).search(query) {
        Ok(results) => {
            assert!(results.hits.len() <= results.total);
            assert!(results.hits.iter().all(|h| (1..=100).contains(&h.rank)));
            assert!(results.hits.windows(2).all(|w| w[0].rank >= w[1].rank));
        }
        Err(Error::MalformedQuery(_)) => {}
        Err(e) => panic!("query {:?} failed with {}", query, e),
    }
});
