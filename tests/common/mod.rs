//! Shared test utilities and fixtures.

#![allow(dead_code)]

use quarry::{DocId, IndexFile, QueryOptions, SearchResults, Searcher};

pub use quarry::testing::{append_docs, index_from_docs, index_path, index_with_config, write_index};

// ============================================================================
// CORPORA
// ============================================================================

/// doc0 = "cat dog", doc1 = "cat", doc2 = "dog bird"
pub const PETS: &[&str] = &["cat dog", "cat", "dog bird"];

/// Words at known positions: "alpha" at 0, "beta" at 2, "gamma" at 5.
pub const SPACED: &[&str] = &["alpha xx beta xx xx gamma", "beta", "unrelated text"];

// ============================================================================
// QUERY HELPERS
// ============================================================================

pub fn run(index: &IndexFile, query: &str) -> SearchResults {
    run_with(index, query, QueryOptions::default())
}

pub fn run_with(index: &IndexFile, query: &str, options: QueryOptions) -> SearchResults {
    Searcher::new(index)
        .with_options(options)
        .search(query)
        .unwrap_or_else(|e| panic!("query {:?} failed: {}", query, e))
}

/// Matching document ids, sorted.
pub fn doc_ids(results: &SearchResults) -> Vec<DocId> {
    let mut ids: Vec<_> = results.hits.iter().map(|h| h.doc_id).collect();
    ids.sort_unstable();
    ids
}

pub fn matches(index: &IndexFile, query: &str) -> Vec<DocId> {
    doc_ids(&run(index, query))
}
