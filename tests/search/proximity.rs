//! `near` and `not near` over known word positions.
//!
//! In doc0 "alpha" is at position 0, "beta" at 2 and "gamma" at 5.

#![cfg(feature = "word-pos")]

use super::common::{index_from_docs, matches, run_with, SPACED};
use quarry::{Error, QueryOptions, Searcher};

fn within_two(query: &str) -> Vec<u32> {
    let (_dir, index) = index_from_docs(SPACED);
    let options = QueryOptions::default().with_near_distance(2);
    super::common::doc_ids(&run_with(&index, query, options))
}

#[test]
fn near_accepts_words_within_the_distance() {
    assert_eq!(within_two("alpha near beta"), vec![0]);
    assert_eq!(within_two("beta near alpha"), vec![0]);
}

#[test]
fn near_rejects_words_too_far_apart() {
    assert!(within_two("alpha near gamma").is_empty());
}

#[test]
fn distance_is_configurable() {
    let (_dir, index) = index_from_docs(SPACED);
    let options = QueryOptions::default().with_near_distance(5);
    assert_eq!(super::common::doc_ids(&run_with(&index, "alpha near gamma", options)), vec![0]);
}

#[test]
fn not_near_accepts_distant_or_lone_terms() {
    // Present in doc0 but too far apart
    assert_eq!(within_two("alpha not near gamma"), vec![0]);
    // doc0 has a close pair; doc1 has beta alone
    assert_eq!(within_two("alpha not near beta"), vec![1]);
    // Both absent from doc2: never a match
    assert_eq!(within_two("beta not near gamma"), vec![0, 1]);
}

#[test]
fn near_distributes_over_groups() {
    assert_eq!(within_two("alpha near (gamma or beta)"), vec![0]);
    assert!(within_two("alpha near (gamma or text)").is_empty());
}

#[test]
fn near_chains_need_every_neighbour_close() {
    let (_dir, index) = index_from_docs(&["one two three", "one two xx xx xx xx three"]);
    let options = QueryOptions::default().with_near_distance(2);
    let ids = super::common::doc_ids(&run_with(&index, "one near two near three", options));
    assert_eq!(ids, vec![0]);
}

#[test]
fn near_over_not_is_malformed() {
    let (_dir, index) = index_from_docs(SPACED);
    let err = Searcher::new(&index).search("alpha near not beta").unwrap_err();
    assert!(matches!(err, Error::MalformedQuery(_)));
}

#[test]
fn positions_survive_a_split_document() {
    // A flush after every word splits each document across partial indices
    let config = quarry::IndexerConfig::default().with_word_threshold(1);
    let (_dir, index) = super::common::index_with_config(SPACED, config);
    let options = QueryOptions::default().with_near_distance(2);
    assert_eq!(super::common::doc_ids(&run_with(&index, "alpha near beta", options.clone())), vec![0]);
    assert!(super::common::doc_ids(&run_with(&index, "alpha near gamma", options)).is_empty());
    assert_eq!(matches(&index, "gamma"), vec![0]);
}
