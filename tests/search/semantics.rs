//! Boolean operators, wildcards and ignored words.

use super::common::{doc_ids, index_from_docs, index_with_config, matches, run, run_with, PETS};
use quarry::{IndexerConfig, QueryOptions};

// ============================================================================
// BOOLEAN OPERATORS
// ============================================================================

#[test]
fn single_word() {
    let (_dir, index) = index_from_docs(PETS);
    assert_eq!(matches(&index, "cat"), vec![0, 1]);
    assert_eq!(matches(&index, "bird"), vec![2]);
}

#[test]
fn and_requires_every_operand() {
    let (_dir, index) = index_from_docs(PETS);
    assert_eq!(matches(&index, "cat and dog"), vec![0]);
    // Adjacent words are an implicit `and`
    assert_eq!(matches(&index, "cat dog"), vec![0]);
    assert!(matches(&index, "cat and bird").is_empty());
}

#[test]
fn or_takes_the_union() {
    let (_dir, index) = index_from_docs(PETS);
    assert_eq!(matches(&index, "cat or dog"), vec![0, 1, 2]);
    assert_eq!(matches(&index, "cat or zebra"), vec![0, 1]);
}

#[test]
fn not_is_the_complement() {
    let (_dir, index) = index_from_docs(PETS);
    let results = run(&index, "not cat");
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].doc_id, 2);
    assert_eq!(results.hits[0].rank, 100);

    assert_eq!(matches(&index, "not zebra"), vec![0, 1, 2]);
    assert_eq!(matches(&index, "cat and not dog"), vec![1]);
}

#[test]
fn not_of_an_ignored_word_is_every_document() {
    let (_dir, index) = index_from_docs(PETS);
    let results = run(&index, "not the");
    assert_eq!(doc_ids(&results), vec![0, 1, 2]);
    assert_eq!(results.ignored, vec!["the".to_string()]);
    assert_eq!(matches(&index, "cat and not the"), vec![0, 1]);
}

#[test]
fn grouping_changes_the_result() {
    let (_dir, index) = index_from_docs(PETS);
    // Left to right: (cat or bird) and dog
    assert_eq!(matches(&index, "cat or bird and dog"), vec![0, 2]);
    assert_eq!(matches(&index, "cat or (bird and dog)"), vec![0, 1, 2]);
}

#[test]
fn missing_word_matches_nothing() {
    let (_dir, index) = index_from_docs(PETS);
    assert!(matches(&index, "zebra").is_empty());
    assert!(matches(&index, "cat and zebra").is_empty());
}

// ============================================================================
// WORD FORMS
// ============================================================================

#[test]
fn wildcard_matches_every_word_with_the_prefix() {
    let (_dir, index) = index_from_docs(&["cat", "catalog", "dog", "concat"]);
    assert_eq!(matches(&index, "cat*"), vec![0, 1]);
    assert_eq!(matches(&index, "ca*"), vec![0, 1]);
    assert!(matches(&index, "zz*").is_empty());
}

#[test]
fn query_words_are_case_folded() {
    let (_dir, index) = index_from_docs(PETS);
    assert_eq!(matches(&index, "CAT AND Dog"), vec![0]);
}

#[cfg(feature = "unicode-normalization")]
#[test]
fn diacritics_fold_on_both_sides() {
    let (_dir, index) = index_from_docs(&["café au lait", "cafe noir"]);
    assert_eq!(matches(&index, "cafe"), vec![0, 1]);
    assert_eq!(matches(&index, "CAFÉ"), vec![0, 1]);
}

// ============================================================================
// IGNORED WORDS
// ============================================================================

#[test]
fn stop_words_are_ignored_and_reported() {
    let (_dir, index) = index_from_docs(PETS);
    let results = run(&index, "the cat");
    assert_eq!(results.total, 2);
    assert_eq!(results.ignored, vec!["the".to_string()]);
}

#[test]
fn frequent_words_are_ignored_at_query_time() {
    let (_dir, index) = index_from_docs(PETS);
    let options = QueryOptions::default().with_word_percent_max(50);
    // cat and dog are each in 2 of 3 documents
    let results = run_with(&index, "cat or dog or bird", options);
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].doc_id, 2);
    assert_eq!(results.ignored, vec!["cat".to_string(), "dog".to_string()]);
}

#[test]
fn words_the_indexer_skips_are_ignored() {
    let (_dir, index) = index_from_docs(&["cat x 2024", "dog"]);
    let results = run(&index, "cat x");
    assert_eq!(doc_ids(&results), vec![0]);
    assert_eq!(results.ignored, vec!["x".to_string()]);

    let results = run(&index, "cat 2024");
    assert_eq!(doc_ids(&results), vec![0]);
    assert_eq!(results.ignored, vec!["2024".to_string()]);

    let long = "a".repeat(30);
    let results = run(&index, &format!("cat and {}", long));
    assert_eq!(doc_ids(&results), vec![0]);
    assert_eq!(results.ignored, vec![long]);
}

#[test]
fn query_word_sizes_follow_the_options() {
    let (_dir, index) = index_with_config(&["cat x", "dog"], IndexerConfig::default().with_word_sizes(1, 25));
    let options = QueryOptions::default().with_word_sizes(1, 25);
    let results = run_with(&index, "x", options);
    assert_eq!(doc_ids(&results), vec![0]);
    assert!(results.ignored.is_empty());
}

#[test]
fn only_stop_words_matches_nothing() {
    let (_dir, index) = index_from_docs(PETS);
    let results = run(&index, "the");
    assert_eq!(results.total, 0);
    assert_eq!(results.ignored, vec!["the".to_string()]);
}

// ============================================================================
// RANKING
// ============================================================================

#[test]
fn best_hit_reads_100_and_order_is_stable() {
    let (_dir, index) = index_from_docs(&["dog", "cat cat cat", "cat dog bird fish"]);
    let results = run(&index, "cat");
    assert_eq!(results.hits[0].doc_id, 1);
    assert_eq!(results.hits[0].rank, 100);
    assert!(results.hits.iter().all(|h| (1..=100).contains(&h.rank)));

    let ranks: Vec<_> = results.hits.iter().map(|h| h.rank).collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ranks, sorted);
}

#[test]
fn equal_ranks_order_by_document() {
    let (_dir, index) = index_from_docs(&["cat", "cat", "cat"]);
    let order: Vec<_> = run(&index, "cat").hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(order, vec![0, 1, 2]);
}
