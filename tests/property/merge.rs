//! Flushing partial indices must not change any query result.
//!
//! The same corpus is built twice: once in a single pass, once flushing after
//! every word (so documents are split across partial indices and the merge
//! has to stitch their postings back together).

use proptest::prelude::*;

use super::common::{index_with_config, run};
use quarry::{IndexFile, IndexerConfig};

// ============================================================================
// STRATEGIES
// ============================================================================

/// A small vocabulary so documents share words.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["cat", "dog", "bird", "fish", "frog", "fern", "fox", "owl"])
        .prop_map(str::to_string)
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..12).prop_map(|words| words.join(" "))
}

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(document_strategy(), 1..6)
}

fn results(index: &IndexFile, query: &str) -> Vec<(u32, u32)> {
    run(index, query).hits.iter().map(|h| (h.doc_id, h.rank)).collect()
}

const QUERIES: &[&str] = &[
    "cat",
    "dog",
    "f*",
    "cat and dog",
    "bird or fish",
    "not owl",
    "(cat or fox) and not fern",
    "frog fern fox",
    "cat near dog",
    "bird not near fish",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: one pass and a flush per word give identical results.
    #[test]
    fn prop_flush_does_not_change_results(corpus in corpus_strategy()) {
        let docs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (_a, single) = index_with_config(&docs, IndexerConfig::default());
        let (_b, split) = index_with_config(&docs, IndexerConfig::default().with_word_threshold(1));

        prop_assert_eq!(single.document_count(), docs.len());
        prop_assert_eq!(split.document_count(), docs.len());
        for query in QUERIES {
            prop_assert_eq!(results(&single, query), results(&split, query), "query {:?}", query);
        }
    }

    /// Property: the word segment of a built index is strictly sorted.
    #[test]
    fn prop_word_segment_sorted(corpus in corpus_strategy(), threshold in 1usize..20) {
        let docs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (_dir, index) = index_with_config(&docs, IndexerConfig::default().with_word_threshold(threshold));
        prop_assert!(index.words().is_sorted().unwrap());

        let words: Vec<_> = (0..index.words().len())
            .map(|i| index.word_entry(i).unwrap().word().to_string())
            .collect();
        prop_assert!(words.windows(2).all(|w| w[0] < w[1]));
    }

    /// Property: every document's postings agree with a direct word count.
    #[test]
    fn prop_occurrences_match_the_text(corpus in corpus_strategy()) {
        let docs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (_dir, index) = index_with_config(&docs, IndexerConfig::default().with_word_threshold(3));

        for i in 0..index.words().len() {
            let entry = index.word_entry(i).unwrap();
            for posting in entry.decode_all().unwrap() {
                let text = docs[posting.doc_id as usize];
                let expected = text.split(' ').filter(|w| *w == entry.word()).count();
                prop_assert_eq!(posting.occurrences as usize, expected);
                prop_assert!(posting.rank >= 1);
            }
        }
    }
}
