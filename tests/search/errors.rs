//! Malformed queries fail the request without touching the index.

use super::common::{index_from_docs, matches, PETS};
use quarry::{Error, QueryOptions, Searcher};

#[test]
fn grammar_violations_are_malformed() {
    let (_dir, index) = index_from_docs(PETS);
    let searcher = Searcher::new(&index);
    for query in ["", "   ", "(cat", "((cat)", "cat)", "or cat", "cat and", "not", "cat = ", "*", "cat and *"] {
        match searcher.search(query) {
            Err(e @ Error::MalformedQuery(_)) => assert!(e.is_request_error()),
            other => panic!("{:?}: expected malformed query, got {:?}", query, other),
        }
    }
}

#[test]
fn deeply_nested_queries_are_malformed() {
    let (_dir, index) = index_from_docs(PETS);
    let searcher = Searcher::new(&index);
    let queries = [
        format!("{}cat{}", "(".repeat(10_000), ")".repeat(10_000)),
        format!("{}cat", "not ".repeat(10_000)),
        format!("{}cat", "cat or dog and ".repeat(5_000)),
    ];
    for query in &queries {
        assert!(matches!(searcher.search(query), Err(Error::MalformedQuery(_))));
    }
    // Still usable afterwards
    assert_eq!(searcher.search("cat").unwrap().total, 2);
}

#[test]
fn nesting_within_the_limit_is_evaluated() {
    let (_dir, index) = index_from_docs(PETS);
    let grouped = format!("{}cat{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(matches(&index, &grouped), vec![0, 1]);
    // An even number of `not`s cancels out
    let negated = format!("{}cat", "not ".repeat(100));
    assert_eq!(matches(&index, &negated), vec![0, 1]);
    let long_or = vec!["cat"; 1_000].join(" or ");
    assert_eq!(matches(&index, &long_or), vec![0, 1]);
}

#[test]
fn searcher_keeps_working_after_a_bad_query() {
    let (_dir, index) = index_from_docs(PETS);
    let searcher = Searcher::new(&index);
    assert!(searcher.search("(cat").is_err());
    assert_eq!(searcher.search("cat").unwrap().total, 2);
    assert_eq!(matches(&index, "(cat)"), vec![0, 1]);
}

#[test]
fn invalid_options_are_rejected() {
    let (_dir, index) = index_from_docs(PETS);
    let options = QueryOptions::default().with_word_percent_max(150);
    let err = Searcher::new(&index).with_options(options).search("cat").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}
