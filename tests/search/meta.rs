//! `name = value` restrictions on meta-tagged words.

use super::common::{doc_ids, matches, run};
use quarry::{IndexFile, IndexerConfig, IndexerSession, StopWords};
use tempfile::TempDir;

/// doc0: title "cat", body "dog". doc1: body "cat". doc2: author "dog".
fn tagged() -> (TempDir, IndexFile) {
    let dir = tempfile::tempdir().unwrap();
    let config = IndexerConfig::default().with_temp_dir(dir.path());
    let mut session = IndexerSession::new(config, StopWords::builtin()).unwrap();
    let corpus = session.add_directory("/corpus");

    let mut file = session.begin_file(corpus, "a.txt", 7, Some("Cat"));
    let title = file.meta_id("title");
    file.index_text("cat", Some(title)).unwrap();
    file.index_text("dog", None).unwrap();
    drop(file);

    let mut file = session.begin_file(corpus, "b.txt", 3, None);
    file.index_text("cat", None).unwrap();
    drop(file);

    let mut file = session.begin_file(corpus, "c.txt", 3, None);
    let author = file.meta_id("author");
    file.index_text("dog", Some(author)).unwrap();
    drop(file);

    let path = dir.path().join("tagged.qx");
    session.finish(&path).unwrap();
    let index = IndexFile::open(&path).unwrap();
    (dir, index)
}

#[test]
fn meta_restricts_to_tagged_occurrences() {
    let (_dir, index) = tagged();
    assert_eq!(matches(&index, "title = cat"), vec![0]);
    assert_eq!(matches(&index, "cat"), vec![0, 1]);
    assert_eq!(matches(&index, "author = dog"), vec![2]);
    assert!(matches(&index, "title = dog").is_empty());
}

#[test]
fn meta_applies_to_a_whole_group() {
    let (_dir, index) = tagged();
    assert_eq!(matches(&index, "title = (cat or dog)"), vec![0]);
    assert_eq!(matches(&index, "title = ca*"), vec![0]);
}

#[test]
fn meta_names_are_case_folded() {
    let (_dir, index) = tagged();
    assert_eq!(matches(&index, "TITLE = Cat"), vec![0]);
}

#[test]
fn unknown_meta_name_matches_nothing() {
    let (_dir, index) = tagged();
    assert!(matches(&index, "subject = cat").is_empty());
    // The rest of the query still counts
    assert_eq!(matches(&index, "subject = cat or dog"), vec![0, 2]);
}

#[test]
fn meta_only_binds_the_next_primary() {
    let (_dir, index) = tagged();
    assert_eq!(doc_ids(&run(&index, "title = cat dog")), vec![0]);
    assert_eq!(index.meta_id("title").unwrap(), Some(0));
    assert_eq!(index.meta_id("author").unwrap(), Some(1));
}

#[test]
fn document_title_is_reported() {
    let (_dir, index) = tagged();
    let results = run(&index, "title = cat");
    assert_eq!(results.hits[0].title, "Cat");
    assert!(results.hits[0].path.ends_with("a.txt"));
}
