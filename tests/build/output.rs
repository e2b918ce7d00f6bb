//! What ends up on disk: atomic replacement, cleanup, corrupt input.

use std::fs;

use super::common::{index_path, matches, write_index, PETS};
use quarry::{Error, IndexFile, IndexerConfig, IndexerSession, Searcher, StopWords};

#[test]
fn only_the_index_is_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let config = IndexerConfig::default()
        .with_word_threshold(1)
        .with_temp_dir(dir.path());
    write_index(&index_path(&dir), PETS, config);

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["corpus.qx".to_string()]);
}

#[cfg(unix)]
#[test]
fn rebuilding_replaces_the_file_under_open_readers() {
    let dir = tempfile::tempdir().unwrap();
    let path = index_path(&dir);
    write_index(&path, PETS, IndexerConfig::default().with_temp_dir(dir.path()));
    let old = IndexFile::open(&path).unwrap();

    write_index(&path, &["zebra"], IndexerConfig::default().with_temp_dir(dir.path()));
    let new = IndexFile::open(&path).unwrap();

    // The old mapping still sees the old file
    assert_eq!(matches(&old, "cat"), vec![0, 1]);
    assert_eq!(matches(&new, "zebra"), vec![0]);
    assert!(matches(&new, "cat").is_empty());
}

#[test]
fn empty_corpus_builds_an_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let config = IndexerConfig::default().with_temp_dir(dir.path());
    let session = IndexerSession::new(config, StopWords::none()).unwrap();
    let path = index_path(&dir);
    let summary = session.finish(&path).unwrap();
    assert_eq!(summary.words, 0);

    let index = IndexFile::open(&path).unwrap();
    assert_eq!(index.document_count(), 0);
    assert!(matches(&index, "cat").is_empty());
    assert!(matches(&index, "not cat").is_empty());
}

#[test]
fn truncated_index_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = index_path(&dir);
    write_index(&path, PETS, IndexerConfig::default().with_temp_dir(dir.path()));
    let bytes = fs::read(&path).unwrap();

    for len in 0..bytes.len() {
        let outcome = IndexFile::from_bytes(bytes[..len].to_vec())
            .and_then(|index| Searcher::new(&index).search("cat or dog or bird").map(|_| ()));
        assert!(outcome.is_err(), "truncated to {} bytes", len);
    }
}

#[test]
fn missing_index_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    match IndexFile::open(dir.path().join("absent.qx")) {
        Err(Error::Open { path, .. }) => assert!(path.ends_with("absent.qx")),
        other => panic!("expected open error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn appending_to_a_missing_index_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = IndexerConfig::default().with_temp_dir(dir.path());
    assert!(IndexerSession::append_to(dir.path().join("absent.qx"), config).is_err());
}
