//! Words in too many files become stop words during the merge.

use super::common::{append_docs, index_path, run, PETS};
use quarry::{IndexFile, IndexerConfig, IndexerSession, StopWords};

fn build(config: IndexerConfig) -> (tempfile::TempDir, IndexFile, quarry::MergeSummary) {
    let dir = tempfile::tempdir().unwrap();
    let mut session = IndexerSession::new(config.with_temp_dir(dir.path()), StopWords::builtin()).unwrap();
    append_docs(&mut session, PETS);
    let path = index_path(&dir);
    let summary = session.finish(&path).unwrap();
    let index = IndexFile::open(&path).unwrap();
    (dir, index, summary)
}

#[test]
fn absolute_limit_demotes_common_words() {
    let (_dir, index, summary) = build(IndexerConfig::default().with_files_max(1));
    assert_eq!(summary.demoted, vec!["cat".to_string(), "dog".to_string()]);
    assert_eq!(summary.words, 1);

    assert!(index.is_stop_word("cat").unwrap());
    assert_eq!(index.find_word("cat").unwrap(), None);
    assert!(index.find_word("bird").unwrap().is_some());

    let results = run(&index, "cat");
    assert_eq!(results.total, 0);
    assert_eq!(results.ignored, vec!["cat".to_string()]);
}

#[test]
fn percentage_limit_demotes_common_words() {
    let (_dir, index, summary) = build(IndexerConfig::default().with_word_percent_max(50));
    assert_eq!(summary.demoted.len(), 2);
    assert_eq!(run(&index, "bird").total, 1);
}

#[test]
fn no_limit_keeps_everything() {
    let (_dir, index, summary) = build(IndexerConfig::default());
    assert!(summary.demoted.is_empty());
    assert_eq!(index.words().len(), 3);
    // Built-in list lands in the stop-word segment
    assert_eq!(summary.stop_words, StopWords::builtin().len());
    assert!(index.stop_words().is_sorted().unwrap());
}
