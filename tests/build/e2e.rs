//! Crawl a directory tree, build, query.

use std::fs;

use super::common::{doc_ids, run};
use quarry::{index_path, CrawlOptions, IndexFile, IndexerConfig, IndexerSession, StopWords};

#[test]
fn crawl_build_and_search() {
    let corpus = tempfile::tempdir().unwrap();
    fs::create_dir(corpus.path().join("pets")).unwrap();
    fs::write(corpus.path().join("pets").join("cat.txt"), "The cat sat on the mat.").unwrap();
    fs::write(corpus.path().join("pets").join("dog.txt"), "A dog chased the cat!").unwrap();
    fs::write(corpus.path().join("notes.md"), "Buy bird seed.").unwrap();
    fs::write(corpus.path().join("ignored.bin"), "cat cat cat").unwrap();

    let work = tempfile::tempdir().unwrap();
    let config = IndexerConfig::default().with_temp_dir(work.path()).with_word_threshold(3);
    let mut session = IndexerSession::new(config, StopWords::builtin()).unwrap();
    let stats = index_path(&mut session, corpus.path(), &CrawlOptions::default()).unwrap();
    assert_eq!(stats.files, 3);

    let out = work.path().join("corpus.qx");
    session.finish(&out).unwrap();
    let index = IndexFile::open(&out).unwrap();

    // notes.md first (name order), then pets/cat.txt, pets/dog.txt
    assert_eq!(index.document(0).unwrap().file_name, "notes.md");
    assert_eq!(doc_ids(&run(&index, "cat")), vec![1, 2]);
    assert_eq!(doc_ids(&run(&index, "cat and not chased")), vec![1]);
    assert_eq!(doc_ids(&run(&index, "bird or mat")), vec![0, 1]);

    let hit = &run(&index, "seed").hits[0];
    assert!(hit.path.ends_with("notes.md"));
    assert_eq!(hit.size, 14);
}
