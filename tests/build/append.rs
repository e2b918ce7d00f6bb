//! Adding documents to an existing index.

use super::common::{append_docs, doc_ids, index_from_docs, index_path, run, write_index, PETS};
use quarry::{IndexFile, IndexerConfig, IndexerSession};

fn append(docs: &[&str]) -> (tempfile::TempDir, IndexFile) {
    let dir = tempfile::tempdir().unwrap();
    let path = index_path(&dir);
    write_index(&path, PETS, IndexerConfig::default().with_temp_dir(dir.path()));

    let config = IndexerConfig::default().with_temp_dir(dir.path());
    let mut session = IndexerSession::append_to(&path, config).unwrap();
    assert_eq!(session.document_count(), PETS.len());
    append_docs(&mut session, docs);
    session.finish(&path).unwrap();

    let index = IndexFile::open(&path).unwrap();
    (dir, index)
}

#[test]
fn new_documents_follow_the_old_ones() {
    let (_dir, index) = append(&["cat bird"]);
    assert_eq!(index.document_count(), 4);
    assert_eq!(index.document(3).unwrap().file_name, "doc3.txt");
    assert_eq!(index.stats().directories, 1);

    assert_eq!(doc_ids(&run(&index, "cat")), vec![0, 1, 3]);
}

#[test]
fn append_matches_a_fresh_build() {
    let (_a, appended) = append(&["cat bird", "dog dog"]);
    let (_b, fresh) = index_from_docs(&["cat dog", "cat", "dog bird", "cat bird", "dog dog"]);

    for query in ["cat", "dog", "bird", "cat or dog", "cat and bird", "not dog"] {
        let a: Vec<_> = run(&appended, query).hits.iter().map(|h| (h.doc_id, h.rank)).collect();
        let b: Vec<_> = run(&fresh, query).hits.iter().map(|h| (h.doc_id, h.rank)).collect();
        assert_eq!(a, b, "query {:?}", query);
    }
}

#[test]
fn stop_words_carry_over() {
    let (_dir, index) = append(&["the cat"]);
    assert!(index.is_stop_word("the").unwrap());
    assert_eq!(index.find_word("the").unwrap(), None);
}
