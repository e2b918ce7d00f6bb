//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! Helpers panic on failure; they are for tests only.

#![doc(hidden)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::build::{IndexerConfig, IndexerSession};
use crate::index::IndexFile;
use crate::stop_words::StopWords;

/// Index `docs` as `doc0.txt`, `doc1.txt`, ... and write the index to `out`.
///
/// Document `i` gets id `i`; its size is the text length in bytes.
pub fn write_index(out: &Path, docs: &[&str], config: IndexerConfig) {
    let mut session = IndexerSession::new(config, StopWords::builtin()).unwrap();
    append_docs(&mut session, docs);
    session.finish(out).unwrap();
}

/// Feed `docs` into a session, numbering file names from its current count.
pub fn append_docs(session: &mut IndexerSession, docs: &[&str]) {
    let dir = session.add_directory("/corpus");
    for text in docs {
        let name = format!("doc{}.txt", session.document_count());
        let mut file = session.begin_file(dir, &name, text.len() as u64, None);
        file.index_text(text, None).unwrap();
    }
}

/// Build and open an index over `docs` with default settings.
///
/// Keep the returned directory alive as long as the index.
pub fn index_from_docs(docs: &[&str]) -> (TempDir, IndexFile) {
    index_with_config(docs, IndexerConfig::default())
}

pub fn index_with_config(docs: &[&str], config: IndexerConfig) -> (TempDir, IndexFile) {
    let dir = tempfile::tempdir().unwrap();
    let path = index_path(&dir);
    write_index(&path, docs, config.with_temp_dir(dir.path()));
    let index = IndexFile::open(&path).unwrap();
    (dir, index)
}

/// Where the helpers above put the index inside `dir`.
pub fn index_path(dir: &TempDir) -> PathBuf {
    dir.path().join("corpus.qx")
}
