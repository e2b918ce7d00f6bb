// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only access to a built index.
//!
//! [`IndexFile`] maps the file once and hands out [`Segment`] views over it.
//! Nothing is copied or decoded at open time beyond the five offset tables'
//! counts, so opening is cheap and the OS page cache does the rest. The mapped
//! blob is immutable, so one `IndexFile` can be shared across query threads
//! (behind an `Arc`) without locking.

mod segment;

use std::fs::File;
use std::ops::{Deref, Range};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use serde::Serialize;
use tracing::debug;

use crate::binary::{
    decode_meta_name, decode_string, parse_header, DocumentRecord, OffsetTable, SegmentKind,
    WordEntry, SEGMENT_COUNT,
};
use crate::error::{Error, Result};

pub use segment::{Segment, SegmentIter};

// ============================================================================
// BLOB
// ============================================================================

/// How a mapped file is about to be read; passed to the kernel as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPattern {
    /// Merge cursors walk partial indices front to back
    Sequential,
    /// Query lookups jump around the word segment
    Random,
}

/// Bytes of an index: a read-only mapping, or an owned buffer (tests, tools).
pub enum Blob {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Blob {
    pub fn map(path: &Path, pattern: AccessPattern) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        let mmap = map_file(&file).map_err(|e| Error::open(path, e))?;

        #[cfg(unix)]
        {
            let advice = match pattern {
                AccessPattern::Sequential => memmap2::Advice::Sequential,
                AccessPattern::Random => memmap2::Advice::Random,
            };
            if let Err(e) = mmap.advise(advice) {
                debug!(path = %path.display(), error = %e, "madvise failed");
            }
        }
        #[cfg(not(unix))]
        let _ = pattern;

        Ok(Blob::Mapped(mmap))
    }
}

#[allow(unsafe_code)]
fn map_file(file: &File) -> std::io::Result<Mmap> {
    // SAFETY: index files are written once to a temporary name and renamed
    // into place; nothing modifies or truncates a file after it is published.
    unsafe { Mmap::map(file) }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Blob::Mapped(mmap) => mmap,
            Blob::Owned(bytes) => bytes,
        }
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Blob::Mapped(m) => write!(f, "Blob::Mapped({} bytes)", m.len()),
            Blob::Owned(b) => write!(f, "Blob::Owned({} bytes)", b.len()),
        }
    }
}

// ============================================================================
// INDEX FILE
// ============================================================================

/// Per-segment entry counts, for `inspect` and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub bytes: usize,
    pub words: usize,
    pub stop_words: usize,
    pub directories: usize,
    pub files: usize,
    pub meta_names: usize,
}

#[derive(Debug)]
pub struct IndexFile {
    blob: Blob,
    tables: [OffsetTable; SEGMENT_COUNT],
}

impl IndexFile {
    /// Map an index file for query service.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let index = Self::from_blob(Blob::map(path, AccessPattern::Random)?)?;
        debug!(path = %path.display(), words = index.words().len(), files = index.document_count(), "opened index");
        Ok(index)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_blob(Blob::Owned(bytes))
    }

    pub fn from_blob(blob: Blob) -> Result<Self> {
        let tables = parse_header(&blob)?;
        Ok(Self { blob, tables })
    }

    pub fn segment(&self, kind: SegmentKind) -> Segment<'_> {
        Segment::new(&self.blob, self.tables[kind.index()])
    }

    pub fn words(&self) -> Segment<'_> {
        self.segment(SegmentKind::Words)
    }

    pub fn stop_words(&self) -> Segment<'_> {
        self.segment(SegmentKind::StopWords)
    }

    pub fn directories(&self) -> Segment<'_> {
        self.segment(SegmentKind::Directories)
    }

    pub fn files(&self) -> Segment<'_> {
        self.segment(SegmentKind::Files)
    }

    pub fn meta_names(&self) -> Segment<'_> {
        self.segment(SegmentKind::MetaNames)
    }

    /// Number of indexed documents (the document-id universe).
    pub fn document_count(&self) -> usize {
        self.files().len()
    }

    pub fn document(&self, doc_id: u32) -> Result<DocumentRecord> {
        DocumentRecord::decode(self.files().get(doc_id as usize)?)
    }

    pub fn directory(&self, dir_index: u32) -> Result<&str> {
        decode_string(self.directories().get(dir_index as usize)?)
    }

    /// Full path of a document: its directory joined with its file name.
    pub fn document_path(&self, record: &DocumentRecord) -> Result<PathBuf> {
        Ok(Path::new(self.directory(record.dir_index)?).join(&record.file_name))
    }

    pub fn word_entry(&self, i: usize) -> Result<WordEntry<'_>> {
        WordEntry::parse(self.words().get(i)?)
    }

    /// Index of `word` in the word segment.
    pub fn find_word(&self, word: &str) -> Result<Option<usize>> {
        self.words().find(word.as_bytes())
    }

    /// Word-segment range of words starting with `prefix`.
    pub fn word_prefix_range(&self, prefix: &str) -> Result<Range<usize>> {
        self.words().prefix_range(prefix.as_bytes())
    }

    pub fn is_stop_word(&self, word: &str) -> Result<bool> {
        Ok(self.stop_words().find(word.as_bytes())?.is_some())
    }

    /// ID of a meta name, if any indexed file used it.
    pub fn meta_id(&self, name: &str) -> Result<Option<u32>> {
        match self.meta_names().find(name.as_bytes())? {
            Some(i) => Ok(Some(decode_meta_name(self.meta_names().get(i)?)?.1)),
            None => Ok(None),
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            bytes: self.blob.len(),
            words: self.words().len(),
            stop_words: self.stop_words().len(),
            directories: self.directories().len(),
            files: self.files().len(),
            meta_names: self.meta_names().len(),
        }
    }
}
