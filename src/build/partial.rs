// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Partial indices: the sorted word map flushed to a temporary file.
//!
//! Layout is one offset table followed by word entries, in word order. Ranks
//! are written as zero; the merge computes real ranks once every occurrence of
//! a word is known. These files are disposable and live in the session's
//! temporary directory.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::binary::{encode_word_entry, write_table, FilePosting, OffsetTable};
use crate::error::{Error, Result};
use crate::index::{AccessPattern, Blob, Segment};

/// Write `words` as a partial index at `path`.
pub(crate) fn write_partial(path: &Path, words: &BTreeMap<String, Vec<FilePosting>>) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::create(path, e))?;
    let mut w = BufWriter::new(file);

    let mut offsets = vec![0u64; words.len()];
    write_table(&mut w, &offsets)?;

    let mut pos = OffsetTable::byte_len(words.len()) as u64;
    let mut buf = Vec::new();
    for (slot, (word, postings)) in offsets.iter_mut().zip(words) {
        buf.clear();
        encode_word_entry(word, postings, &mut buf);
        w.write_all(&buf)?;
        *slot = pos;
        pos += buf.len() as u64;
    }

    w.seek(SeekFrom::Start(0))?;
    write_table(&mut w, &offsets)?;
    w.flush()?;
    Ok(())
}

/// A mapped partial index, read front to back by the merge.
#[derive(Debug)]
pub(crate) struct PartialIndex {
    blob: Blob,
    table: OffsetTable,
}

impl PartialIndex {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let blob = Blob::map(path, AccessPattern::Sequential)?;
        let (table, _) = OffsetTable::parse(&blob, 0)?;
        Ok(Self { blob, table })
    }

    pub(crate) fn words(&self) -> Segment<'_> {
        Segment::new(&self.blob, self.table)
    }
}
