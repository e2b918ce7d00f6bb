// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! N-way merge of sorted word sources into the final index.
//!
//! Each source (a partial index, or the word segment of an index being
//! appended to) is sorted by word. One cursor per source; at every step the
//! smallest current word is taken from all cursors that hold it and their
//! posting lists are concatenated in source order. Document ids are global, so
//! no renumbering is needed, and sources are in indexing order, so the
//! concatenation stays sorted by doc_id. When a flush split one document's
//! occurrences across two sources, the two postings are coalesced.
//!
//! The output is written in two passes over the sources. The first decides
//! which words are too frequent (they become stop words), which fixes every
//! table size. The second writes a placeholder header of that size, streams
//! the bodies while recording offsets, and finally seeks back to rewrite the
//! header. The whole index is never held in memory.

use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::binary::{
    encode_cstr, encode_meta_name, encode_word_entry, DocumentRecord, FilePosting, IndexHeader,
    SegmentKind, WordEntry,
};
use crate::error::{Error, Result};
use crate::index::Segment;
use crate::scoring::{posting_rank, FrequencyLimit};
use crate::stop_words::StopWords;

// ============================================================================
// MERGE CURSORS
// ============================================================================

struct Cursor<'a> {
    segment: Segment<'a>,
    next: usize,
    current: Option<WordEntry<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(segment: Segment<'a>) -> Result<Self> {
        let mut cursor = Cursor {
            segment,
            next: 0,
            current: None,
        };
        cursor.advance()?;
        Ok(cursor)
    }

    fn advance(&mut self) -> Result<()> {
        let previous = self.current.map(|entry| entry.word());
        self.current = if self.next < self.segment.len() {
            Some(WordEntry::parse(self.segment.get(self.next)?)?)
        } else {
            None
        };
        self.next += 1;

        if let (Some(prev), Some(entry)) = (previous, self.current) {
            if entry.word() <= prev {
                return Err(Error::corrupt(format!(
                    "merge source out of order: {:?} after {:?}",
                    entry.word(),
                    prev
                )));
            }
        }
        Ok(())
    }
}

/// One word with its combined posting list.
pub(crate) struct MergedWord<'a> {
    pub word: &'a str,
    pub postings: Vec<FilePosting>,
}

/// Yields words in ascending order across all sources.
pub(crate) struct WordMerger<'a> {
    cursors: Vec<Cursor<'a>>,
}

impl<'a> WordMerger<'a> {
    pub(crate) fn new(sources: &[Segment<'a>]) -> Result<Self> {
        let cursors = sources
            .iter()
            .map(|segment| Cursor::new(*segment))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { cursors })
    }

    pub(crate) fn next_word(&mut self) -> Result<Option<MergedWord<'a>>> {
        let Some(word) = self
            .cursors
            .iter()
            .filter_map(|c| c.current.map(|entry| entry.word()))
            .min()
        else {
            return Ok(None);
        };

        let mut postings = Vec::new();
        for cursor in &mut self.cursors {
            let Some(entry) = cursor.current else {
                continue;
            };
            if entry.word() != word {
                continue;
            }
            for posting in entry.postings() {
                append_posting(&mut postings, posting?)?;
            }
            cursor.advance()?;
        }

        Ok(Some(MergedWord { word, postings }))
    }
}

fn append_posting(postings: &mut Vec<FilePosting>, posting: FilePosting) -> Result<()> {
    match postings.last_mut() {
        Some(last) if last.doc_id == posting.doc_id => last.absorb(posting),
        Some(last) if last.doc_id > posting.doc_id => {
            return Err(Error::corrupt(format!(
                "posting for document {} after document {}",
                posting.doc_id, last.doc_id
            )));
        }
        _ => postings.push(posting),
    }
    Ok(())
}

/// Fill in every posting's rank from the word's total occurrence count.
fn rank_postings(postings: &mut [FilePosting], files: &[DocumentRecord]) -> Result<()> {
    let total: u64 = postings.iter().map(|p| u64::from(p.occurrences)).sum();
    for posting in postings {
        let record = files.get(posting.doc_id as usize).ok_or_else(|| {
            Error::corrupt(format!("posting for unknown document {}", posting.doc_id))
        })?;
        posting.rank = posting_rank(posting.occurrences, total, record.word_count);
    }
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Streams segment bodies after a placeholder header, recording offsets.
struct BodyWriter<W: Write + Seek> {
    w: W,
    header: IndexHeader,
    pos: u64,
}

impl<W: Write + Seek> BodyWriter<W> {
    fn new(mut w: W, header: IndexHeader) -> Result<Self> {
        header.write(&mut w)?;
        let pos = header.byte_len() as u64;
        Ok(Self { w, header, pos })
    }

    fn push(&mut self, kind: SegmentKind, i: usize, bytes: &[u8]) -> Result<()> {
        if i >= self.header.count(kind) {
            return Err(Error::corrupt(format!(
                "{} segment grew past its counted size {}",
                kind.name(),
                self.header.count(kind)
            )));
        }
        self.header.set_offset(kind, i, self.pos);
        self.w.write_all(bytes)?;
        self.pos += bytes.len() as u64;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.w.seek(SeekFrom::Start(0))?;
        self.header.write(&mut self.w)?;
        self.w.flush()?;
        Ok(())
    }
}

/// Everything besides the word sources that goes into the final index.
pub(crate) struct MergeInput<'a> {
    pub sources: Vec<Segment<'a>>,
    pub files: &'a [DocumentRecord],
    pub directories: &'a [String],
    pub meta_names: Vec<(&'a str, u32)>,
    pub limit: FrequencyLimit,
}

/// What the merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub sources: usize,
    pub words: usize,
    pub stop_words: usize,
    /// Words demoted to stop words for being in too many files
    pub demoted: Vec<String>,
}

/// Merge `input` into a new index written atomically at `out`.
pub(crate) fn write_index(
    input: &MergeInput<'_>,
    stop_words: &mut StopWords,
    out: &Path,
) -> Result<MergeSummary> {
    let total_docs = input.files.len() as u64;
    info!(sources = input.sources.len(), files = total_docs, "merging");

    // Pass 1: decide which words survive.
    let mut kept = 0usize;
    let mut demoted = Vec::new();
    let mut merger = WordMerger::new(&input.sources)?;
    while let Some(merged) = merger.next_word()? {
        if input.limit.exceeded(merged.postings.len() as u64, total_docs) {
            debug!(
                word = merged.word,
                files = merged.postings.len(),
                "word too frequent, demoted to stop word"
            );
            demoted.push(merged.word.to_string());
        } else {
            kept += 1;
        }
    }
    for word in &demoted {
        stop_words.insert(word.clone());
    }

    let stop_sorted = stop_words.sorted();
    let mut meta_names = input.meta_names.clone();
    meta_names.sort_unstable();

    let dir = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let tmp = tempfile::Builder::new()
        .prefix(".quarry-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::create(dir, e))?;

    let header = IndexHeader::placeholder([
        kept,
        stop_sorted.len(),
        input.directories.len(),
        input.files.len(),
        meta_names.len(),
    ]);
    let mut body = BodyWriter::new(BufWriter::new(tmp.as_file()), header)?;
    let mut buf = Vec::new();

    // Pass 2: stream the word segment.
    let mut merger = WordMerger::new(&input.sources)?;
    let mut i = 0;
    while let Some(mut merged) = merger.next_word()? {
        if input.limit.exceeded(merged.postings.len() as u64, total_docs) {
            continue;
        }
        rank_postings(&mut merged.postings, input.files)?;
        buf.clear();
        encode_word_entry(merged.word, &merged.postings, &mut buf);
        body.push(SegmentKind::Words, i, &buf)?;
        i += 1;
    }

    for (i, word) in stop_sorted.iter().enumerate() {
        buf.clear();
        encode_cstr(word, &mut buf);
        body.push(SegmentKind::StopWords, i, &buf)?;
    }
    for (i, dir) in input.directories.iter().enumerate() {
        buf.clear();
        encode_cstr(dir, &mut buf);
        body.push(SegmentKind::Directories, i, &buf)?;
    }
    for (i, record) in input.files.iter().enumerate() {
        buf.clear();
        record.encode(&mut buf);
        body.push(SegmentKind::Files, i, &buf)?;
    }
    for (i, (name, id)) in meta_names.iter().enumerate() {
        buf.clear();
        encode_meta_name(name, *id, &mut buf);
        body.push(SegmentKind::MetaNames, i, &buf)?;
    }
    body.finish()?;

    tmp.as_file().sync_all()?;
    tmp.persist(out).map_err(|e| Error::create(out, e.error))?;

    info!(
        words = kept,
        demoted = demoted.len(),
        stop_words = stop_sorted.len(),
        path = %out.display(),
        "index written"
    );
    Ok(MergeSummary {
        sources: input.sources.len(),
        words: kept,
        stop_words: stop_sorted.len(),
        demoted,
    })
}
