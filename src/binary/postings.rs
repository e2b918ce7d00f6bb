// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word entries and their posting lists.
//!
//! One word entry on disk:
//!
//! ```text
//! word bytes, NUL,
//! for each file posting (ascending doc_id):
//!     varint(doc_id) varint(occurrences) varint(rank)
//!     [META_MARKER varint(meta_id)* STOP_MARKER]
//!     [POS_MARKER  varint(delta)*   STOP_MARKER]
//!     CONTINUES_MARKER | STOP_MARKER
//! ```
//!
//! The last posting ends in STOP, every other one in CONTINUES. Position
//! deltas are distances from the previous occurrence; the first delta is the
//! absolute position. A reader that meets a marker it does not know reads
//! varints until STOP and carries on, so new optional lists can be added
//! without breaking old readers.
//!
//! STOP (`0x80`) can never start a varint, which is what lets the list
//! readers check for it before every value.

use crate::error::{Error, Result};

use super::encoding::{encode_cstr, encode_varint, ByteCursor};

// ============================================================================
// MARKERS
// ============================================================================

pub const STOP_MARKER: u8 = 0x80;
pub const CONTINUES_MARKER: u8 = 0x81;
pub const META_MARKER: u8 = 0x82;
pub const POS_MARKER: u8 = 0x83;

// ============================================================================
// FILE POSTING
// ============================================================================

/// One document's entry in a word's posting list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePosting {
    pub doc_id: u32,
    pub occurrences: u32,
    pub rank: u32,
    /// Sorted meta-name IDs the word appeared under; empty means none.
    pub meta_ids: Vec<u32>,
    /// Absolute word positions, ascending. Stored as deltas.
    pub positions: Vec<u32>,
}

impl FilePosting {
    /// Does this posting satisfy a query's meta filter? `None` matches anything.
    pub fn matches_meta(&self, meta: Option<u32>) -> bool {
        match meta {
            None => true,
            Some(id) => self.meta_ids.binary_search(&id).is_ok(),
        }
    }

    /// Fold a later chunk of the same document's occurrences into this one.
    ///
    /// Happens when a flush split a document across two partial indices.
    pub(crate) fn absorb(&mut self, later: FilePosting) {
        debug_assert_eq!(self.doc_id, later.doc_id);
        self.occurrences = self.occurrences.saturating_add(later.occurrences);
        for id in later.meta_ids {
            if let Err(at) = self.meta_ids.binary_search(&id) {
                self.meta_ids.insert(at, id);
            }
        }
        self.positions.extend(later.positions);
    }

    /// Append this posting, terminated by CONTINUES or (if `last`) STOP.
    pub fn encode(&self, last: bool, buf: &mut Vec<u8>) {
        encode_varint(u64::from(self.doc_id), buf);
        encode_varint(u64::from(self.occurrences), buf);
        encode_varint(u64::from(self.rank), buf);

        if !self.meta_ids.is_empty() {
            buf.push(META_MARKER);
            for &id in &self.meta_ids {
                encode_varint(u64::from(id), buf);
            }
            buf.push(STOP_MARKER);
        }

        if !self.positions.is_empty() {
            buf.push(POS_MARKER);
            let mut prev = 0u32;
            for &pos in &self.positions {
                encode_varint(u64::from(pos - prev), buf);
                prev = pos;
            }
            buf.push(STOP_MARKER);
        }

        buf.push(if last { STOP_MARKER } else { CONTINUES_MARKER });
    }

    /// Decode one posting. Returns it and whether another one follows.
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<(Self, bool)> {
        let mut posting = FilePosting {
            doc_id: cursor.read_varint_u32()?,
            occurrences: cursor.read_varint_u32()?,
            rank: cursor.read_varint_u32()?,
            ..FilePosting::default()
        };

        loop {
            match cursor.read_u8()? {
                CONTINUES_MARKER => return Ok((posting, true)),
                STOP_MARKER => return Ok((posting, false)),
                META_MARKER => {
                    while let Some(id) = read_list_value(cursor)? {
                        posting.meta_ids.push(id as u32);
                    }
                    posting.meta_ids.sort_unstable();
                    posting.meta_ids.dedup();
                }
                POS_MARKER => {
                    let mut abs = 0u32;
                    while let Some(delta) = read_list_value(cursor)? {
                        abs = u32::try_from(delta)
                            .ok()
                            .and_then(|d| abs.checked_add(d))
                            .ok_or_else(|| Error::corrupt("word position overflows u32"))?;
                        posting.positions.push(abs);
                    }
                }
                // Unknown list: skip its varints
                _ => while read_list_value(cursor)?.is_some() {},
            }
        }
    }
}

/// Next value of a STOP-terminated varint list, or `None` at STOP.
fn read_list_value(cursor: &mut ByteCursor<'_>) -> Result<Option<u64>> {
    if cursor.peek_u8()? == STOP_MARKER {
        cursor.read_u8()?;
        return Ok(None);
    }
    cursor.read_varint().map(Some)
}

// ============================================================================
// WORD ENTRY
// ============================================================================

/// Encode a complete word entry. `postings` must be non-empty and sorted by doc_id.
pub fn encode_word_entry(word: &str, postings: &[FilePosting], buf: &mut Vec<u8>) {
    debug_assert!(!postings.is_empty());
    debug_assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
    encode_cstr(word, buf);
    let last = postings.len().saturating_sub(1);
    for (i, posting) in postings.iter().enumerate() {
        posting.encode(i == last, buf);
    }
}

/// A word entry viewed in place.
#[derive(Debug, Clone, Copy)]
pub struct WordEntry<'a> {
    word: &'a str,
    body: &'a [u8],
}

impl<'a> WordEntry<'a> {
    pub fn parse(entry: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(entry);
        let word = cursor.read_str()?;
        Ok(WordEntry {
            word,
            body: &entry[cursor.position()..],
        })
    }

    pub fn word(&self) -> &'a str {
        self.word
    }

    pub fn postings(&self) -> PostingIter<'a> {
        PostingIter {
            cursor: ByteCursor::new(self.body),
            done: false,
        }
    }

    /// Decode every posting.
    pub fn decode_all(&self) -> Result<Vec<FilePosting>> {
        self.postings().collect()
    }
}

/// Iterator over a word's postings; stops after the first error.
pub struct PostingIter<'a> {
    cursor: ByteCursor<'a>,
    done: bool,
}

impl Iterator for PostingIter<'_> {
    type Item = Result<FilePosting>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match FilePosting::decode(&mut self.cursor) {
            Ok((posting, more)) => {
                self.done = !more;
                Some(Ok(posting))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
