// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index header: five offset tables, one per segment.
//!
//! The header is a run of `(count: u64, offsets: [u64; count])` tables in fixed
//! segment order. Counts and offsets are the only fixed-width integers in the
//! file. That is what makes the two-phase write work: the writer knows every
//! count before it starts, emits a header of the right size full of zero
//! offsets, streams the bodies, then seeks back and rewrites the header with
//! the offsets it collected.
//!
//! Offsets are absolute from the start of the blob. A partial index uses the
//! same table encoding with a single table.

use std::io::{self, Write};

use crate::error::{Error, Result};

use super::encoding::ByteCursor;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Number of segments in a full index
pub const SEGMENT_COUNT: usize = 5;

/// Width of a count or offset field in a table
const FIELD_WIDTH: usize = 8;

// ============================================================================
// SEGMENT KINDS
// ============================================================================

/// The five segments of an index, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Words,
    StopWords,
    Directories,
    Files,
    MetaNames,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; SEGMENT_COUNT] = [
        SegmentKind::Words,
        SegmentKind::StopWords,
        SegmentKind::Directories,
        SegmentKind::Files,
        SegmentKind::MetaNames,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SegmentKind::Words => "words",
            SegmentKind::StopWords => "stop words",
            SegmentKind::Directories => "directories",
            SegmentKind::Files => "files",
            SegmentKind::MetaNames => "meta names",
        }
    }
}

// ============================================================================
// OFFSET TABLE (read side)
// ============================================================================

/// Location of one `(count, offsets)` table inside a blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetTable {
    pub count: usize,
    /// Byte position of `offsets[0]`
    pub offsets_pos: usize,
}

impl OffsetTable {
    /// Encoded size of a table holding `count` offsets.
    pub fn byte_len(count: usize) -> usize {
        FIELD_WIDTH * (count + 1)
    }

    /// Parse a table starting at `pos`, returning it and the position just past it.
    pub fn parse(bytes: &[u8], pos: usize) -> Result<(Self, usize)> {
        let mut cursor = ByteCursor::new(bytes.get(pos..).unwrap_or_default());
        let count = cursor.read_u64_le()?;
        let offsets_pos = pos + FIELD_WIDTH;

        let table_bytes = usize::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(FIELD_WIDTH))
            .ok_or_else(|| Error::corrupt(format!("offset table count {} overflows", count)))?;
        let end = offsets_pos
            .checked_add(table_bytes)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| {
                Error::corrupt(format!(
                    "offset table of {} entries exceeds blob of {} bytes",
                    count,
                    bytes.len()
                ))
            })?;

        Ok((
            OffsetTable {
                count: count as usize,
                offsets_pos,
            },
            end,
        ))
    }

    /// Byte offset of entry `i`, checked against the blob length.
    pub fn offset(&self, bytes: &[u8], i: usize) -> Result<usize> {
        if i >= self.count {
            return Err(Error::corrupt(format!(
                "entry {} out of range ({} entries)",
                i, self.count
            )));
        }
        let pos = self.offsets_pos + i * FIELD_WIDTH;
        let raw = ByteCursor::new(&bytes[pos..]).read_u64_le()?;
        usize::try_from(raw)
            .ok()
            .filter(|&offset| offset < bytes.len())
            .ok_or_else(|| Error::corrupt(format!("entry {} offset {} outside blob", i, raw)))
    }
}

/// Parse the five tables of a full index header.
pub fn parse_header(bytes: &[u8]) -> Result<[OffsetTable; SEGMENT_COUNT]> {
    let mut tables = [OffsetTable::default(); SEGMENT_COUNT];
    let mut pos = 0;
    for table in &mut tables {
        let (parsed, next) = OffsetTable::parse(bytes, pos)?;
        *table = parsed;
        pos = next;
    }
    Ok(tables)
}

// ============================================================================
// HEADER (write side)
// ============================================================================

/// Write one `(count, offsets)` table.
pub fn write_table<W: Write>(w: &mut W, offsets: &[u64]) -> io::Result<()> {
    w.write_all(&(offsets.len() as u64).to_le_bytes())?;
    for offset in offsets {
        w.write_all(&offset.to_le_bytes())?;
    }
    Ok(())
}

/// Header of a full index under construction.
///
/// Created with the final entry counts, written once as a placeholder, filled
/// in as bodies are streamed, then written again over the placeholder.
#[derive(Debug, Clone)]
pub struct IndexHeader {
    tables: [Vec<u64>; SEGMENT_COUNT],
}

impl IndexHeader {
    pub fn placeholder(counts: [usize; SEGMENT_COUNT]) -> Self {
        Self {
            tables: counts.map(|count| vec![0; count]),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.tables.iter().map(|t| OffsetTable::byte_len(t.len())).sum()
    }

    /// Record the absolute offset of entry `i` of `kind`.
    pub fn set_offset(&mut self, kind: SegmentKind, i: usize, offset: u64) {
        self.tables[kind.index()][i] = offset;
    }

    pub fn count(&self, kind: SegmentKind) -> usize {
        self.tables[kind.index()].len()
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for table in &self.tables {
            write_table(w, table)?;
        }
        Ok(())
    }
}
