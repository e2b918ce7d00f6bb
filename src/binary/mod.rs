// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for quarry indexes.
//!
//! An index is written once and then memory-mapped read-only by every query.
//! Nothing is decoded up front: the header says where each entry starts, and
//! lookups binary-search the offset tables and decode only the entries they
//! touch.
//!
//! # Format Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER: five tables, in segment order                      │
//! │   count: u64 (little-endian)                               │
//! │   offsets: [u64; count] (absolute byte offsets)            │
//! ├────────────────────────────────────────────────────────────┤
//! │ WORDS (sorted by word bytes)                               │
//! │   word NUL, file postings (see postings.rs)                │
//! ├────────────────────────────────────────────────────────────┤
//! │ STOP WORDS (sorted)                                        │
//! │   word NUL                                                 │
//! ├────────────────────────────────────────────────────────────┤
//! │ DIRECTORIES (first-encounter order)                        │
//! │   path NUL                                                 │
//! ├────────────────────────────────────────────────────────────┤
//! │ FILES (document id order)                                  │
//! │   varint(dir) name NUL varint(size) varint(words) title NUL│
//! ├────────────────────────────────────────────────────────────┤
//! │ META NAMES (sorted by name)                                │
//! │   name NUL varint(id)                                      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! A partial index (temporary, produced by a flush during indexing) is a single
//! table followed by word entries in the same encoding.
//!
//! # Corrupt input
//!
//! Every reader is bounds-checked. A truncated file, an offset past the end,
//! an unterminated string or varint all surface as
//! [`Error::CorruptIndex`](crate::Error::CorruptIndex).

mod encoding;
mod header;
mod postings;
mod records;

pub use encoding::{cstr_key, decode_varint, encode_cstr, encode_varint, varint_len, ByteCursor};
pub use header::{
    parse_header, write_table, IndexHeader, OffsetTable, SegmentKind, MAX_VARINT_BYTES,
    SEGMENT_COUNT,
};
pub use postings::{
    encode_word_entry, FilePosting, PostingIter, WordEntry, CONTINUES_MARKER, META_MARKER,
    POS_MARKER, STOP_MARKER,
};
pub use records::{decode_meta_name, decode_string, encode_meta_name, DocumentRecord};
