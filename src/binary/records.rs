// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Entries of the directory, file, stop-word and meta-name segments.

use serde::Serialize;

use crate::error::{Error, Result};

use super::encoding::{encode_cstr, encode_varint, ByteCursor};

/// One indexed file. Its document id is its position in the file segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    /// Index into the directory segment
    pub dir_index: u32,
    pub file_name: String,
    pub size: u64,
    /// Words counted in the file, stop words included
    pub word_count: u32,
    /// Title, defaults to the file name
    pub title: String,
}

impl DocumentRecord {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_varint(u64::from(self.dir_index), buf);
        encode_cstr(&self.file_name, buf);
        encode_varint(self.size, buf);
        encode_varint(u64::from(self.word_count), buf);
        encode_cstr(&self.title, buf);
    }

    pub fn decode(entry: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(entry);
        Ok(DocumentRecord {
            dir_index: cursor.read_varint_u32()?,
            file_name: cursor.read_str()?.to_string(),
            size: cursor.read_varint()?,
            word_count: cursor.read_varint_u32()?,
            title: cursor.read_str()?.to_string(),
        })
    }
}

/// Encode a meta-name entry: `name NUL varint(id)`.
pub fn encode_meta_name(name: &str, id: u32, buf: &mut Vec<u8>) {
    encode_cstr(name, buf);
    encode_varint(u64::from(id), buf);
}

pub fn decode_meta_name(entry: &[u8]) -> Result<(&str, u32)> {
    let mut cursor = ByteCursor::new(entry);
    let name = cursor.read_str()?;
    let id = cursor.read_varint_u32()?;
    Ok((name, id))
}

/// Decode a plain NUL-terminated string entry (stop words, directories).
pub fn decode_string(entry: &[u8]) -> Result<&str> {
    ByteCursor::new(entry)
        .read_str()
        .map_err(|e| Error::corrupt(format!("bad string entry: {}", e)))
}
