// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varints, NUL-terminated strings, and a cursor.
//!
//! Varints here are big-endian base-128: the value is emitted 7 bits at a time,
//! most-significant group first, with the high bit set on every byte except the
//! last. The encoder never emits a leading `0x80` byte (a zero high group), so a
//! reader positioned at the start of a varint can tell `0x80` apart as a marker.
//! The posting codec relies on that.
//!
//! Every read goes through [`ByteCursor`], which checks bounds and turns a
//! truncated or overlong field into [`Error::CorruptIndex`] rather than reading
//! past the end of the mapped file.

use crate::error::{Error, Result};

use super::header::MAX_VARINT_BYTES;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes, most-significant group first.
pub fn encode_varint(value: u64, buf: &mut Vec<u8>) {
    let mut groups = [0u8; MAX_VARINT_BYTES];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (1..len).rev() {
        buf.push(groups[i] | 0x80);
    }
    buf.push(groups[0]);
}

/// Number of bytes `encode_varint` emits for `value`.
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty or ends before the terminating byte
/// - Varint exceeds MAX_VARINT_BYTES or overflows u64
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(Error::corrupt("empty buffer for varint"));
    }

    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
        if value >> 57 != 0 {
            return Err(Error::corrupt("varint overflows u64"));
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(Error::corrupt("varint exceeds maximum length"))
    } else {
        Err(Error::corrupt("incomplete varint"))
    }
}

// ============================================================================
// STRINGS
// ============================================================================

/// Append `s` followed by a NUL terminator.
pub fn encode_cstr(s: &str, buf: &mut Vec<u8>) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

/// Bytes of a NUL-terminated entry up to (not including) the terminator.
///
/// Used as the sort key of word, stop-word and meta-name entries.
pub fn cstr_key(entry: &[u8]) -> Result<&[u8]> {
    entry
        .iter()
        .position(|&b| b == 0)
        .map(|end| &entry[..end])
        .ok_or_else(|| Error::corrupt("unterminated string"))
}

// ============================================================================
// CURSOR
// ============================================================================

/// Bounds-checked forward reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| Error::corrupt(format!("unexpected end of data at byte {}", self.pos)))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let (value, consumed) = decode_varint(&self.bytes[self.pos.min(self.bytes.len())..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read a varint that must fit in 32 bits (ids, counts, ranks).
    pub fn read_varint_u32(&mut self) -> Result<u32> {
        let value = self.read_varint()?;
        u32::try_from(value).map_err(|_| Error::corrupt(format!("value {} exceeds u32", value)))
    }

    /// Read bytes up to a NUL, consuming the NUL.
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        let rest = &self.bytes[self.pos.min(self.bytes.len())..];
        let key = cstr_key(rest)?;
        self.pos += key.len() + 1;
        Ok(key)
    }

    /// Read a NUL-terminated UTF-8 string.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let raw = self.read_cstr()?;
        std::str::from_utf8(raw).map_err(|e| Error::corrupt(format!("invalid UTF-8: {}", e)))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let end = self
            .pos
            .checked_add(8)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| Error::corrupt(format!("truncated u64 at byte {}", self.pos)))?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(u64::from_le_bytes(raw))
    }
}
