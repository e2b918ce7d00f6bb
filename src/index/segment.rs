// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Random-access view of one segment.
//!
//! Entry `i` spans from its offset to the next entry's offset (or the end of
//! the blob for the last one). The words, stop-word and meta-name segments are
//! sorted by their NUL-terminated key, so lookups are binary searches over the
//! offset table: O(log n) to find a word, O(log n + k) for a prefix range of k
//! words.

use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::binary::{cstr_key, OffsetTable};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    bytes: &'a [u8],
    table: OffsetTable,
}

impl<'a> Segment<'a> {
    pub(crate) fn new(bytes: &'a [u8], table: OffsetTable) -> Self {
        Self { bytes, table }
    }

    pub fn len(&self) -> usize {
        self.table.count
    }

    pub fn is_empty(&self) -> bool {
        self.table.count == 0
    }

    /// Bytes of entry `i`.
    pub fn get(&self, i: usize) -> Result<&'a [u8]> {
        let start = self.table.offset(self.bytes, i)?;
        let end = if i + 1 < self.table.count {
            self.table.offset(self.bytes, i + 1)?
        } else {
            self.bytes.len()
        };
        if start > end {
            return Err(Error::corrupt(format!(
                "entry {} starts at {} after next entry at {}",
                i, start, end
            )));
        }
        Ok(&self.bytes[start..end])
    }

    /// Sort key of entry `i`: its bytes up to the first NUL.
    pub fn key(&self, i: usize) -> Result<&'a [u8]> {
        cstr_key(self.get(i)?)
    }

    pub fn iter(&self) -> SegmentIter<'a> {
        SegmentIter {
            segment: *self,
            front: 0,
            back: self.table.count,
        }
    }

    /// First index whose key does not satisfy `pred` (keys must be partitioned).
    pub fn partition_point<F>(&self, mut pred: F) -> Result<usize>
    where
        F: FnMut(&[u8]) -> bool,
    {
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(self.key(mid)?) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }

    /// Range of entries whose key equals `key` (empty or one entry in a valid index).
    pub fn equal_range(&self, key: &[u8]) -> Result<Range<usize>> {
        let start = self.partition_point(|k| k < key)?;
        let end = self.partition_point(|k| k <= key)?;
        Ok(start..end)
    }

    pub fn find(&self, key: &[u8]) -> Result<Option<usize>> {
        let range = self.equal_range(key)?;
        Ok((!range.is_empty()).then_some(range.start))
    }

    /// Range of entries whose key starts with `prefix`.
    ///
    /// Compares only the first `prefix.len()` bytes of each key, which keeps
    /// the key order partitioned.
    pub fn prefix_range(&self, prefix: &[u8]) -> Result<Range<usize>> {
        let bounded = |k: &[u8]| k[..k.len().min(prefix.len())].cmp(prefix);
        let start = self.partition_point(|k| bounded(k) == Ordering::Less)?;
        let end = self.partition_point(|k| bounded(k) != Ordering::Greater)?;
        Ok(start..end.max(start))
    }

    /// Check that keys are non-decreasing.
    pub fn is_sorted(&self) -> Result<bool> {
        for i in 1..self.len() {
            if self.key(i - 1)? > self.key(i)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Double-ended iterator over segment entries.
pub struct SegmentIter<'a> {
    segment: Segment<'a>,
    front: usize,
    back: usize,
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.segment.get(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for SegmentIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.segment.get(self.back))
    }
}

impl ExactSizeIterator for SegmentIter<'_> {}
impl FusedIterator for SegmentIter<'_> {}
