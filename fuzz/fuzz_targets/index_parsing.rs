// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for reading a whole index blob.
//!
//! Offsets, counts and records all come from the file. A corrupt file must
//! surface as `CorruptIndex`, never as a panic or an out-of-bounds read.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::binary::WordEntry;
use quarry::{IndexFile, Searcher};

fuzz_target!(|data: &[u8]| {
    let Ok(index) = IndexFile::from_bytes(data.to_vec()) else {
        return;
    };

    let _ = index.stats();
    for bytes in index.words().iter().take(64).flatten() {
        if let Ok(word) = WordEntry::parse(bytes) {
            let _ = word.decode_all();
        }
    }
    for doc in 0..index.document_count().min(64) {
        let _ = index.document(doc as u32);
    }
    let _ = index.meta_id("title");
    let _ = Searcher::new(&index).search("a* or not (b near c)");
});
