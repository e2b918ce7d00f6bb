// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for word entries and their posting lists.
//!
//! Decoding must stop at the entry's end whatever the bytes say; unknown
//! marker lists are skipped. Anything decoded re-encodes to an entry that
//! decodes the same way.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::binary::{encode_word_entry, WordEntry};

fuzz_target!(|data: &[u8]| {
    let Ok(entry) = WordEntry::parse(data) else {
        return;
    };
    let Ok(postings) = entry.decode_all() else {
        return;
    };

    let sorted = postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id);
    let positions_sorted = postings
        .iter()
        .all(|p| p.positions.windows(2).all(|w| w[0] <= w[1]));
    if postings.is_empty() || !sorted || !positions_sorted {
        return;
    }

    let mut buf = Vec::new();
    encode_word_entry(entry.word(), &postings, &mut buf);
    let again = WordEntry::parse(&buf).and_then(|e| e.decode_all());
    assert_eq!(again.ok(), Some(postings));
});
