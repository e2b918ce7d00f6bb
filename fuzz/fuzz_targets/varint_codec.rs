// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint encoding/decoding.
//!
//! Every list in the index is made of varints terminated by a marker byte.
//! Garbage must decode to an error, never a panic, and anything that does
//! decode must survive a re-encode unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::binary::{decode_varint, encode_varint, MAX_VARINT_BYTES, STOP_MARKER};

fuzz_target!(|data: &[u8]| {
    let Ok((value, consumed)) = decode_varint(data) else {
        return;
    };
    assert!(consumed >= 1 && consumed <= MAX_VARINT_BYTES);

    let mut reencoded = Vec::new();
    encode_varint(value, &mut reencoded);
    assert_ne!(reencoded[0], STOP_MARKER, "encoding of {} starts with STOP", value);

    let (redecoded, reconsumed) =
        decode_varint(&reencoded).expect("re-encoding of a decoded value must decode");
    assert_eq!(value, redecoded);
    assert_eq!(reconsumed, reencoded.len());
});
