//! Varint and posting-list codec properties, and robustness against garbage.

use proptest::prelude::*;
use quarry::binary::{
    decode_varint, encode_varint, encode_word_entry, varint_len, FilePosting, WordEntry,
    MAX_VARINT_BYTES, STOP_MARKER,
};
use quarry::{IndexFile, Searcher};

// ============================================================================
// STRATEGIES
// ============================================================================

fn sorted_unique(max: u32, len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(0..max, 0..len).prop_map(|set| set.into_iter().collect())
}

/// Postings with ascending doc ids, each with sorted meta ids and positions.
fn postings_strategy() -> impl Strategy<Value = Vec<FilePosting>> {
    prop::collection::btree_map(
        any::<u32>(),
        (1u32..1000, any::<u32>(), sorted_unique(50, 4), sorted_unique(1_000_000, 8)),
        1..20,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|(doc_id, (occurrences, rank, meta_ids, positions))| FilePosting {
                doc_id,
                occurrences,
                rank,
                meta_ids,
                positions,
            })
            .collect()
    })
}

// ============================================================================
// VARINT
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: decoding an encoding gives back the value and consumes every byte.
    #[test]
    fn prop_varint_roundtrip(value in any::<u64>()) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        prop_assert_eq!(buf.len(), varint_len(value));
        prop_assert!(buf.len() <= MAX_VARINT_BYTES);
        prop_assert_eq!(decode_varint(&buf).unwrap(), (value, buf.len()));
    }

    /// Property: no encoding starts with the STOP marker, so STOP is unambiguous.
    #[test]
    fn prop_varint_never_starts_with_stop(value in any::<u64>()) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        prop_assert_ne!(buf[0], STOP_MARKER);
    }

    /// Property: only the last byte of an encoding has the high bit clear.
    #[test]
    fn prop_varint_continuation_bits(value in any::<u64>()) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let (last, init) = buf.split_last().unwrap();
        prop_assert!(last & 0x80 == 0);
        prop_assert!(init.iter().all(|b| b & 0x80 != 0));
    }

    /// Property: decoding arbitrary bytes never panics.
    #[test]
    fn prop_varint_decode_total(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        if let Ok((_, used)) = decode_varint(&bytes) {
            prop_assert!(used >= 1 && used <= bytes.len());
        }
    }
}

// ============================================================================
// POSTING LISTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: a word entry decodes to the postings it was built from.
    #[test]
    fn prop_word_entry_roundtrip(postings in postings_strategy()) {
        let mut buf = Vec::new();
        encode_word_entry("word", &postings, &mut buf);
        let entry = WordEntry::parse(&buf).unwrap();
        prop_assert_eq!(entry.word(), "word");

        prop_assert_eq!(entry.decode_all().unwrap(), postings);
    }

    /// Property: any prefix of a word entry decodes or fails cleanly.
    #[test]
    fn prop_truncated_entry_is_an_error(postings in postings_strategy(), cut in any::<prop::sample::Index>()) {
        let mut buf = Vec::new();
        encode_word_entry("word", &postings, &mut buf);
        let len = cut.index(buf.len());
        let outcome = WordEntry::parse(&buf[..len]).and_then(|e| e.decode_all());
        prop_assert!(outcome.is_err());
    }

    /// Property: arbitrary bytes never panic the index reader.
    #[test]
    fn prop_garbage_index_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(index) = IndexFile::from_bytes(bytes) {
            let _ = Searcher::new(&index).search("a* or not b*");
            let _ = index.stats();
        }
    }
}
