// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint (LEB128) encoding/decoding.
//!
//! Every count, id, offset and length in an index is a varint. If decode
//! panics on malformed input, or a roundtrip drifts, nothing above it holds.

#![no_main]

use libfuzzer_sys::fuzz_target;
use leafdex::binary::{decode_varint, encode_varint, Load, MAX_VARINT_BYTES};

fuzz_target!(|data: &[u8]| {
    // decode_varint returns Ok or Err, never panics
    if let Ok((value, consumed)) = decode_varint(data) {
        assert!(consumed >= 1 && consumed <= MAX_VARINT_BYTES.min(data.len()));

        let mut reencoded = Vec::new();
        encode_varint(value, &mut reencoded);

        let (redecoded, reconsumed) = decode_varint(&reencoded)
            .expect("Re-encoding of valid value should always decode");
        assert_eq!(value, redecoded);
        assert_eq!(reconsumed, reencoded.len());

        // Re-encoding is canonical, so never longer than what we read
        assert!(reencoded.len() <= consumed);
    }

    // The same bytes read as a length-prefixed sequence
    let mut load = Load::new(data);
    if let Ok(values) = load.read_varint_seq() {
        assert!(values.len() <= data.len());
        assert!(load.position() <= data.len());
    }
});
