// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index decoding under adversarial input.
//!
//! Index files are fetched by browsers from wherever the site is hosted. A
//! damaged or crafted buffer must produce an error, never a panic, a hang, or
//! an allocation sized by whatever count the attacker wrote.

#![no_main]

use libfuzzer_sys::fuzz_target;
use leafdex::binary::MAGIC_BYTES;
use leafdex::{Index, IndexDoc};

fuzz_target!(|data: &[u8]| {
    // Give the fuzzer a head start past the magic check half the time
    let mut bytes = Vec::with_capacity(data.len() + 4);
    if data.first().is_some_and(|b| b & 1 == 1) {
        bytes.extend_from_slice(&MAGIC_BYTES);
        bytes.extend_from_slice(&data[1..]);
    } else {
        bytes.extend_from_slice(data);
    }

    if let Ok(index) = Index::<IndexDoc>::load(&bytes) {
        // INVARIANT: every posting resolves to a location and a document
        for found in index.search("") {
            let location = index
                .locations()
                .get(found.location)
                .expect("postings resolve after a successful load");
            assert!(index.document(location.doc_id).is_some());
        }

        let _ = index.query("fuzz", None);
    }
});
