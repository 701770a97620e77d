// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer spans under arbitrary text.
//!
//! Spans drive highlighting in the browser. A span past the end of its leaf,
//! or one that overlaps its predecessor, garbles the page.

#![no_main]

use libfuzzer_sys::fuzz_target;
use leafdex::{tokenize, TokenMode};

fuzz_target!(|text: &str| {
    let chars = text.chars().count();

    for mode in [TokenMode::Phrasing, TokenMode::Code] {
        let mut end = 0;
        for token in tokenize(text, mode) {
            assert!(token.length > 0);
            assert!(token.start >= end, "{:?} overlaps previous token", token);
            assert!(token.start + token.length <= chars);
            end = token.start + token.length;
        }
    }
});
