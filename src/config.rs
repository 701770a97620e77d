// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Tokenizer configuration
///
/// Building and querying must use the same configuration, otherwise query
/// tokens won't line up with what was indexed (a stemmed index searched with
/// unstemmed queries finds "run" but never "running").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    /// Minimum phrasing token length, in chars
    pub min_token_length: usize,
    /// Maximum token length in chars, for phrasing words and code parts alike
    pub max_token_length: usize,
    /// Minimum length of an identifier part in code
    pub min_code_token_length: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stem: true,
            min_token_length: 1,
            max_token_length: 64,
            min_code_token_length: 3,
        }
    }
}

impl TokenizerConfig {
    /// Configuration that keeps every word as written (lowercased).
    pub fn verbatim() -> Self {
        Self {
            remove_stopwords: false,
            stem: false,
            ..Self::default()
        }
    }
}
