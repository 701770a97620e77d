// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! English stop words, from the NLTK list shipped by `stop-words`.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Stop-word set used by phrasing tokenization.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn english() -> Self {
        let words = get(LANGUAGE::English)
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self { words }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
