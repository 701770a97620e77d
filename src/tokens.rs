// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenization of text leaves.
//!
//! Two modes, picked by the element that encloses the text:
//!
//! - **Phrasing** (everything that isn't `<code>`): Unicode word boundaries
//!   (UAX #29), lowercased, diacritics folded, stop words dropped, English
//!   Snowball stemming. "Running dogs" indexes as `run`, `dog`.
//! - **Code**: identifier runs (letters, digits, `_` and `-`), split on `_`/`-` and camel case,
//!   parts shorter than three chars or longer than the maximum token length
//!   dropped, lowercased, never stemmed.
//!   `parseHTTPResponse` indexes as `parse`, `http`, `response`.
//!
//! Spans are measured in chars of the raw leaf text, so the frontend can
//! highlight exactly what matched even when the indexed form differs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizerConfig;
use crate::stop::StopWords;
use crate::utils::{char_len, normalize, CharCursor};

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Alphabetic}\p{Nd}_-]+").expect("identifier pattern is valid"));

/// Tokenization mode, chosen by the enclosing element's tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenMode {
    Phrasing,
    Code,
}

impl TokenMode {
    pub fn for_tag(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("code") {
            TokenMode::Code
        } else {
            TokenMode::Phrasing
        }
    }
}

/// A token and its span in the raw text, in chars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Index form (normalized, possibly stemmed)
    pub text: String,
    pub start: usize,
    pub length: usize,
}

/// Tokenizer with stemming and stop-word removal
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stop_words: StopWords,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(Stemmer::create(Algorithm::English))
        } else {
            None
        };

        let stop_words = if config.remove_stopwords {
            StopWords::english()
        } else {
            StopWords::empty()
        };

        Self {
            config: config.clone(),
            stemmer,
            stop_words,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn tokenize(&self, input: &str, mode: TokenMode) -> Vec<Token> {
        match mode {
            TokenMode::Phrasing => self.tokenize_phrasing(input),
            TokenMode::Code => self.tokenize_code(input),
        }
    }

    pub fn tokenize_phrasing(&self, input: &str) -> Vec<Token> {
        let mut cursor = CharCursor::new(input);
        let mut tokens = Vec::new();

        for (byte, word) in input.unicode_word_indices() {
            let start = cursor.char_offset(byte);
            if let Some(text) = self.phrasing_form(word) {
                tokens.push(Token {
                    text,
                    start,
                    length: char_len(word),
                });
            }
        }

        tokens
    }

    pub fn tokenize_code(&self, input: &str) -> Vec<Token> {
        let mut cursor = CharCursor::new(input);
        let mut tokens = Vec::new();

        for found in IDENTIFIER_RE.find_iter(input) {
            for (offset, part) in split_identifier(found.as_str()) {
                let length = char_len(part);
                if length < self.config.min_code_token_length
                    || length > self.config.max_token_length
                {
                    continue;
                }

                let start = cursor.char_offset(found.start() + offset);
                let text = if self.config.lowercase {
                    part.to_lowercase()
                } else {
                    part.to_string()
                };

                tokens.push(Token {
                    text,
                    start,
                    length,
                });
            }
        }

        tokens
    }

    /// Normalize a phrasing word, or `None` if it shouldn't be indexed.
    fn phrasing_form(&self, word: &str) -> Option<String> {
        let text = if self.config.lowercase {
            normalize(word)
        } else {
            word.to_string()
        };

        let length = char_len(&text);
        if length < self.config.min_token_length || length > self.config.max_token_length {
            return None;
        }

        if self.stop_words.contains(&text) {
            return None;
        }

        match &self.stemmer {
            Some(stemmer) => {
                let stemmed = stemmer.stem(&text);
                if stemmed.is_empty() {
                    Some(text)
                } else {
                    Some(stemmed.into_owned())
                }
            }
            None => Some(text),
        }
    }
}

/// Tokenize with the default configuration.
pub fn tokenize(input: &str, mode: TokenMode) -> Vec<Token> {
    Tokenizer::default().tokenize(input, mode)
}

/// Split an identifier into its words, returning `(byte offset, part)`.
///
/// `_` and `-` separate parts. Within a part, a new word starts at an
/// uppercase char preceded by a lowercase char or digit, and at the last
/// uppercase char of an uppercase run followed by a lowercase char.
fn split_identifier(ident: &str) -> Vec<(usize, &str)> {
    let chars: Vec<(usize, char)> = ident.char_indices().collect();
    let slice = |from: usize, to: usize| {
        let begin = chars[from].0;
        let end = chars.get(to).map_or(ident.len(), |&(b, _)| b);
        (begin, &ident[begin..end])
    };

    let mut parts = Vec::new();
    let mut start: Option<usize> = None;

    for i in 0..chars.len() {
        let c = chars[i].1;
        if c == '_' || c == '-' {
            if let Some(s) = start.take() {
                parts.push(slice(s, i));
            }
            continue;
        }

        match start {
            None => start = Some(i),
            Some(s) => {
                let prev = chars[i - 1].1;
                let next_is_lower = chars.get(i + 1).is_some_and(|&(_, n)| n.is_lowercase());
                let boundary = c.is_uppercase()
                    && (prev.is_lowercase()
                        || prev.is_numeric()
                        || (prev.is_uppercase() && next_is_lower));
                if boundary {
                    parts.push(slice(s, i));
                    start = Some(i);
                }
            }
        }
    }

    if let Some(s) = start {
        parts.push(slice(s, chars.len()));
    }

    parts
}
