//! Tokenizer span properties.

use proptest::prelude::*;
use leafdex::{tokenize, TokenMode, Tokenizer, TokenizerConfig};

fn slice_chars(text: &str, start: usize, length: usize) -> String {
    text.chars().skip(start).take(length).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Property: phrasing spans lie inside the text, in order, without overlap.
    #[test]
    fn prop_phrasing_spans_in_bounds(text in "\\PC{0,80}") {
        let chars = text.chars().count();
        let tokens = tokenize(&text, TokenMode::Phrasing);

        let mut end = 0;
        for token in &tokens {
            prop_assert!(token.start >= end);
            prop_assert!(token.length > 0);
            prop_assert!(token.start + token.length <= chars);
            end = token.start + token.length;
        }
    }

    /// Property: with stemming off, a phrasing token is its span, lowercased.
    #[test]
    fn prop_verbatim_token_is_lowercased_span(text in "[A-Za-z ,.!?]{0,60}") {
        let tokenizer = Tokenizer::new(&TokenizerConfig::verbatim());
        for token in tokenizer.tokenize_phrasing(&text) {
            let raw = slice_chars(&text, token.start, token.length);
            prop_assert_eq!(raw.to_lowercase(), token.text);
        }
    }

    /// Property: a code token is its span, lowercased, at least three chars.
    #[test]
    fn prop_code_token_is_lowercased_span(text in "[A-Za-z0-9_ ().;=-]{0,60}") {
        for token in tokenize(&text, TokenMode::Code) {
            let raw = slice_chars(&text, token.start, token.length);
            prop_assert_eq!(raw.to_lowercase(), token.text.clone());
            prop_assert!(token.length >= 3);
            prop_assert!(!token.text.contains('_') && !token.text.contains('-'));
        }
    }

    /// Property: whitespace-only input yields no tokens in either mode.
    #[test]
    fn prop_whitespace_yields_nothing(text in "[ \t\n\r]{0,20}") {
        prop_assert!(tokenize(&text, TokenMode::Phrasing).is_empty());
        prop_assert!(tokenize(&text, TokenMode::Code).is_empty());
    }
}
