//! Property-based tests for the lexer and the parse/emit pipeline.
//!
//! 1. **Whitespace and comments produce nothing**: no tokens, no diagnostics
//! 2. **Lexer never panics**: arbitrary input always produces a token list
//! 3. **Lexer is deterministic**: same input, same tokens and diagnostics
//! 4. **Tokens are ordered**: token locations never move backwards
//! 5. **Keywords are exact**: any other word lexes as an identifier
//! 6. **Parsed trees always lower**: whatever the parser accepts, the
//!    emitter lowers the same way every time

use proptest::prelude::*;

use scriptc::ir::emit;
use scriptc::parser::{parse, tokenize, Lexer, TokenKind};

// ============================================================================
// Generators
// ============================================================================

const KEYWORDS: &[&str] = &["main", "function", "for", "if", "else", "return"];

/// Fragments that combine into plausible (often invalid) programs
const FRAGMENTS: &[&str] = &[
    "main", "function", "if", "else", "for", "return", "x", "f", "a", "1", "2.5", "\"s\"", "(",
    ")", "{", "}", "[", "]", "=", "==", "+", "-", "<=", ":", ";", ",",
];

fn trivia() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof!["[ \t\r\n\u{0B}\u{0C}]{1,4}", "#[^\n]{0,20}\n?"],
        0..12,
    )
    .prop_map(|pieces| pieces.concat())
}

fn fragment_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.join(" "))
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn trivia_produces_no_tokens(input in trivia()) {
        let mut lexer = Lexer::new(&input);
        let tokens = lexer.tokenize();
        prop_assert!(tokens.is_empty(), "tokens {:?} from {:?}", tokens, input);
        prop_assert!(lexer.diagnostics().is_empty());
    }

    #[test]
    fn lexer_never_panics(input in "\\PC{0,300}") {
        let _tokens = tokenize(&input);
    }

    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,300}") {
        let mut first = Lexer::new(&input);
        let mut second = Lexer::new(&input);
        prop_assert_eq!(first.tokenize(), second.tokenize());
        prop_assert_eq!(first.diagnostics(), second.diagnostics());
    }

    #[test]
    fn token_locations_are_ordered(input in "\\PC{0,300}") {
        let tokens = tokenize(&input);
        for window in tokens.windows(2) {
            let prev = (window[0].location.line, window[0].location.column);
            let next = (window[1].location.line, window[1].location.column);
            prop_assert!(next > prev, "{:?} then {:?} in {:?}", window[0], window[1], input);
        }
    }

    #[test]
    fn non_keyword_words_are_identifiers(word in "[a-z_][a-z0-9_]{0,8}") {
        prop_assume!(!KEYWORDS.contains(&word.as_str()));
        let tokens = tokenize(&word);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
        prop_assert_eq!(&tokens[0].text, &word);
    }

    #[test]
    fn parsed_trees_always_lower(input in fragment_soup()) {
        if let Ok(program) = parse(tokenize(&input)) {
            let first = emit(&program);
            prop_assert!(first.is_ok(), "{:?} failed to lower: {:?}", input, first);
            prop_assert_eq!(first, emit(&program));
        }
    }
}
