// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.
//!
//! These use `proptest` to verify the tokenizer's invariants over generated
//! inputs, including arbitrary byte soup:
//!
//! 1. **Forward progress** — an input of `N` bytes reaches EOF within
//!    `2N + 1` calls to `next_token`
//! 2. **Span well-formedness** — `start.offset <= end.offset <= N` for
//!    every token
//! 3. **Position monotonicity** — token spans never move backwards
//! 4. **Determinism** — the same bytes always lex to the same stream
//! 5. **Round trips** — known-good identifiers, integers, and plain strings
//!    survive lexing with their value intact

use std::fs;

use camino::Utf8PathBuf;
use proptest::prelude::*;
use tempfile::TempDir;

use crate::context::{Context, LangStandard};

use super::lexer::Lexer;
use super::token::{StringValue, Token, TokenKind};

fn write_source(bytes: &[u8]) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.c");
    fs::write(&path, bytes).expect("write source");
    let utf8 = Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path");
    (dir, utf8)
}

/// Lexes to EOF with a hard call budget; panics if progress stalls.
fn lex_bounded(bytes: &[u8], ctx: &Context) -> Vec<Token> {
    let (_dir, path) = write_source(bytes);
    let mut lexer = Lexer::new(&path, ctx).expect("lexer init");
    let budget = 2 * bytes.len() + 1;
    let mut tokens = Vec::new();
    for _ in 0..budget {
        let token = lexer.next_token();
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
    panic!(
        "no EOF within {budget} calls for input {:?}",
        String::from_utf8_lossy(bytes)
    );
}

fn arbitrary_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..300)
}

/// C-ish source fragments: denser in interesting structure than raw bytes.
fn c_flavored_source() -> impl Strategy<Value = String> {
    proptest::string::string_regex(
        "([a-zA-Z_][a-zA-Z0-9_]{0,5}|[0-9]{1,8}|\"[ -~]{0,8}\"|'[a-z]'|#include <[a-z.]{1,8}>|[-+*/%<>=!&|^~?:;,.(){}\\[\\]#]{1,3}|[ \t\n]{1,3}|\\\\\n|/\\* [a-z ]{0,6}\\*/|// [a-z ]{0,6}\n)*",
    )
    .expect("valid regex")
}

fn contexts() -> impl Strategy<Value = Context> {
    (
        prop::sample::select(vec![
            LangStandard::C89,
            LangStandard::C99,
            LangStandard::C11,
            LangStandard::C17,
            LangStandard::C23,
        ]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec![8u32, 16, 32]),
    )
        .prop_map(|(std, gnu, pedantic, trigraphs, wchar_bits)| {
            let mut ctx = Context::with_standard(std);
            ctx.gnu_extensions = gnu;
            ctx.pedantic = pedantic;
            ctx.enable_trigraphs = trigraphs;
            ctx.wchar_bits = wchar_bits;
            ctx
        })
}

proptest! {
    /// Property 1: forward progress on arbitrary byte soup, under every
    /// context shape. `lex_bounded` enforces the 2N+1 budget internally.
    #[test]
    fn forward_progress_on_arbitrary_bytes(bytes in arbitrary_bytes(), ctx in contexts()) {
        let tokens = lex_bounded(&bytes, &ctx);
        prop_assert!(tokens.last().is_some_and(|t| t.kind().is_eof()));
    }

    /// Property 2: every span is well-formed and inside the input.
    #[test]
    fn spans_are_well_formed(bytes in arbitrary_bytes()) {
        let ctx = Context::new();
        let tokens = lex_bounded(&bytes, &ctx);
        for token in &tokens {
            let span = token.span();
            prop_assert!(
                span.start.offset <= span.end.offset,
                "span backwards: {token:?}"
            );
            prop_assert!(
                span.end.offset <= bytes.len(),
                "span past EOF: {token:?} (len {})",
                bytes.len()
            );
        }
    }

    /// Property 3: positions move monotonically forward. Error tokens are
    /// exempt from strict progress because recovery may re-anchor.
    #[test]
    fn spans_are_monotonic(source in c_flavored_source()) {
        let ctx = Context::new();
        let tokens = lex_bounded(source.as_bytes(), &ctx);
        for window in tokens.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if a.kind().is_error() || b.kind().is_eof() {
                continue;
            }
            prop_assert!(
                a.span().end.offset <= b.span().start.offset,
                "overlap: {a:?} then {b:?} in {source:?}"
            );
        }
    }

    /// Property 4: lexing is deterministic.
    #[test]
    fn lexing_is_deterministic(bytes in arbitrary_bytes()) {
        let ctx = Context::new();
        let first = lex_bounded(&bytes, &ctx);
        let second = lex_bounded(&bytes, &ctx);
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.kind(), b.kind());
            prop_assert_eq!(a.span(), b.span());
        }
    }

    /// Property 5a: non-keyword identifiers round-trip their spelling.
    /// No keyword or directive name starts with 'q'.
    #[test]
    fn identifiers_round_trip(name in "q[a-zA-Z0-9_]{0,12}") {
        let (_dir, path) = write_source(name.as_bytes());
        let ctx = Context::new();
        let mut lexer = Lexer::new(&path, &ctx).expect("lexer init");
        let token = lexer.next_token();
        match token.kind() {
            TokenKind::Identifier(sym) => {
                prop_assert_eq!(lexer.interner().resolve(*sym), name.as_str());
            }
            other => prop_assert!(false, "expected identifier, got {:?}", other),
        }
        prop_assert!(lexer.next_token().kind().is_eof());
    }

    /// Property 5b: decimal integers round-trip their value.
    #[test]
    fn decimal_integers_round_trip(value in any::<u32>()) {
        let source = value.to_string();
        let ctx = Context::new();
        let tokens = lex_bounded(source.as_bytes(), &ctx);
        match tokens[0].kind() {
            TokenKind::Integer(v) => prop_assert_eq!(v.value, u64::from(value)),
            other => prop_assert!(false, "expected integer, got {:?}", other),
        }
    }

    /// Property 5c: escape-free plain strings round-trip their bytes
    /// (the decoded payload equals the source between the quotes).
    #[test]
    fn plain_strings_round_trip(body in "[a-zA-Z0-9 .,;:!+*/-]{0,40}") {
        let source = format!("\"{body}\"");
        let ctx = Context::new();
        let tokens = lex_bounded(source.as_bytes(), &ctx);
        match tokens[0].kind() {
            TokenKind::String(StringValue::Plain(bytes)) => {
                let mut expected = body.clone().into_bytes();
                expected.push(0);
                prop_assert_eq!(bytes, &expected);
            }
            other => prop_assert!(false, "expected plain string, got {:?}", other),
        }
    }

    /// Interning is deterministic: equal spellings share a symbol.
    #[test]
    fn interning_is_deterministic(name in "q[a-z0-9_]{0,8}") {
        let source = format!("{name} {name}");
        let (_dir, path) = write_source(source.as_bytes());
        let ctx = Context::new();
        let mut lexer = Lexer::new(&path, &ctx).expect("lexer init");
        let a = lexer.next_token();
        let b = lexer.next_token();
        prop_assert_eq!(a.kind().symbol(), b.kind().symbol());
        prop_assert!(a.kind().symbol().is_some());
    }

    /// Wide string units always fit the configured wide width.
    #[test]
    fn wide_units_fit_wchar_bits(
        body in "[ -~]{0,20}",
        bits in prop::sample::select(vec![8u32, 16, 32]),
    ) {
        let source = format!("L\"{}\"", body.replace(['"', '\\'], " "));
        let mut ctx = Context::new();
        ctx.wchar_bits = bits;
        let tokens = lex_bounded(source.as_bytes(), &ctx);
        if let TokenKind::String(StringValue::Wide(units)) = tokens[0].kind() {
            let limit: u64 = 1u64 << bits;
            for unit in units {
                prop_assert!(u64::from(*unit) < limit, "unit {unit:#x} vs {bits} bits");
            }
        }
    }
}
