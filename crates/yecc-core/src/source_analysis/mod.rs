// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for C source.
//!
//! This module contains the byte stream, the token types, and the lexer
//! itself — the front half of the front end. The [`Lexer`] converts a source
//! file into a stream of [`Token`]s with precise [`SourceSpan`]s, recovering
//! from malformed input instead of stopping:
//!
//! - **Error recovery**: malformed input yields [`TokenKind::Error`] tokens
//!   and diagnostics; [`Lexer::next_token`] always makes progress.
//! - **Translation phases**: line splices and (when enabled) trigraphs are
//!   elided/mapped transparently on every consuming read.
//! - **Context sensitivity**: directive lines classify `include`/`define`/…
//!   as directive keywords and read `<stdio.h>` as a header name; the same
//!   spellings elsewhere are plain identifiers.
//!
//! Diagnostics go to the sink in [`crate::diagnostics`]; spellings are
//! interned in the lexer's [`Interner`](crate::intern::Interner).

mod error;
mod keywords;
mod lexer;
mod number;
mod span;
mod stream;
mod string;
mod token;

// Property-based tests for the lexer invariants.
#[cfg(test)]
mod lexer_property_tests;

pub use error::StreamError;
pub use lexer::{Lexer, PpDirectiveKind};
pub use span::{SourcePosition, SourceSpan};
pub use stream::{Blob, ByteStream, STREAM_BUFFER_SIZE};
pub use token::{
    CharValue, Encoding, FloatStyle, FloatSuffix, FloatValue, IntBase, IntSize, IntegerValue,
    Keyword, Punct, PpKeyword, StringValue, Token, TokenKind,
};
