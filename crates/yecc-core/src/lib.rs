// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! yecc compiler core.
//!
//! This crate contains the shipping part of the yecc C front end:
//!
//! - Lexical analysis: a byte-level tokenizer with line-splice and trigraph
//!   translation, five string-literal encodings, and error recovery
//! - Diagnostics: caret-annotated source excerpts with level-aware color
//! - Supporting infrastructure: the compiler context, string interner, and
//!   buffered byte stream the lexer is built on
//!
//! The parser, semantic analysis, IR generation, and code generation stages
//! are not implemented yet; the lexer is designed to feed a preprocessor
//! that owns directive semantics (`#if` evaluation, include search, macro
//! expansion) and consumes the directive-framing tokens produced here.
//!
//! # Example
//!
//! ```no_run
//! use yecc_core::context::Context;
//! use yecc_core::source_analysis::Lexer;
//!
//! let ctx = Context::new();
//! let mut lexer = Lexer::new("demo.c", &ctx).expect("open source");
//! loop {
//!     let token = lexer.next_token();
//!     if token.kind().is_eof() {
//!         break;
//!     }
//!     println!("{:?} at {:?}", token.kind(), token.span());
//! }
//! ```

pub mod context;
pub mod diagnostics;
pub mod intern;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::context::{Context, FloatMode, LangStandard, Warning};
    pub use crate::diagnostics::{DiagnosticsSink, Level};
    pub use crate::intern::{Interner, Symbol};
    pub use crate::source_analysis::{
        Lexer, SourcePosition, SourceSpan, Token, TokenKind,
    };
}
