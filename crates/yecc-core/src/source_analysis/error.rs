// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the byte stream and lexer setup.
//!
//! Lexical problems inside a source file never surface here: the lexer
//! recovers in-band, emitting diagnostics and [`TokenKind::Error`] tokens.
//! This module only covers failures to get a token stream going at all,
//! which is the one case where [`Lexer::new`] refuses to construct.
//!
//! [`TokenKind::Error`]: super::TokenKind::Error
//! [`Lexer::new`]: super::Lexer::new

use camino::Utf8PathBuf;
use thiserror::Error;

/// A failure to open or read the underlying source file.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The file could not be opened or its length determined.
    #[error("cannot open '{path}': {source}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A read from the file failed after it was successfully opened.
    #[error("read error in '{path}' at offset {offset}: {source}")]
    Read {
        /// Path being read.
        path: Utf8PathBuf,
        /// Byte offset of the failed read.
        offset: usize,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
