// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! The tokenizer.
//!
//! [`Lexer::next_token`] drives a byte-level state machine over the
//! [`ByteStream`]: it skips whitespace and comments, frames preprocessor
//! directives, and dispatches to the literal decoders. Two translation
//! phases are applied on every consuming read — line-splice elision and
//! (when enabled) trigraph replacement — so the token-building code never
//! sees a `\`-newline or a `??=`.
//!
//! # Error Recovery
//!
//! The lexer never fails and never stops early. Malformed input produces
//! [`TokenKind::Error`] tokens carrying an interned reason, diagnostics go
//! to the sink, and lexing resumes at the next newline or `;`. End of input
//! is an ordinary [`TokenKind::Eof`] token.
//!
//! # Directive framing
//!
//! A `#` at the start of a line (also spelled `??=` or `%:` when trigraphs
//! are enabled) puts the lexer in directive context until the end of the
//! logical line. In that context, directive names classify as
//! [`TokenKind::PpKeyword`] and the include family arms header-name mode for
//! the token that follows.

use tracing::{debug, trace};

use camino::Utf8Path;

use crate::context::{Context, LangStandard, Warning};
use crate::diagnostics::DiagnosticsSink;
use crate::intern::Interner;

use super::error::StreamError;
use super::keywords::{self, C23Status, KwEntry, KwKind, SpellingForm};
use super::span::SourceSpan;
use super::stream::ByteStream;
use super::string::encode_utf8_into;
use super::token::{Punct, PpKeyword, Token, TokenKind};

/// Which directive the current line opened with, once known.
///
/// Only the include family matters to the lexer itself: it decides whether
/// the next token is read in header-name mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PpDirectiveKind {
    /// No directive keyword seen yet on this line.
    #[default]
    None,
    /// `#include`.
    Include,
    /// `#include_next`.
    IncludeNext,
    /// `#import`.
    Import,
    /// `#embed`.
    Embed,
    /// Any other directive.
    Other,
}

/// The nine trigraphs: third byte of `??x` to its replacement.
const TRIGRAPHS: &[(u8, u8)] = &[
    (b'=', b'#'),
    (b'/', b'\\'),
    (b'\'', b'^'),
    (b'(', b'['),
    (b')', b']'),
    (b'!', b'|'),
    (b'<', b'{'),
    (b'>', b'}'),
    (b'-', b'~'),
];

/// Digraph spellings and their primary punctuator spellings, longest first.
const DIGRAPHS: &[(&str, &str)] = &[
    ("%:%:", "##"),
    ("<:", "["),
    (":>", "]"),
    ("<%", "{"),
    ("%>", "}"),
    ("%:", "#"),
];

/// The yecc tokenizer.
///
/// One lexer owns one source file, the interner its spellings live in, and
/// the diagnostics sink its complaints go to. Construct with [`Lexer::new`]
/// and pull tokens with [`Lexer::next_token`]; the iterator form yields
/// every token before EOF.
pub struct Lexer<'ctx> {
    pub(super) stream: ByteStream,
    pub(super) ctx: &'ctx Context,
    pub(super) diag: DiagnosticsSink,
    pub(super) interner: Interner,
    pub(super) at_line_start: bool,
    pub(super) in_directive: bool,
    pub(super) pp_kind: PpDirectiveKind,
    pub(super) expect_header_name: bool,
    finished: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("path", &self.stream.path())
            .field("position", &self.stream.position())
            .field("in_directive", &self.in_directive)
            .finish_non_exhaustive()
    }
}

impl<'ctx> Lexer<'ctx> {
    /// Opens `path` and primes the lexer: strips a leading byte-order mark
    /// and resets the directive state.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] when the file cannot be opened; there is no
    /// token stream in that case.
    pub fn new(path: impl AsRef<Utf8Path>, ctx: &'ctx Context) -> Result<Self, StreamError> {
        let mut stream = ByteStream::open(path)?;
        let stripped = stream.strip_bom();
        let diag = DiagnosticsSink::new(stream.path(), ctx.color_mode);
        debug!(path = %stream.path(), bom = stripped, "lexer initialized");
        Ok(Self {
            stream,
            ctx,
            diag,
            interner: Interner::new(),
            at_line_start: true,
            in_directive: false,
            pp_kind: PpDirectiveKind::None,
            expect_header_name: false,
            finished: false,
        })
    }

    /// The interner holding this lexer's spellings.
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// The diagnostics sink, for error/warning counts.
    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsSink {
        &self.diag
    }

    /// Current position in the source.
    #[must_use]
    pub fn position(&self) -> super::span::SourcePosition {
        self.stream.position()
    }

    /// Lexes every remaining token, ending with the EOF token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind().is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Produces the next token. Always succeeds; end of input is
    /// [`TokenKind::Eof`], malformed input [`TokenKind::Error`].
    pub fn next_token(&mut self) -> Token {
        let token = self.lex_token();
        if self.ctx.trace_lexer {
            trace!(
                kind = %token.kind(),
                line = token.span().start.line,
                column = token.span().start.column,
                "token"
            );
        }
        token
    }

    fn lex_token(&mut self) -> Token {
        self.skip_space_and_comments();

        if self.at_line_start {
            let saved = self.stream.save_state();
            self.skip_pp_hspace();

            let blob = self.stream.blob();
            let is_hash = blob[2] == b'#';
            let tri_hash = blob[2] == b'?' && blob[3] == b'?' && blob[4] == b'=';
            let dig_hash = blob[2] == b'%' && blob[3] == b':';

            if is_hash || (self.ctx.enable_trigraphs && (tri_hash || dig_hash)) {
                self.at_line_start = false;
                self.in_directive = true;
                self.pp_kind = PpDirectiveKind::None;
                self.expect_header_name = false;
                return self.read_punctuator();
            }
            self.stream.restore_state(saved);
        }

        if self.in_directive {
            self.skip_pp_hspace();
            if self.stream.peek() == Some(b'\n') {
                self.stream.next();
                self.at_line_start = true;
                self.in_directive = false;
            }
        }

        let pos = self.stream.position();
        if self.stream.eof() {
            return Token::new(TokenKind::Eof, SourceSpan::at(pos));
        }

        let c = self.stream.peek().unwrap_or(0);
        let lookahead = self.stream.blob();

        if c.is_ascii_digit() || (c == b'.' && lookahead[3].is_ascii_digit()) {
            self.at_line_start = false;
            return self.read_number();
        }

        if self.in_directive && self.expect_header_name {
            let include_like = matches!(
                self.pp_kind,
                PpDirectiveKind::Include | PpDirectiveKind::IncludeNext
            );
            if include_like && c == b'<' {
                let token = self.read_header_name();
                self.expect_header_name = false;
                return token;
            }
            let quoted_ok = include_like
                || matches!(self.pp_kind, PpDirectiveKind::Import | PpDirectiveKind::Embed);
            if quoted_ok && c == b'"' {
                let token = self.read_quoted_header_name();
                self.expect_header_name = false;
                return token;
            }
            self.expect_header_name = false;
        }

        let string_prefix = (c == b'u' || c == b'U' || c == b'L') && lookahead[3] == b'"'
            || c == b'u' && lookahead[3] == b'8' && lookahead[4] == b'"';
        if c == b'"' || string_prefix {
            self.at_line_start = false;
            return self.read_string_literal();
        }

        let char_prefix = (c == b'u' || c == b'U' || c == b'L') && lookahead[3] == b'\''
            || c == b'u' && lookahead[3] == b'8' && lookahead[4] == b'\'';
        if c == b'\'' || char_prefix {
            self.at_line_start = false;
            return self.read_char_literal();
        }

        if c.is_ascii_alphabetic()
            || c == b'_'
            || c >= 0x80
            || (self.ctx.gnu_extensions && c == b'$')
        {
            self.at_line_start = false;
            return self.read_ident();
        }

        self.at_line_start = false;
        self.read_punctuator()
    }

    // ========================================================================
    // Translation phases
    // ========================================================================

    /// Elides `\`-newline (and `\`-CR-LF) sequences at the current position.
    pub(super) fn skip_line_splices(&mut self) {
        loop {
            let blob = self.stream.blob();
            if blob[2] == b'\\' && (blob[3] == b'\n' || (blob[3] == b'\r' && blob[4] == b'\n')) {
                self.stream.next();
                self.stream.next();
                if blob[3] == b'\r' {
                    self.stream.next();
                }
                continue;
            }
            return;
        }
    }

    /// Recognizes a trigraph at the current position.
    ///
    /// On a hit with trigraphs enabled, consumes all three bytes and returns
    /// the replacement. Otherwise the stream is restored to where it was;
    /// a hit with trigraphs disabled is diagnosed but not translated.
    fn try_trigraph(&mut self) -> Option<u8> {
        if self.stream.peek() != Some(b'?') {
            return None;
        }
        let start = self.stream.position();
        self.stream.next();
        if self.stream.peek() != Some(b'?') {
            self.stream.unget();
            return None;
        }
        self.stream.next();
        let Some(third) = self.stream.peek() else {
            self.stream.unget();
            self.stream.unget();
            return None;
        };
        let Some(&(_, replacement)) = TRIGRAPHS.iter().find(|(pat, _)| *pat == third) else {
            self.stream.unget();
            self.stream.unget();
            return None;
        };

        let end = self.stream.position();
        self.stream.next();
        let span = SourceSpan::new(start, end);
        let spelling = format!("??{}", third as char);

        if !self.ctx.enable_trigraphs {
            self.alt_token_diag(span, "trigraph", &spelling);
            self.stream.unget();
            self.stream.unget();
            self.stream.unget();
            return None;
        }

        self.alt_token_diag(span, "trigraph", &spelling);
        Some(replacement)
    }

    /// One consuming read with both translation phases applied.
    pub(super) fn next_translated(&mut self) -> Option<u8> {
        self.skip_line_splices();
        if let Some(mapped) = self.try_trigraph() {
            return Some(mapped);
        }
        self.stream.next()
    }

    /// Skips horizontal preprocessor whitespace (space, tab, VT, FF),
    /// honoring line splices.
    pub(super) fn skip_pp_hspace(&mut self) {
        loop {
            let blob = self.stream.blob();
            if blob[2] == b'\\' && blob[3] == b'\n' {
                self.stream.next();
                self.stream.next();
                continue;
            }
            if blob[2] == b'\\' && blob[3] == b'\r' && blob[4] == b'\n' {
                self.stream.next();
                self.stream.next();
                self.stream.next();
                continue;
            }
            match self.stream.peek() {
                Some(b' ' | b'\t' | 0x0B | 0x0C) => {
                    self.stream.next();
                }
                _ => break,
            }
        }
    }

    /// Materializes up to `need` (max 4) translated bytes of lookahead
    /// without moving the stream: splices are elided and trigraphs mapped,
    /// silently. The stream position, line/column included, is restored
    /// before returning.
    pub(super) fn peek_translated(&mut self, need: usize) -> ([u8; 4], usize) {
        let mut out = [0u8; 4];
        let need = need.min(out.len());
        if need == 0 {
            return (out, 0);
        }
        let saved = self.stream.save_state();
        let mut got = 0;

        while got < need {
            let Some(a) = self.stream.peek() else { break };

            if a == b'\\' {
                self.stream.next();
                match self.stream.peek() {
                    Some(b'\n') => {
                        self.stream.next();
                        continue;
                    }
                    Some(b'\r') => {
                        self.stream.next();
                        if self.stream.peek() == Some(b'\n') {
                            self.stream.next();
                            continue;
                        }
                        self.stream.unget();
                    }
                    _ => {}
                }
                out[got] = b'\\';
                got += 1;
                continue;
            }

            if self.ctx.enable_trigraphs && a == b'?' {
                self.stream.next();
                if self.stream.peek() == Some(b'?') {
                    self.stream.next();
                    if let Some(third) = self.stream.peek() {
                        if let Some(&(_, rep)) =
                            TRIGRAPHS.iter().find(|(pat, _)| *pat == third)
                        {
                            self.stream.next();
                            out[got] = rep;
                        } else {
                            // Not a trigraph: the first '?' stands alone and
                            // the second gets re-examined.
                            self.stream.unget();
                            out[got] = b'?';
                        }
                        got += 1;
                        continue;
                    }
                    self.stream.unget();
                }
                out[got] = b'?';
                got += 1;
                continue;
            }

            self.stream.next();
            out[got] = a;
            got += 1;
        }

        self.stream.restore_state(saved);
        (out, got)
    }

    // ========================================================================
    // Whitespace, comments, recovery
    // ========================================================================

    /// Skips whitespace, splices, and comments, maintaining the line-start
    /// and directive flags across newlines.
    pub(super) fn skip_space_and_comments(&mut self) {
        loop {
            self.skip_line_splices();

            while self.stream.peek().is_some_and(is_space) {
                if self.next_translated() == Some(b'\n') {
                    self.at_line_start = true;
                    self.in_directive = false;
                }
            }

            if self.stream.peek() == Some(b'/') {
                let blob = self.stream.blob();
                if blob[2] == b'/' && blob[3] == b'/' {
                    if !self.ctx.std_at_least(LangStandard::C99) && !self.ctx.gnu_extensions {
                        let p = self.stream.position();
                        self.extension(
                            SourceSpan::at(p),
                            "C89 mode: '//' comments are a non-standard extension",
                        );
                    }
                    self.next_translated();
                    self.next_translated();
                    while !self.stream.eof() && self.next_translated() != Some(b'\n') {}
                    self.at_line_start = true;
                    self.in_directive = false;
                    continue;
                }
                if blob[2] == b'/' && blob[3] == b'*' {
                    self.next_translated();
                    self.next_translated();
                    let mut closed = false;
                    while !self.stream.eof() {
                        let d = self.next_translated();
                        if d == Some(b'*') && self.stream.peek() == Some(b'/') {
                            self.next_translated();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        let p = self.stream.position();
                        self.diag.error(SourceSpan::at(p), "unterminated comment");
                        self.skip_to_safe_point();
                    }
                    continue;
                }
            }
            break;
        }
    }

    /// Skips forward to the next newline or `;` after an unrecoverable
    /// in-token error, guaranteeing forward progress.
    pub(super) fn skip_to_safe_point(&mut self) {
        let mut ended_on_newline = false;
        loop {
            match self.next_translated() {
                None => break,
                Some(b'\n') => {
                    ended_on_newline = true;
                    break;
                }
                Some(b';') => break,
                Some(_) => {}
            }
        }
        self.at_line_start = ended_on_newline || self.stream.peek() == Some(b'\n');
        self.in_directive = false;
    }

    // ========================================================================
    // Diagnostics helpers
    // ========================================================================

    /// Extension diagnostic: only under `-pedantic`, subject to the
    /// `Pedantic` warning bit and its error upgrade.
    pub(super) fn extension(&mut self, span: SourceSpan, message: impl AsRef<str>) {
        if !self.ctx.pedantic {
            return;
        }
        if !self.ctx.warning_enabled(Warning::Pedantic) {
            return;
        }
        let message = message.as_ref();
        if self.ctx.warnings_as_errors && self.ctx.warning_as_error(Warning::Pedantic) {
            self.diag.error(span, message);
        } else {
            self.diag.warning(span, message);
        }
    }

    /// Diagnoses a trigraph or digraph sighting, translated or ignored.
    fn alt_token_diag(&mut self, span: SourceSpan, kind: &str, lexeme: &str) {
        if !self.ctx.enable_trigraphs {
            if self.ctx.warning_as_error(Warning::Trigraphs) || self.ctx.warnings_as_errors {
                self.diag.error(
                    span,
                    format!("{kind} '{lexeme}' used, but alternative tokens are disabled"),
                );
            } else {
                self.diag.warning(
                    span,
                    format!("{kind} '{lexeme}' used, but alternative tokens are ignored"),
                );
            }
            return;
        }

        if !self.ctx.warning_enabled(Warning::Trigraphs) {
            return;
        }
        if self.ctx.warning_as_error(Warning::Trigraphs) || self.ctx.warnings_as_errors {
            self.diag.error(span, format!("{kind} '{lexeme}' translated"));
        } else {
            self.diag.warning(span, format!("{kind} '{lexeme}' translated"));
        }
    }

    /// A warning subject to its enable bit and error upgrade.
    pub(super) fn warn_gated(&mut self, warning: Warning, span: SourceSpan, message: impl AsRef<str>) {
        if !self.ctx.warning_enabled(warning) {
            return;
        }
        let message = message.as_ref();
        if self.ctx.warnings_as_errors && self.ctx.warning_as_error(warning) {
            self.diag.error(span, message);
        } else {
            self.diag.warning(span, message);
        }
    }

    /// Builds an error token with an interned reason, without emitting a
    /// diagnostic (callers have already done so).
    pub(super) fn error_token(&mut self, span: SourceSpan, reason: &str) -> Token {
        let sym = self.interner.intern(reason);
        Token::new(TokenKind::Error(sym), span)
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Parses a `\uHHHH` or `\UHHHHHHHH` universal character name. The
    /// backslash has not been consumed yet. Malformed input yields U+FFFD.
    fn parse_ucn(&mut self) -> u32 {
        self.next_translated();
        let kind = self.next_translated();
        let count = if kind == Some(b'u') { 4 } else { 8 };
        let mut code: u32 = 0;
        for _ in 0..count {
            let digit = self.stream.peek().filter(u8::is_ascii_hexdigit);
            let Some(digit) = digit else {
                let p = self.stream.position();
                self.diag.error(SourceSpan::at(p), "invalid UCN in identifier");
                return 0xFFFD;
            };
            self.next_translated();
            code = (code << 4) + hex_value(digit);
        }
        if code > 0x0010_FFFF || (0xD800..=0xDFFF).contains(&code) {
            let p = self.stream.position();
            self.diag
                .error(SourceSpan::at(p), format!("invalid Unicode code point U+{code:04X}"));
            return 0xFFFD;
        }
        code
    }

    /// Validates one UTF-8 sequence at the current position and appends its
    /// bytes to `buf`. On failure a diagnostic is emitted; the bad start
    /// byte (if that is the problem) is consumed so progress is guaranteed.
    fn utf8_validate_and_append(&mut self, buf: &mut Vec<u8>) -> bool {
        let Some(first) = self.stream.peek() else {
            let p = self.stream.position();
            self.diag
                .error(SourceSpan::at(p), "unexpected end of file in UTF-8 sequence");
            return false;
        };

        let len = match first {
            0x00..=0x7F => 1,
            b if b & 0xE0 == 0xC0 => 2,
            b if b & 0xF0 == 0xE0 => 3,
            b if b & 0xF8 == 0xF0 => 4,
            _ => {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::at(p),
                    format!("invalid UTF-8 start byte 0x{first:02X}"),
                );
                self.stream.next();
                return false;
            }
        };

        let mut tmp = [0u8; 4];
        for (i, slot) in tmp.iter_mut().take(len).enumerate() {
            if self.stream.eof() {
                let p = self.stream.position();
                self.diag.error(SourceSpan::at(p), "truncated UTF-8 sequence");
                return false;
            }
            let c = self.stream.peek().unwrap_or(0);
            if i > 0 && c & 0xC0 != 0x80 {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::at(p),
                    format!("invalid UTF-8 continuation byte 0x{c:02X}"),
                );
                return false;
            }
            *slot = c;
            self.stream.next();
        }

        let mut cp = u32::from(tmp[0])
            & match len {
                2 => 0x1F,
                3 => 0x0F,
                4 => 0x07,
                _ => 0x7F,
            };
        for byte in &tmp[1..len] {
            cp = (cp << 6) | (u32::from(*byte) & 0x3F);
        }
        if (len == 2 && cp < 0x80)
            || (len == 3 && cp < 0x800)
            || (len == 4 && cp < 0x10000)
            || (0xD800..=0xDFFF).contains(&cp)
            || cp > 0x0010_FFFF
        {
            let p = self.stream.position();
            self.diag
                .error(SourceSpan::at(p), format!("invalid UTF-8 code point U+{cp:04X}"));
            return false;
        }

        buf.extend_from_slice(&tmp[..len]);
        true
    }

    /// Decodes one UTF-8 sequence from a literal body. Invalid input is
    /// diagnosed; malformed scalars come back as `Some(U+FFFD)`, undecodable
    /// bytes as `None` with the offending start byte consumed.
    pub(super) fn utf8_decode_one(&mut self) -> Option<u32> {
        let first = self.stream.peek()?;

        let (len, mut cp) = match first {
            0x00..=0x7F => (1, u32::from(first)),
            b if b & 0xE0 == 0xC0 => (2, u32::from(b) & 0x1F),
            b if b & 0xF0 == 0xE0 => (3, u32::from(b) & 0x0F),
            b if b & 0xF8 == 0xF0 => (4, u32::from(b) & 0x07),
            _ => {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::at(p),
                    format!("invalid UTF-8 start byte 0x{first:02X}"),
                );
                self.stream.next();
                return None;
            }
        };

        let mut tmp = [0u8; 4];
        for (i, slot) in tmp.iter_mut().take(len).enumerate() {
            if self.stream.eof() {
                let p = self.stream.position();
                self.diag.error(SourceSpan::at(p), "truncated UTF-8 sequence");
                return None;
            }
            let c = self.stream.peek().unwrap_or(0);
            if i > 0 && c & 0xC0 != 0x80 {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::at(p),
                    format!("invalid UTF-8 continuation byte 0x{c:02X}"),
                );
                self.stream.next();
                return None;
            }
            *slot = c;
            self.stream.next();
        }

        for byte in &tmp[1..len] {
            cp = (cp << 6) | (u32::from(*byte) & 0x3F);
        }

        if (len == 2 && cp < 0x80)
            || (len == 3 && cp < 0x800)
            || (len == 4 && cp < 0x10000)
            || (0xD800..=0xDFFF).contains(&cp)
            || cp > 0x0010_FFFF
        {
            let p = self.stream.position();
            self.diag
                .error(SourceSpan::at(p), format!("invalid UTF-8 code point U+{cp:04X}"));
            return Some(0xFFFD);
        }
        Some(cp)
    }

    /// Reads an identifier (or keyword) starting at the current byte.
    pub(super) fn read_ident(&mut self) -> Token {
        let mut buf: Vec<u8> = Vec::new();
        let mut saw_ucn = false;
        let mut saw_utf8 = false;
        let mut saw_dollar = false;

        let start = self.stream.position();
        while !self.stream.eof() {
            self.skip_line_splices();
            let Some(c) = self.stream.peek() else { break };

            if c.is_ascii_alphanumeric()
                || c == b'_'
                || (self.ctx.gnu_extensions && c == b'$')
            {
                if c == b'$' {
                    saw_dollar = true;
                }
                self.stream.next();
                buf.push(c);
            } else if c == b'\\' {
                let blob = self.stream.blob();
                if blob[3] == b'\n' || (blob[3] == b'\r' && blob[4] == b'\n') {
                    self.skip_line_splices();
                    continue;
                }
                if blob[3] == b'u' || blob[3] == b'U' {
                    saw_ucn = true;
                    let cp = self.parse_ucn();
                    encode_utf8_into(&mut buf, cp);
                } else {
                    break;
                }
            } else if c >= 0x80 {
                saw_utf8 = true;
                if !self.utf8_validate_and_append(&mut buf) {
                    let pos = self.stream.position();
                    let span = SourceSpan::new(start, pos);
                    self.diag.error(span, "invalid UTF-8 in identifier");
                    return self.error_token(span, "invalid UTF-8 in identifier");
                }
            } else {
                break;
            }
        }

        let spelling = String::from_utf8_lossy(&buf).into_owned();
        let sym = self.interner.intern(&spelling);
        let span = SourceSpan::new(start, self.stream.position());

        let entry = keywords::classify(&spelling, self.in_directive);
        let kind = entry.map_or(TokenKind::Identifier(sym), KwEntry::token_kind);

        if saw_ucn && !self.ctx.std_at_least(LangStandard::C99) {
            self.extension(
                span,
                "universal-character-name in identifier requires C99 or later",
            );
        }
        if saw_utf8 && self.ctx.pedantic && !self.ctx.gnu_extensions {
            self.extension(span, "UTF-8 identifier is a non-standard extension");
        }
        if saw_dollar && !self.ctx.gnu_extensions {
            self.extension(span, "identifier contains '$' (GNU extension)");
        }

        if let Some(entry) = entry {
            self.keyword_policy_diags(&spelling, entry, span);
            if entry.is_preprocessor() {
                self.note_directive_keyword(entry);
            }
        }

        Token::new(kind, span)
    }

    /// Emits the per-entry policy diagnostics of the keyword table: GNU-only
    /// use, minimum standard, spelling generation, and C23 status.
    fn keyword_policy_diags(&mut self, lexeme: &str, entry: &KwEntry, span: SourceSpan) {
        let gnu = self.ctx.gnu_extensions;

        if entry.gnu_only && !gnu {
            if entry.is_preprocessor() {
                self.extension(
                    span,
                    format!(
                        "non-standard preprocessor directive/operator '{lexeme}' used in non-GNU mode"
                    ),
                );
            } else {
                self.extension(
                    span,
                    format!("GNU extension keyword '{lexeme}' used in non-GNU mode"),
                );
            }
            return;
        }

        if !self.ctx.std_at_least(entry.min_std) && !gnu {
            let need = entry.min_std.name();
            if entry.is_preprocessor() {
                self.extension(
                    span,
                    format!(
                        "preprocessor directive/operator '{lexeme}' requires {need} or GNU extensions"
                    ),
                );
            } else {
                self.extension(
                    span,
                    format!("keyword '{lexeme}' requires {need} or GNU extensions"),
                );
            }
        }

        if !entry.is_preprocessor() {
            if entry.spelling_form == SpellingForm::NewForm
                && !self.ctx.std_at_least(LangStandard::C23)
                && !gnu
            {
                self.extension(
                    span,
                    format!("keyword '{lexeme}' is the C23 spelling; requires C23 or GNU extensions"),
                );
            } else if entry.spelling_form == SpellingForm::OldForm
                && self.ctx.std_at_least(LangStandard::C23)
                && !gnu
            {
                self.warn_gated(
                    Warning::Deprecated,
                    span,
                    format!(
                        "C23 deprecates the underscored spelling '{lexeme}'; prefer the C23 spelling"
                    ),
                );
            }

            if self.ctx.std_at_least(LangStandard::C23) && !gnu {
                match entry.c23 {
                    C23Status::Removed => {
                        self.diag
                            .error(span, format!("C23 removed the '{lexeme}' keyword"));
                    }
                    C23Status::Deprecated => {
                        self.warn_gated(
                            Warning::Deprecated,
                            span,
                            format!(
                                "C23 deprecates '{lexeme}'; prefer attributes or newer forms where applicable"
                            ),
                        );
                    }
                    C23Status::None => {}
                }
            }
        }
    }

    /// Notes a classified directive keyword, arming header-name mode for the
    /// include family.
    fn note_directive_keyword(&mut self, entry: &KwEntry) {
        if !self.in_directive {
            return;
        }
        let KwKind::Pp(pp) = entry.kind else { return };
        match pp {
            PpKeyword::Include => {
                self.pp_kind = PpDirectiveKind::Include;
                self.expect_header_name = true;
            }
            PpKeyword::IncludeNext => {
                self.pp_kind = PpDirectiveKind::IncludeNext;
                self.expect_header_name = true;
            }
            PpKeyword::Import => {
                self.pp_kind = PpDirectiveKind::Import;
                self.expect_header_name = true;
            }
            PpKeyword::Embed => {
                self.pp_kind = PpDirectiveKind::Embed;
                self.expect_header_name = true;
            }
            _ => {
                self.pp_kind = PpDirectiveKind::Other;
                self.expect_header_name = false;
            }
        }
    }

    // ========================================================================
    // Header names
    // ========================================================================

    /// Reads a `<...>` header name; the `<` is at the current position.
    fn read_header_name(&mut self) -> Token {
        let start = self.stream.position();
        self.next_translated();
        let mut buf: Vec<u8> = Vec::new();
        while !self.stream.eof()
            && self.stream.peek() != Some(b'>')
            && self.stream.peek() != Some(b'\n')
        {
            if let Some(b) = self.next_translated() {
                buf.push(b);
            }
        }
        if self.stream.peek() == Some(b'>') {
            self.next_translated();
        } else {
            let p = self.stream.position();
            let span = SourceSpan::new(start, p);
            self.diag.error(span, "unterminated header-name");
            self.skip_to_safe_point();
            return self.error_token(span, "unterminated header-name");
        }
        let sym = self.interner.intern_lossy(&buf);
        Token::new(
            TokenKind::HeaderName(sym),
            SourceSpan::new(start, self.stream.position()),
        )
    }

    /// Reads a `"..."` header name; `\"` and `\\` are unescaped inside.
    fn read_quoted_header_name(&mut self) -> Token {
        let start = self.stream.position();
        self.next_translated();
        let mut buf: Vec<u8> = Vec::new();
        while !self.stream.eof()
            && self.stream.peek() != Some(b'"')
            && self.stream.peek() != Some(b'\n')
        {
            let Some(mut c) = self.next_translated() else { break };
            if c == b'\\'
                && matches!(self.stream.peek(), Some(b'"' | b'\\'))
            {
                if let Some(unescaped) = self.next_translated() {
                    c = unescaped;
                }
            }
            buf.push(c);
        }
        if self.stream.peek() == Some(b'"') {
            self.next_translated();
        } else {
            let p = self.stream.position();
            let span = SourceSpan::new(start, p);
            self.diag.error(span, "unterminated quoted header-name");
            self.skip_to_safe_point();
            return self.error_token(span, "unterminated quoted header-name");
        }
        let sym = self.interner.intern_lossy(&buf);
        Token::new(
            TokenKind::HeaderName(sym),
            SourceSpan::new(start, self.stream.position()),
        )
    }

    // ========================================================================
    // Punctuators
    // ========================================================================

    /// Recognizes a digraph at the current position, honoring the longest
    /// match. Consumes and translates only when alternative tokens are
    /// enabled; otherwise the sighting is diagnosed and `None` returned.
    fn try_digraph(&mut self) -> Option<Punct> {
        let (look, got) = self.peek_translated(4);

        let &(pattern, replacement) = DIGRAPHS
            .iter()
            .find(|(pat, _)| got >= pat.len() && look[..pat.len()] == *pat.as_bytes())?;

        let end = self.stream.position();
        let mut start = end;
        let len = u32::try_from(pattern.len()).unwrap_or(u32::MAX);
        if start.column >= len {
            start.column -= len;
        }
        let span = SourceSpan::new(start, end);

        if !self.ctx.enable_trigraphs {
            self.alt_token_diag(span, "digraph", pattern);
            return None;
        }

        for _ in 0..pattern.len() {
            self.next_translated();
        }
        self.alt_token_diag(span, "digraph", pattern);

        Punct::TABLE
            .iter()
            .find(|&&(spelling, _)| spelling == replacement)
            .map(|&(_, punct)| punct)
    }

    /// Reads a punctuator by maximal munch, or an error token for a byte
    /// that starts nothing.
    pub(super) fn read_punctuator(&mut self) -> Token {
        let start = self.stream.position();

        if let Some(punct) = self.try_digraph() {
            return Token::new(
                TokenKind::Punct(punct),
                SourceSpan::new(start, self.stream.position()),
            );
        }

        for &(spelling, punct) in Punct::TABLE {
            let len = spelling.len();
            let (look, got) = self.peek_translated(len);
            if got == len && look[..len] == *spelling.as_bytes() {
                for _ in 0..len {
                    self.next_translated();
                }
                return Token::new(
                    TokenKind::Punct(punct),
                    SourceSpan::new(start, self.stream.position()),
                );
            }
        }

        let bad = self.next_translated().unwrap_or(0);
        let span = SourceSpan::new(start, self.stream.position());
        let message = format!("unexpected character '\\x{bad:02X}'");
        self.diag.error(span, &message);
        self.error_token(span, &message)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token before EOF, then `None` forever.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind().is_eof() {
            self.finished = true;
            return None;
        }
        Some(token)
    }
}

/// Whitespace in the C basic character set sense, vertical tab included.
const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Value of an ASCII hex digit.
pub(super) fn hex_value(digit: u8) -> u32 {
    match digit {
        b'0'..=b'9' => u32::from(digit - b'0'),
        b'a'..=b'f' => u32::from(digit - b'a') + 10,
        _ => u32::from(digit.to_ascii_uppercase() - b'A') + 10,
    }
}
