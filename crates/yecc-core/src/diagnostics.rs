// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics rendering with source excerpts.
//!
//! The sink formats every diagnostic against the file it was created for: a
//! `yecc: file:line:col` header, then each source line in the span with a
//! caret ruler underneath, and the leveled message on the first line.
//!
//! ```text
//! yecc: demo.c:2:5
//!  2 | int $x = 1;
//!    |     ^> error: unexpected character '\x24'
//! ```
//!
//! Errors are never fatal here; the sink counts them and the caller decides
//! when enough is enough (see [`Context::max_errors`]).
//!
//! Color is ANSI and level-aware. Under [`ColorMode::Auto`] it is enabled
//! when stderr is a terminal and `NO_COLOR` is unset; a non-empty
//! `CLICOLOR_FORCE` forces it on.
//!
//! [`Context::max_errors`]: crate::context::Context::max_errors

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::context::ColorMode;
use crate::source_analysis::SourceSpan;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// A hard error. Lexing continues, but compilation should fail.
    Error,
    /// A warning, possibly upgraded to an error by configuration.
    Warning,
    /// Additional context attached to a preceding diagnostic.
    Note,
    /// Informational output.
    Info,
}

impl Level {
    const fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Info => "info",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::Error => "\x1b[1;31m",
            Self::Warning => "\x1b[1;33m",
            Self::Note => "\x1b[1;34m",
            Self::Info => "\x1b[1;32m",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Formats diagnostics for one source file and keeps severity counts.
#[derive(Debug)]
pub struct DiagnosticsSink {
    path: Utf8PathBuf,
    use_color: bool,
    errors: u32,
    warnings: u32,
}

impl DiagnosticsSink {
    /// Creates a sink for diagnostics against `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, color_mode: ColorMode) -> Self {
        Self {
            path: path.into(),
            use_color: color_wanted(color_mode),
            errors: 0,
            warnings: 0,
        }
    }

    /// The file this sink excerpts from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Number of errors reported so far.
    #[must_use]
    pub const fn error_count(&self) -> u32 {
        self.errors
    }

    /// Number of warnings reported so far.
    #[must_use]
    pub const fn warning_count(&self) -> u32 {
        self.warnings
    }

    /// Reports an error at `span`.
    pub fn error(&mut self, span: SourceSpan, message: impl fmt::Display) {
        self.report(Level::Error, span, &message.to_string());
    }

    /// Reports a warning at `span`.
    pub fn warning(&mut self, span: SourceSpan, message: impl fmt::Display) {
        self.report(Level::Warning, span, &message.to_string());
    }

    /// Reports a note at `span`.
    pub fn note(&mut self, span: SourceSpan, message: impl fmt::Display) {
        self.report(Level::Note, span, &message.to_string());
    }

    /// Reports informational output at `span`.
    pub fn info(&mut self, span: SourceSpan, message: impl fmt::Display) {
        self.report(Level::Info, span, &message.to_string());
    }

    /// Reports a diagnostic with the full header + excerpt form.
    pub fn report(&mut self, level: Level, span: SourceSpan, message: &str) {
        self.count(level);
        let stderr = io::stderr().lock();
        let _ = self.render(stderr, level, span, message, true);
    }

    /// Prints only the annotated excerpt, for attaching context to a
    /// preceding diagnostic. Does not bump the severity counts.
    pub fn context(&mut self, level: Level, span: SourceSpan, message: &str) {
        let stderr = io::stderr().lock();
        let _ = self.render(stderr, level, span, message, false);
    }

    fn count(&mut self, level: Level) {
        match level {
            Level::Error => self.errors += 1,
            Level::Warning => self.warnings += 1,
            Level::Note | Level::Info => {}
        }
    }

    fn render(
        &self,
        mut out: impl Write,
        level: Level,
        span: SourceSpan,
        message: &str,
        with_header: bool,
    ) -> io::Result<()> {
        if with_header {
            if self.use_color {
                write!(out, "{ANSI_BOLD}yecc:{ANSI_RESET} ")?;
            } else {
                write!(out, "yecc: ")?;
            }
            writeln!(
                out,
                "{}:{}:{}",
                self.path, span.start.line, span.start.column
            )?;
        }

        let first = span.start.line.max(1);
        let last = span.end.line.max(first);
        let width = digits(last);

        let mut message_printed = false;
        for line_no in first..=last {
            let src = self.read_line(line_no).unwrap_or_default();
            writeln!(out, " {line_no:>width$} | {src}", width = width)?;

            let col0 = if line_no == span.start.line {
                span.start.column.max(1)
            } else {
                1
            };
            let mut col1 = if line_no == span.end.line {
                span.end.column
            } else {
                u32::try_from(src.chars().count()).unwrap_or(u32::MAX - 1) + 1
            };
            if col1 <= col0 {
                col1 = col0 + 1;
            }

            write!(out, " {:>width$} | ", "", width = width)?;
            for _ in 1..col0 {
                out.write_all(b" ")?;
            }
            out.write_all(b"^")?;
            for _ in col0 + 1..col1 {
                out.write_all(b"-")?;
            }
            out.write_all(b">")?;

            if !message_printed && line_no == span.start.line {
                if self.use_color {
                    write!(out, " {}{}:{} {message}", level.color(), level, ANSI_RESET)?;
                } else {
                    write!(out, " {level}: {message}")?;
                }
                message_printed = true;
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Fetches one source line (without its newline) for the excerpt.
    fn read_line(&self, wanted: u32) -> Option<String> {
        let file = File::open(&self.path).ok()?;
        let reader = BufReader::new(file);
        let mut current = 0;
        for line in reader.split(b'\n') {
            let line = line.ok()?;
            current += 1;
            if current == wanted {
                let mut text = String::from_utf8_lossy(&line).into_owned();
                if text.ends_with('\r') {
                    text.pop();
                }
                return Some(text);
            }
        }
        None
    }
}

fn digits(mut n: u32) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

fn color_wanted(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            let mut enabled =
                io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
            if let Some(force) = std::env::var_os("CLICOLOR_FORCE") {
                if !force.is_empty() {
                    enabled = true;
                }
            }
            enabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::SourcePosition;
    use std::io::Write as _;

    fn sink_for(contents: &str) -> (tempfile::TempDir, DiagnosticsSink) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("demo.c");
        let mut f = File::create(&path).expect("create");
        f.write_all(contents.as_bytes()).expect("write");
        let utf8 = Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path");
        (dir, DiagnosticsSink::new(utf8, ColorMode::Never))
    }

    fn rendered(
        sink: &DiagnosticsSink,
        level: Level,
        span: SourceSpan,
        msg: &str,
        header: bool,
    ) -> String {
        let mut out = Vec::new();
        sink.render(&mut out, level, span, msg, header).expect("render");
        String::from_utf8(out).expect("utf-8 output")
    }

    fn span(l0: u32, c0: u32, l1: u32, c1: u32) -> SourceSpan {
        SourceSpan::new(
            SourcePosition::new(l0, c0, 0),
            SourcePosition::new(l1, c1, 0),
        )
    }

    #[test]
    fn single_line_report_format() {
        let (_dir, sink) = sink_for("int x = 1;\n");
        let text = rendered(&sink, Level::Error, span(1, 5, 1, 6), "bad name", true);
        let expected = "\
yecc: ";
        assert!(text.starts_with(expected), "{text}");
        assert!(text.contains("demo.c:1:5\n"), "{text}");
        assert!(text.contains(" 1 | int x = 1;\n"), "{text}");
        assert!(text.contains("   |     ^> error: bad name\n"), "{text}");
    }

    #[test]
    fn arrow_covers_span_columns() {
        let (_dir, sink) = sink_for("abcdefgh\n");
        let text = rendered(&sink, Level::Warning, span(1, 2, 1, 6), "wide", true);
        // Columns [2, 6): caret at 2, dashes through 5, arrow closes.
        assert!(text.contains("   |  ^--->"), "{text}");
        assert!(text.contains("warning: wide"), "{text}");
    }

    #[test]
    fn multi_line_span_annotates_every_line() {
        let (_dir, sink) = sink_for("first\nsecond\nthird\n");
        let text = rendered(&sink, Level::Error, span(1, 3, 3, 2), "spans", true);
        assert!(text.contains(" 1 | first\n"), "{text}");
        assert!(text.contains(" 2 | second\n"), "{text}");
        assert!(text.contains(" 3 | third\n"), "{text}");
        // Message appears exactly once, on the start line.
        assert_eq!(text.matches("error: spans").count(), 1, "{text}");
    }

    #[test]
    fn context_omits_header() {
        let (_dir, sink) = sink_for("line\n");
        let text = rendered(&sink, Level::Note, span(1, 1, 1, 4), "see here", false);
        assert!(!text.contains("yecc:"), "{text}");
        assert!(text.contains("note: see here"), "{text}");
    }

    #[test]
    fn counts_track_levels() {
        let (_dir, mut sink) = sink_for("x\n");
        assert_eq!(sink.error_count(), 0);
        sink.count(Level::Error);
        sink.count(Level::Warning);
        sink.count(Level::Warning);
        sink.count(Level::Note);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 2);
    }

    #[test]
    fn missing_line_renders_empty_excerpt() {
        let (_dir, sink) = sink_for("only\n");
        let text = rendered(&sink, Level::Error, span(9, 1, 9, 2), "gone", true);
        assert!(text.contains(" 9 | \n"), "{text}");
    }

    #[test]
    fn color_mode_overrides() {
        let (_dir, _) = sink_for("x\n");
        assert!(color_wanted(ColorMode::Always));
        assert!(!color_wanted(ColorMode::Never));
    }
}
