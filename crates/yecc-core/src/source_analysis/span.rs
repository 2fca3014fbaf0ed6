// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token carries a [`SourceSpan`] indicating where in the source file
//! it was read. Spans are built from [`SourcePosition`]s stamped out by the
//! byte stream, so they reflect the *untranslated* input: offsets count raw
//! bytes, before line splicing and trigraph replacement.

use std::fmt;

/// A position in a source file.
///
/// Lines and columns are 1-based; `offset` is a 0-based byte count into the
/// untranslated file.
///
/// # Examples
///
/// ```
/// use yecc_core::source_analysis::SourcePosition;
///
/// let pos = SourcePosition::new(3, 7, 42);
/// assert_eq!(pos.line, 3);
/// assert_eq!(pos.column, 7);
/// assert_eq!(pos.offset, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// 0-based byte offset in the untranslated source.
    pub offset: usize,
}

impl SourcePosition {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A contiguous region of source, as a half-open `[start, end)` pair.
///
/// `end` addresses the byte after the last character of the region, so a
/// zero-width span has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    /// First byte of the region.
    pub start: SourcePosition,
    /// One past the last byte of the region.
    pub end: SourcePosition,
}

impl SourceSpan {
    /// Creates a new span from two positions.
    #[must_use]
    pub const fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Creates a zero-width span at `pos`.
    #[must_use]
    pub const fn at(pos: SourcePosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Returns the byte length of the span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

impl From<SourceSpan> for miette::SourceSpan {
    fn from(span: SourceSpan) -> Self {
        (span.start.offset, span.len()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len_and_empty() {
        let span = SourceSpan::new(
            SourcePosition::new(1, 1, 0),
            SourcePosition::new(1, 6, 5),
        );
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(SourceSpan::at(SourcePosition::new(1, 1, 0)).is_empty());
    }

    #[test]
    fn span_merge() {
        let a = SourceSpan::new(SourcePosition::new(1, 3, 2), SourcePosition::new(1, 5, 4));
        let b = SourceSpan::new(SourcePosition::new(2, 1, 8), SourcePosition::new(2, 4, 11));
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 2);
        assert_eq!(merged.end.offset, 11);
    }

    #[test]
    fn span_into_miette() {
        let span = SourceSpan::new(SourcePosition::new(1, 3, 2), SourcePosition::new(1, 8, 7));
        let ms: miette::SourceSpan = span.into();
        assert_eq!(ms.offset(), 2);
        assert_eq!(ms.len(), 5);
    }

    #[test]
    fn position_display() {
        assert_eq!(SourcePosition::new(12, 4, 100).to_string(), "12:4");
    }
}
