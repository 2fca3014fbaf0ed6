// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Buffered random-access byte stream over a source file.
//!
//! The stream hands out raw, untranslated bytes one at a time while keeping
//! the 1-based line/column bookkeeping the diagnostics machinery needs. A
//! fixed-size window of the file is kept in memory and refilled on demand, so
//! the lexer can wander backwards (`unget`, `seek`) without the whole file
//! living in memory.
//!
//! Reads past the window, [`ByteStream::blob`], and [`ByteStream::seek`] all
//! use positioned reads against the same handle; the stream's logical
//! position is `pos`, never the OS file cursor.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use camino::{Utf8Path, Utf8PathBuf};

use super::error::StreamError;
use super::span::SourcePosition;

/// Size of the in-memory file window.
pub const STREAM_BUFFER_SIZE: usize = 8192;

/// How many consumed bytes can be pushed back with exact line/column restore.
const PUSHBACK_DEPTH: usize = 8;

/// A 5-byte window centered on the current byte: two bytes before, the
/// current byte, and two bytes after, zero-filled past either end of the
/// file. `blob[2]` is always the byte `peek` would return.
pub type Blob = [u8; 5];

/// Saved stream position, restorable with [`ByteStream::restore_state`].
///
/// Used by the lexer's translated-lookahead helpers, which must put the
/// stream back exactly where it was, line/column included.
#[derive(Debug, Clone)]
pub(crate) struct StreamState {
    pos: usize,
    line: u32,
    column: u32,
    pushback: VecDeque<(u32, u32)>,
}

/// A buffered, file-backed byte reader with line/column tracking.
#[derive(Debug)]
pub struct ByteStream {
    path: Utf8PathBuf,
    file: File,
    buf: Box<[u8; STREAM_BUFFER_SIZE]>,
    /// File offset of `buf[0]`.
    buf_start: usize,
    /// Valid bytes in `buf`.
    buf_len: usize,
    /// Total file length in bytes.
    len: usize,
    /// Current read position.
    pos: usize,
    line: u32,
    column: u32,
    /// Line/column of recently consumed bytes, newest last.
    pushback: VecDeque<(u32, u32)>,
}

impl ByteStream {
    /// Opens `path` and primes the window.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Open`] if the file cannot be opened or its
    /// length determined; no handle is leaked on failure.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, StreamError> {
        let path = path.as_ref().to_owned();
        let open_err = |source| StreamError::Open {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "source files over usize::MAX bytes are not supported"
        )]
        let len = len as usize;

        let mut stream = Self {
            path,
            file,
            buf: Box::new([0; STREAM_BUFFER_SIZE]),
            buf_start: 0,
            buf_len: 0,
            len,
            pos: 0,
            line: 1,
            column: 1,
            pushback: VecDeque::with_capacity(PUSHBACK_DEPTH),
        };
        stream.refill(0).map_err(|source| StreamError::Read {
            path: stream.path.clone(),
            offset: 0,
            source,
        })?;
        Ok(stream)
    }

    /// The path this stream reads from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Total file length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for a zero-length file.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the read position has reached the end of the file.
    #[must_use]
    pub const fn eof(&self) -> bool {
        self.pos >= self.len
    }

    /// The current position, stamped with line/column.
    #[must_use]
    pub const fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.pos)
    }

    /// Reads the window starting at `start`. On I/O failure the window is
    /// left truncated and the affected bytes read as end-of-file.
    fn refill(&mut self, start: usize) -> std::io::Result<()> {
        self.buf_start = start;
        self.buf_len = 0;
        if start >= self.len {
            return Ok(());
        }
        self.file.seek(SeekFrom::Start(start as u64))?;
        let mut filled = 0;
        while filled < STREAM_BUFFER_SIZE {
            match self.file.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.buf_len = filled;
                    return Err(e);
                }
            }
        }
        self.buf_len = filled;
        Ok(())
    }

    /// Fetches the byte at an arbitrary offset, repositioning the window if
    /// needed. The logical position is unchanged.
    fn byte_at(&mut self, offset: usize) -> Option<u8> {
        if offset >= self.len {
            return None;
        }
        if offset < self.buf_start || offset >= self.buf_start + self.buf_len {
            let _ = self.refill(offset - offset % STREAM_BUFFER_SIZE);
        }
        if offset < self.buf_start || offset >= self.buf_start + self.buf_len {
            return None;
        }
        Some(self.buf[offset - self.buf_start])
    }

    /// Returns the byte at the current position without consuming it, or
    /// `None` at end of file.
    pub fn peek(&mut self) -> Option<u8> {
        if self.eof() {
            return None;
        }
        self.byte_at(self.pos)
    }

    /// Consumes and returns one byte, updating line/column. Returns `None`
    /// at end of file.
    pub fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        if self.pushback.len() == PUSHBACK_DEPTH {
            self.pushback.pop_front();
        }
        self.pushback.push_back((self.line, self.column));
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    /// Steps one byte back, restoring the line/column that position had.
    /// Fails at offset 0.
    ///
    /// Restores exactly from the pushback record when one is available;
    /// past the recorded depth it falls back to rescanning the line for the
    /// column, which is exact but slower.
    pub fn unget(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        if let Some((line, column)) = self.pushback.pop_back() {
            self.line = line;
            self.column = column;
            return true;
        }
        match self.byte_at(self.pos) {
            Some(b'\n') => {
                if self.line > 1 {
                    self.line -= 1;
                }
                self.column = self.rescan_column(self.pos);
            }
            _ => {
                if self.column > 1 {
                    self.column -= 1;
                }
            }
        }
        true
    }

    /// Column of the byte at `offset`, found by walking back to the start of
    /// its line.
    fn rescan_column(&mut self, offset: usize) -> u32 {
        let mut column: u32 = 1;
        let mut scan = offset;
        while scan > 0 {
            scan -= 1;
            if self.byte_at(scan) == Some(b'\n') {
                break;
            }
            column += 1;
        }
        column
    }

    /// Moves the read position to an absolute byte offset.
    ///
    /// Line/column are recomputed by a sequential walk from the start of the
    /// file, so they match what consecutive `next` calls from offset 0 would
    /// have produced. Clears the pushback history. Fails when `offset` is
    /// past the end of the file.
    pub fn seek(&mut self, offset: usize) -> bool {
        if offset > self.len {
            return false;
        }
        self.pushback.clear();
        let mut line: u32 = 1;
        let mut column: u32 = 1;
        let mut walked = 0;
        while walked < offset {
            if self.byte_at(walked) == Some(b'\n') {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            walked += 1;
        }
        self.pos = offset;
        self.line = line;
        self.column = column;
        true
    }

    /// Returns the 5-byte window `[b-2, b-1, b, b+1, b+2]` around the
    /// current byte, zero-filled at the file boundaries. Does not move the
    /// read position.
    pub fn blob(&mut self) -> Blob {
        let mut cache: Blob = [0; 5];
        for (i, slot) in cache.iter_mut().enumerate() {
            let Some(offset) = (self.pos + i).checked_sub(2) else {
                continue;
            };
            if let Some(byte) = self.byte_at(offset) {
                *slot = byte;
            }
        }
        cache
    }

    /// Consumes a UTF-8 byte-order mark at the very start of the file.
    ///
    /// When present, the three BOM bytes are consumed and the column is reset
    /// to 0 so the first real byte lands on column 1 once read. Returns
    /// whether a BOM was stripped.
    pub fn strip_bom(&mut self) -> bool {
        if self.pos != 0 {
            return false;
        }
        let blob = self.blob();
        if blob[2] != 0xEF || blob[3] != 0xBB || blob[4] != 0xBF {
            return false;
        }
        self.next();
        self.next();
        self.next();
        self.column = 0;
        self.pushback.clear();
        true
    }

    pub(crate) fn save_state(&self) -> StreamState {
        StreamState {
            pos: self.pos,
            line: self.line,
            column: self.column,
            pushback: self.pushback.clone(),
        }
    }

    pub(crate) fn restore_state(&mut self, state: StreamState) {
        self.pos = state.pos;
        self.line = state.line;
        self.column = state.column;
        self.pushback = state.pushback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn stream_over(bytes: &[u8]) -> (tempfile::TempDir, ByteStream) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.c");
        let mut f = File::create(&path).expect("create");
        f.write_all(bytes).expect("write");
        let utf8 = Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path");
        let stream = ByteStream::open(&utf8).expect("open");
        (dir, stream)
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(ByteStream::open("definitely/not/here.c").is_err());
    }

    #[test]
    fn sequential_reads_track_lines_and_columns() {
        let (_dir, mut s) = stream_over(b"ab\ncd");
        assert_eq!(s.position(), SourcePosition::new(1, 1, 0));
        assert_eq!(s.next(), Some(b'a'));
        assert_eq!(s.next(), Some(b'b'));
        assert_eq!(s.position(), SourcePosition::new(1, 3, 2));
        assert_eq!(s.next(), Some(b'\n'));
        assert_eq!(s.position(), SourcePosition::new(2, 1, 3));
        assert_eq!(s.next(), Some(b'c'));
        assert_eq!(s.next(), Some(b'd'));
        assert_eq!(s.next(), None);
        assert!(s.eof());
    }

    #[test]
    fn peek_does_not_advance() {
        let (_dir, mut s) = stream_over(b"xy");
        assert_eq!(s.peek(), Some(b'x'));
        assert_eq!(s.peek(), Some(b'x'));
        assert_eq!(s.position().offset, 0);
    }

    #[test]
    fn unget_restores_line_and_column() {
        let (_dir, mut s) = stream_over(b"a\nbc");
        s.next();
        s.next();
        s.next();
        let before = s.position();
        assert_eq!(before, SourcePosition::new(2, 2, 3));
        assert!(s.unget());
        assert_eq!(s.position(), SourcePosition::new(2, 1, 2));
        assert!(s.unget());
        assert_eq!(s.position(), SourcePosition::new(1, 2, 1));
        assert!(s.unget());
        assert_eq!(s.position(), SourcePosition::new(1, 1, 0));
        assert!(!s.unget());
    }

    #[test]
    fn unget_past_recorded_depth_rescans() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"line one\n");
        bytes.extend_from_slice(b"line two\n");
        let (_dir, mut s) = stream_over(&bytes);
        for _ in 0..bytes.len() {
            s.next();
        }
        // Pop everything back off; the first 8 come from the pushback
        // history, the rest from the rescan path.
        for _ in 0..bytes.len() {
            assert!(s.unget());
        }
        assert_eq!(s.position(), SourcePosition::new(1, 1, 0));
    }

    #[test]
    fn seek_recomputes_position_from_origin() {
        let (_dir, mut s) = stream_over(b"one\ntwo\nthree\n");
        assert!(s.seek(8));
        assert_eq!(s.position(), SourcePosition::new(3, 1, 8));
        assert_eq!(s.next(), Some(b't'));
        assert!(s.seek(0));
        assert_eq!(s.position(), SourcePosition::new(1, 1, 0));
        assert!(!s.seek(1000));
    }

    #[test]
    fn blob_is_centered_and_zero_filled() {
        let (_dir, mut s) = stream_over(b"abcd");
        assert_eq!(s.blob(), [0, 0, b'a', b'b', b'c']);
        s.next();
        assert_eq!(s.blob(), [0, b'a', b'b', b'c', b'd']);
        s.next();
        s.next();
        s.next();
        assert_eq!(s.blob(), [b'c', b'd', 0, 0, 0]);
        // Position untouched by blob.
        assert_eq!(s.position().offset, 4);
    }

    #[test]
    fn strip_bom_only_at_start() {
        let (_dir, mut s) = stream_over(b"\xEF\xBB\xBFint");
        assert!(s.strip_bom());
        assert_eq!(s.position().offset, 3);
        assert_eq!(s.position().column, 0);
        assert_eq!(s.next(), Some(b'i'));
        assert_eq!(s.position().column, 1);
        assert!(!s.strip_bom());

        let (_dir2, mut plain) = stream_over(b"int");
        assert!(!plain.strip_bom());
        assert_eq!(plain.position().offset, 0);
    }

    #[test]
    fn reads_across_buffer_boundary() {
        let mut bytes = vec![b'x'; STREAM_BUFFER_SIZE - 1];
        bytes.extend_from_slice(b"\nboundary");
        let (_dir, mut s) = stream_over(&bytes);
        assert!(s.seek(STREAM_BUFFER_SIZE - 1));
        assert_eq!(s.next(), Some(b'\n'));
        assert_eq!(s.next(), Some(b'b'));
        assert_eq!(s.position().line, 2);
        assert!(s.unget());
        assert_eq!(s.peek(), Some(b'b'));
    }

    #[test]
    fn empty_file_is_immediately_eof() {
        let (_dir, mut s) = stream_over(b"");
        assert!(s.eof());
        assert!(s.is_empty());
        assert_eq!(s.peek(), None);
        assert_eq!(s.next(), None);
        assert_eq!(s.blob(), [0; 5]);
    }
}
