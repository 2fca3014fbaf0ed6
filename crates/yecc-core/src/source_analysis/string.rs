// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! String and character literal decoding.
//!
//! Literal bodies are decoded into a code-point buffer first; encoding into
//! the token's unit width happens once, at the end, after adjacent-literal
//! concatenation has settled the final encoding. Concatenation promotes
//! across prefixes by rank (`plain < u8 < u < U < L`) and never narrows
//! below the widest input unit width, so surrogate pairs cannot silently
//! collapse on targets where `L` is 16-bit.
//!
//! Escape handling, scalar validation, and U+FFFD replacement follow the
//! rules in the module-level table of escapes: `\a \b \f \n \r \t \v \\ \'
//! \" \?`, octal up to three digits, `\xH+`, `\uHHHH`, `\UHHHHHHHH`, and GNU
//! `\e`.

use crate::context::{LangStandard, Warning};

use super::lexer::{hex_value, Lexer};
use super::span::SourceSpan;
use super::token::{CharValue, Encoding, StringValue, Token, TokenKind};

/// A Unicode scalar value: in range and not a surrogate.
pub(super) const fn valid_scalar(cp: u32) -> bool {
    cp <= 0x0010_FFFF && !(cp >= 0xD800 && cp <= 0xDFFF)
}

/// Appends the UTF-8 encoding of `cp`; invalid scalars become U+FFFD.
pub(super) fn encode_utf8_into(buf: &mut Vec<u8>, cp: u32) {
    let cp = if valid_scalar(cp) { cp } else { 0xFFFD };
    if cp <= 0x7F {
        buf.push(cp as u8);
    } else if cp <= 0x7FF {
        buf.push(0xC0 | (cp >> 6) as u8);
        buf.push(0x80 | (cp & 0x3F) as u8);
    } else if cp <= 0xFFFF {
        buf.push(0xE0 | (cp >> 12) as u8);
        buf.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        buf.push(0x80 | (cp & 0x3F) as u8);
    } else {
        buf.push(0xF0 | (cp >> 18) as u8);
        buf.push(0x80 | ((cp >> 12) & 0x3F) as u8);
        buf.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        buf.push(0x80 | (cp & 0x3F) as u8);
    }
}

/// Appends the UTF-16 encoding of a valid scalar.
fn encode_utf16_into(units: &mut Vec<u16>, cp: u32) {
    if cp <= 0xFFFF {
        units.push(cp as u16);
    } else {
        let v = cp - 0x10000;
        units.push(0xD800 + (v >> 10) as u16);
        units.push(0xDC00 + (v & 0x3FF) as u16);
    }
}

/// UTF-16 encoding into 32-bit wide units.
fn encode_utf16_wide(units: &mut Vec<u32>, cp: u32) {
    if cp <= 0xFFFF {
        units.push(cp);
    } else {
        let v = cp - 0x10000;
        units.push(0xD800 + (v >> 10));
        units.push(0xDC00 + (v & 0x3FF));
    }
}

/// Concatenation promotion: higher rank wins, but the result never has
/// narrower units than the widest input.
pub(super) fn promote(a: Encoding, b: Encoding, wchar_bits: u32) -> Encoding {
    let picked = if a.rank() >= b.rank() { a } else { b };
    let need_bits = a.unit_bits(wchar_bits).max(b.unit_bits(wchar_bits));
    if picked.unit_bits(wchar_bits) < need_bits {
        if need_bits >= 32 {
            Encoding::Utf32
        } else {
            Encoding::Utf16
        }
    } else {
        picked
    }
}

impl Lexer<'_> {
    fn diag_promotion(&mut self, span: SourceSpan, from: Encoding, to: Encoding) {
        if from == to {
            return;
        }
        self.warn_gated(
            Warning::StringWidthPromotion,
            span,
            format!(
                "string literal concatenation promotes from {} to {}",
                from.prefix_name(),
                to.prefix_name()
            ),
        );
    }

    /// Parses one escape sequence; the backslash is already consumed.
    /// Malformed escapes yield U+FFFD after a diagnostic.
    pub(super) fn parse_escape(&mut self, encoding: Encoding) -> u32 {
        let Some(c) = self.next_translated() else {
            return 0xFFFD;
        };
        match c {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => 0x0A,
            b'r' => 0x0D,
            b't' => 0x09,
            b'v' => 0x0B,
            b'\\' => u32::from(b'\\'),
            b'\'' => u32::from(b'\''),
            b'"' => u32::from(b'"'),
            b'?' => u32::from(b'?'),

            b'0'..=b'7' => {
                let mut code = u32::from(c - b'0');
                let mut count = 1;
                while count < 3 {
                    match self.stream.peek() {
                        Some(d @ b'0'..=b'7') => {
                            self.next_translated();
                            code = code * 8 + u32::from(d - b'0');
                            count += 1;
                        }
                        _ => break,
                    }
                }
                code
            }

            b'x' => {
                let mut code: u32 = 0;
                let mut count = 0;
                while let Some(d) = self.stream.peek().filter(u8::is_ascii_hexdigit) {
                    self.next_translated();
                    code = code.saturating_mul(16).saturating_add(hex_value(d));
                    count += 1;
                }
                if count == 0 {
                    let p = self.stream.position();
                    self.diag
                        .error(SourceSpan::at(p), "missing hex digits in escape");
                    return 0xFFFD;
                }
                if encoding != Encoding::Plain && !valid_scalar(code) {
                    let p = self.stream.position();
                    self.diag.warning(
                        SourceSpan::at(p),
                        format!("invalid Unicode scalar value U+{code:04X} in \\x escape; using U+FFFD"),
                    );
                    return 0xFFFD;
                }
                code
            }

            b'u' => {
                let pos = self.stream.position();
                let mut code: u32 = 0;
                for _ in 0..4 {
                    let Some(d) = self.stream.peek().filter(u8::is_ascii_hexdigit) else {
                        let p = self.stream.position();
                        self.diag.error(SourceSpan::at(p), "invalid \\u escape");
                        return 0xFFFD;
                    };
                    self.next_translated();
                    code = (code << 4) + hex_value(d);
                }
                if (0xD800..=0xDFFF).contains(&code) {
                    self.diag
                        .error(SourceSpan::at(pos), "invalid Unicode surrogate");
                    return 0xFFFD;
                }
                code
            }

            b'U' => {
                let pos = self.stream.position();
                let mut code: u32 = 0;
                for _ in 0..8 {
                    let Some(d) = self.stream.peek().filter(u8::is_ascii_hexdigit) else {
                        let p = self.stream.position();
                        self.diag.error(SourceSpan::at(p), "invalid \\U escape");
                        return 0xFFFD;
                    };
                    self.next_translated();
                    code = (code << 4).saturating_add(hex_value(d));
                }
                if !valid_scalar(code) {
                    self.diag
                        .error(SourceSpan::at(pos), "invalid Unicode code point");
                    return 0xFFFD;
                }
                code
            }

            b'e' => {
                if self.ctx.gnu_extensions {
                    return 0x1B;
                }
                let p = self.stream.position();
                self.extension(SourceSpan::at(p), "\\e is a GNU extension");
                0x1B
            }

            other => {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::at(p),
                    format!("unknown escape '\\{}'", other as char),
                );
                0xFFFD
            }
        }
    }

    /// Scans one string body after its opening quote into `cps`. Returns
    /// false when the closing quote was never found.
    fn scan_string_body(&mut self, prefix: Encoding, cps: &mut Vec<u32>) -> bool {
        while !self.stream.eof() {
            let Some(c) = self.next_translated() else { break };
            if c == b'"' {
                return true;
            }

            if c == b'\\' {
                if prefix == Encoding::Plain && matches!(self.stream.peek(), Some(b'u' | b'U')) {
                    let p = self.stream.position();
                    self.diag.error(
                        SourceSpan::at(p),
                        "\\u/\\U not allowed in plain string literal",
                    );
                }
                let mut v = self.parse_escape(prefix);
                if prefix == Encoding::Plain {
                    v &= 0xFF;
                }
                cps.push(v);
                continue;
            }

            if prefix == Encoding::Plain {
                if c >= 0x80 {
                    let p = self.stream.position();
                    self.diag
                        .error(SourceSpan::at(p), "non-ASCII byte in plain string literal");
                    cps.push(u32::from(b'?'));
                } else {
                    cps.push(u32::from(c));
                }
            } else if c < 0x80 {
                cps.push(u32::from(c));
            } else {
                self.stream.unget();
                let cp = self.utf8_decode_one().unwrap_or(0xFFFD);
                cps.push(cp);
            }
        }
        false
    }

    /// Reads a string literal (with any encoding prefix), including
    /// adjacent-literal concatenation with width promotion.
    pub(super) fn read_string_literal(&mut self) -> Token {
        let start = self.stream.position();

        let mut prefix = Encoding::Plain;
        let blob = self.stream.blob();
        if !self.stream.eof() {
            if blob[2] == b'u' && blob[3] == b'8' && blob[4] == b'"' {
                self.require_u8_literals();
                prefix = Encoding::Utf8;
                self.next_translated();
                self.next_translated();
            } else if blob[2] == b'u' && blob[3] == b'"' {
                prefix = Encoding::Utf16;
                self.next_translated();
            } else if blob[2] == b'U' && blob[3] == b'"' {
                prefix = Encoding::Utf32;
                self.next_translated();
            } else if blob[2] == b'L' && blob[3] == b'"' {
                prefix = Encoding::Wide;
                self.next_translated();
            } else if matches!(blob[2], b'u' | b'U' | b'L')
                && blob[3] != b'"'
                && !(blob[2] == b'u' && blob[3] == b'8')
            {
                let p = self.stream.position();
                self.diag
                    .error(SourceSpan::at(p), "invalid string literal prefix");
            }
        }

        if self.next_translated() != Some(b'"') {
            let p = self.stream.position();
            let span = SourceSpan::new(start, p);
            self.diag
                .error(span, "internal lexer error: expected '\"'");
            return self.error_token(span, "internal lexer error: expected '\"'");
        }

        let mut cps: Vec<u32> = Vec::new();
        if !self.scan_string_body(prefix, &mut cps) {
            let p = self.stream.position();
            self.diag
                .error(SourceSpan::new(start, p), "unterminated string literal");
            self.skip_to_safe_point();
        }

        // Adjacent literal concatenation.
        loop {
            self.skip_space_and_comments();

            let blob = self.stream.blob();
            let next_kind = if blob[2] == b'"' {
                Some(Encoding::Plain)
            } else if blob[2] == b'u' && blob[3] == b'8' && blob[4] == b'"' {
                Some(Encoding::Utf8)
            } else if blob[2] == b'u' && blob[3] == b'"' {
                Some(Encoding::Utf16)
            } else if blob[2] == b'U' && blob[3] == b'"' {
                Some(Encoding::Utf32)
            } else if blob[2] == b'L' && blob[3] == b'"' {
                Some(Encoding::Wide)
            } else {
                None
            };
            let Some(next_kind) = next_kind else { break };

            let promoted = promote(prefix, next_kind, self.ctx.wchar_bits);
            if promoted != prefix {
                let span = SourceSpan::new(start, self.stream.position());
                self.diag_promotion(span, prefix, promoted);
                prefix = promoted;
            }

            match next_kind {
                Encoding::Utf8 => {
                    self.require_u8_literals();
                    self.next_translated();
                    self.next_translated();
                }
                Encoding::Utf16 | Encoding::Utf32 | Encoding::Wide => {
                    self.next_translated();
                }
                Encoding::Plain => {}
            }
            if self.next_translated() != Some(b'"') {
                break;
            }

            if !self.scan_string_body(prefix, &mut cps) {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::new(start, p),
                    "unterminated string literal in concatenation",
                );
                self.skip_to_safe_point();
                break;
            }
        }

        let span = SourceSpan::new(start, self.stream.position());
        let value = self.encode_string(prefix, &cps, span);
        Token::new(TokenKind::String(value), span)
    }

    fn require_u8_literals(&mut self) {
        if !(self.ctx.std_at_least(LangStandard::C23) || self.ctx.gnu_extensions) {
            let p = self.stream.position();
            self.extension(
                SourceSpan::at(p),
                "u8 string literal requires C23 or GNU extensions",
            );
        }
    }

    /// Encodes the decoded code points into the final unit buffer,
    /// NUL-terminated in the chosen width.
    fn encode_string(&mut self, prefix: Encoding, cps: &[u32], span: SourceSpan) -> StringValue {
        match prefix {
            Encoding::Wide => {
                let wide_max = self.ctx.wchar_max();
                let mut units: Vec<u32> = Vec::with_capacity(cps.len() + 1);
                for &raw in cps {
                    let mut cp = raw;
                    if !valid_scalar(cp) {
                        self.diag.warning(
                            span,
                            format!("invalid Unicode scalar U+{cp:04X} in wide string; using U+FFFD"),
                        );
                        cp = 0xFFFD;
                    }
                    if cp > wide_max {
                        self.diag.warning(
                            span,
                            format!(
                                "code point U+{:04X} not representable in target wchar_t({}bits); using U+FFFD",
                                cp, self.ctx.wchar_bits
                            ),
                        );
                        cp = 0xFFFD;
                    }
                    match self.ctx.wchar_bits {
                        8 => units.push(if cp <= 0xFF { cp } else { 0xFFFD & 0xFF }),
                        16 => encode_utf16_wide(&mut units, cp),
                        _ => units.push(cp),
                    }
                }
                units.push(0);
                StringValue::Wide(units)
            }

            Encoding::Utf16 => {
                let mut units: Vec<u16> = Vec::with_capacity(cps.len() + 1);
                for &raw in cps {
                    let mut cp = raw;
                    if !valid_scalar(cp) {
                        self.diag.warning(
                            span,
                            format!("invalid Unicode scalar U+{cp:04X} in u\"\"; using U+FFFD"),
                        );
                        cp = 0xFFFD;
                    }
                    encode_utf16_into(&mut units, cp);
                }
                units.push(0);
                StringValue::Utf16(units)
            }

            Encoding::Utf32 => {
                let mut units: Vec<u32> = Vec::with_capacity(cps.len() + 1);
                for &raw in cps {
                    let mut cp = raw;
                    if !valid_scalar(cp) {
                        self.diag.warning(
                            span,
                            format!("invalid Unicode scalar U+{cp:04X} in U\"\"; using U+FFFD"),
                        );
                        cp = 0xFFFD;
                    }
                    units.push(cp);
                }
                units.push(0);
                StringValue::Utf32(units)
            }

            Encoding::Utf8 => {
                let mut bytes: Vec<u8> = Vec::with_capacity(cps.len() + 1);
                for &raw in cps {
                    let mut cp = raw;
                    if !valid_scalar(cp) {
                        self.diag.warning(
                            span,
                            format!("invalid Unicode scalar U+{cp:04X} in u8\"\"; using U+FFFD"),
                        );
                        cp = 0xFFFD;
                    }
                    encode_utf8_into(&mut bytes, cp);
                }
                bytes.push(0);
                StringValue::Utf8(bytes)
            }

            Encoding::Plain => {
                let mut bytes: Vec<u8> = Vec::with_capacity(cps.len() + 1);
                for &cp in cps {
                    bytes.push((cp & 0xFF) as u8);
                }
                bytes.push(0);
                StringValue::Plain(bytes)
            }
        }
    }

    /// Reads a character constant (with any encoding prefix).
    pub(super) fn read_char_literal(&mut self) -> Token {
        let start = self.stream.position();
        let blob = self.stream.blob();

        let mut encoding = Encoding::Plain;
        if blob[2] == b'u' && blob[3] == b'\'' {
            encoding = Encoding::Utf16;
            self.next_translated();
        } else if blob[2] == b'u' && blob[3] == b'8' && blob[4] == b'\'' {
            if !(self.ctx.std_at_least(LangStandard::C23) || self.ctx.gnu_extensions) {
                let p = self.stream.position();
                self.extension(
                    SourceSpan::at(p),
                    "u8 character literal requires C23 or GNU extensions",
                );
            }
            encoding = Encoding::Utf8;
            self.next_translated();
            self.next_translated();
        } else if blob[2] == b'U' && blob[3] == b'\'' {
            encoding = Encoding::Utf32;
            self.next_translated();
        } else if blob[2] == b'L' && blob[3] == b'\'' {
            encoding = Encoding::Wide;
            self.next_translated();
        }

        if self.next_translated() != Some(b'\'') {
            let p = self.stream.position();
            let span = SourceSpan::new(start, p);
            self.diag.error(span, "internal lexer error: expected '\\''");
            return self.error_token(span, "internal lexer error: expected '\\''");
        }

        let wide_ish = matches!(encoding, Encoding::Utf16 | Encoding::Utf32 | Encoding::Wide);
        let mut chars: Vec<u32> = Vec::new();
        let mut terminated = false;

        while !self.stream.eof() {
            let Some(c) = self.next_translated() else { break };
            if c == b'\'' {
                terminated = true;
                break;
            }
            if c == b'\n' {
                // The newline is consumed, so the next token starts a line.
                let p = self.stream.position();
                let span = SourceSpan::new(start, p);
                self.diag.error(span, "unterminated character literal");
                self.at_line_start = true;
                self.in_directive = false;
                return self.error_token(span, "unterminated character literal");
            }

            if c == b'\\' {
                let peeked = self.stream.peek();
                if !wide_ish && matches!(peeked, Some(b'u' | b'U')) {
                    let p = self.stream.position();
                    self.diag.error(
                        SourceSpan::at(p),
                        "\\u/\\U not allowed in this character literal",
                    );
                }
                let escape_encoding = if wide_ish { encoding } else { Encoding::Plain };
                let v = self.parse_escape(escape_encoding);
                if v == 0xFFFD && matches!(peeked, Some(b'x' | b'u' | b'U')) {
                    return self.recover_bad_char_escape(start);
                }
                chars.push(if wide_ish { v } else { v & 0xFF });
                continue;
            }

            if !wide_ish {
                if c >= 0x80 {
                    let p = self.stream.position();
                    self.diag
                        .error(SourceSpan::at(p), "non-ASCII byte in character literal");
                    chars.push(u32::from(b'?'));
                } else {
                    chars.push(u32::from(c));
                }
            } else if c < 0x80 {
                chars.push(u32::from(c));
            } else {
                self.stream.unget();
                let cp = self.utf8_decode_one().unwrap_or(0xFFFD);
                chars.push(cp);
            }
        }

        if !terminated {
            let p = self.stream.position();
            let span = SourceSpan::new(start, p);
            self.diag.error(span, "unterminated character literal");
            return self.error_token(span, "unterminated character literal");
        }

        if chars.is_empty() {
            let p = self.stream.position();
            let span = SourceSpan::new(start, p);
            self.diag.error(span, "empty character literal");
            return self.error_token(span, "empty character literal");
        }

        let span = SourceSpan::new(start, self.stream.position());
        if chars.len() > 1 {
            self.warn_gated(
                Warning::MulticharChar,
                span,
                "multi-character character literal",
            );
            let mut folded: u32 = 0;
            for &ch in &chars {
                folded = (folded << 8) | (ch & 0xFF);
            }
            chars = vec![folded];
        }

        let mut cp = chars[0];
        let value = match encoding {
            Encoding::Wide => {
                if !valid_scalar(cp) {
                    self.diag.warning(
                        span,
                        format!("invalid Unicode scalar U+{cp:04X} in L''; using U+FFFD"),
                    );
                    cp = 0xFFFD;
                }
                let wide_max = self.ctx.wchar_max();
                if cp > wide_max {
                    self.diag.warning(
                        span,
                        format!(
                            "code point U+{:04X} not representable in target wchar_t({}bits); using U+FFFD",
                            cp, self.ctx.wchar_bits
                        ),
                    );
                    cp = 0xFFFD;
                }
                cp
            }
            Encoding::Utf16 => cp & 0xFFFF,
            Encoding::Utf32 => cp,
            Encoding::Utf8 | Encoding::Plain => cp & 0xFF,
        };

        Token::new(TokenKind::Character(CharValue { value, encoding }), span)
    }

    /// Skips the remainder of a character literal after a malformed
    /// `\x`/`\u`/`\U` escape, consuming through the closing quote when
    /// there is one.
    fn recover_bad_char_escape(&mut self, start: super::span::SourcePosition) -> Token {
        while !self.stream.eof() {
            match self.stream.peek() {
                Some(b'\'') => {
                    self.next_translated();
                    break;
                }
                Some(b'\n') | None => break,
                _ => {
                    self.next_translated();
                }
            }
        }
        let p = self.stream.position();
        let span = SourceSpan::new(start, p);
        self.error_token(span, "invalid escape in character literal")
    }
}
