// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Numeric literal scanning and conversion.
//!
//! Handles the three integer bases (plus binary `0b`), decimal and
//! hexadecimal floating constants, C23 `'` and GNU `_` digit separators,
//! and the integer/floating suffix zoo. The scanner accumulates raw
//! spelling first and converts once the token's extent is known, so
//! diagnostics can always quote the original text.
//!
//! Conversion is locale-neutral by construction: decimal floats go through
//! `str::parse::<f64>`, hex floats through a radix fold, so the ambient
//! decimal separator never matters.

use crate::context::{FloatMode, LangStandard};

use super::lexer::{hex_value, Lexer};
use super::span::{SourcePosition, SourceSpan};
use super::token::{
    FloatStyle, FloatSuffix, IntBase, IntSize, IntegerValue, FloatValue, Token, TokenKind,
};

/// Digit alphabet the scanner is currently accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanBase {
    Dec,
    Hex,
    Bin,
}

/// Accumulated spelling plus the digit-separator state machine.
///
/// Separators are legal only between two digits of the current sequence;
/// `reset_seq` marks the boundaries (after a base prefix, around exponent
/// markers) where a separator cannot follow.
struct NumScan {
    text: String,
    base: ScanBase,
    in_exp: bool,
    at_seq_start: bool,
    prev_was_digit: bool,
    last_was_sep: bool,
    used_quote_sep: bool,
    used_underscore_sep: bool,
}

impl NumScan {
    fn new() -> Self {
        Self {
            text: String::new(),
            base: ScanBase::Dec,
            in_exp: false,
            at_seq_start: true,
            prev_was_digit: false,
            last_was_sep: false,
            used_quote_sep: false,
            used_underscore_sep: false,
        }
    }

    fn digit_ok(&self, byte: u8) -> bool {
        if self.in_exp {
            return byte.is_ascii_digit();
        }
        match self.base {
            ScanBase::Bin => byte == b'0' || byte == b'1',
            ScanBase::Hex => byte.is_ascii_hexdigit(),
            ScanBase::Dec => byte.is_ascii_digit(),
        }
    }

    fn reset_seq(&mut self) {
        self.at_seq_start = true;
        self.prev_was_digit = false;
        self.last_was_sep = false;
    }

    const fn is_sep(byte: u8) -> bool {
        byte == b'\'' || byte == b'_'
    }
}

impl Lexer<'_> {
    fn num_next_is_digit(&mut self, scan: &NumScan) -> bool {
        self.stream.peek().is_some_and(|b| scan.digit_ok(b))
    }

    fn num_push_raw(&mut self, scan: &mut NumScan, byte: u8) {
        scan.text.push(byte as char);
        scan.at_seq_start = false;
        scan.prev_was_digit = scan.digit_ok(byte);
        scan.last_was_sep = false;
    }

    /// Pushes one consumed byte, validating separator placement.
    fn num_push(&mut self, scan: &mut NumScan, byte: u8, start: SourcePosition) {
        if NumScan::is_sep(byte) {
            if byte == b'\'' {
                scan.used_quote_sep = true;
            } else {
                scan.used_underscore_sep = true;
            }
            if scan.at_seq_start
                || scan.last_was_sep
                || !scan.prev_was_digit
                || !self.num_next_is_digit(scan)
            {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::new(start, p),
                    "invalid placement for digit separator",
                );
            }
            scan.last_was_sep = true;
        } else {
            self.num_push_raw(scan, byte);
        }
    }

    /// Consumes digits and separators while they fit `accept`; returns
    /// whether any byte matching `accept` was seen.
    fn num_scan_run(
        &mut self,
        scan: &mut NumScan,
        start: SourcePosition,
        accept: impl Fn(u8) -> bool,
    ) -> bool {
        let mut saw_digit = false;
        while let Some(byte) = self.stream.peek() {
            if accept(byte) {
                saw_digit = true;
            } else if !NumScan::is_sep(byte) {
                break;
            }
            let Some(consumed) = self.next_translated() else { break };
            self.num_push(scan, consumed, start);
        }
        saw_digit
    }

    /// Reads an integer or floating constant starting at the current byte.
    pub(super) fn read_number(&mut self) -> Token {
        let start = self.stream.position();
        let mut scan = NumScan::new();

        let mut is_float = false;
        let mut is_hex_float = false;
        let mut used_bin = false;
        let mut saw_hex_sig_digit = false;
        let mut saw_p = false;
        let mut saw_exp_digit = false;
        let mut saw_dec_exp_digit = false;

        if self.stream.peek() == Some(b'0') {
            if let Some(zero) = self.next_translated() {
                self.num_push(&mut scan, zero, start);
            }
            scan.reset_seq();

            match self.stream.peek() {
                Some(b'x' | b'X') => {
                    scan.base = ScanBase::Hex;
                    if let Some(x) = self.next_translated() {
                        self.num_push(&mut scan, x, start);
                    }
                    saw_hex_sig_digit |=
                        self.num_scan_run(&mut scan, start, |b| b.is_ascii_hexdigit());

                    if matches!(self.stream.peek(), Some(b'.' | b'p' | b'P')) {
                        is_float = true;
                        is_hex_float = true;
                        scan.reset_seq();

                        if self.stream.peek() == Some(b'.') {
                            if let Some(dot) = self.next_translated() {
                                self.num_push(&mut scan, dot, start);
                            }
                            saw_hex_sig_digit |=
                                self.num_scan_run(&mut scan, start, |b| b.is_ascii_hexdigit());
                        }
                        if matches!(self.stream.peek(), Some(b'p' | b'P')) {
                            scan.in_exp = true;
                            saw_p = true;
                            scan.reset_seq();
                            if let Some(p) = self.next_translated() {
                                self.num_push_raw(&mut scan, p);
                            }
                            if matches!(self.stream.peek(), Some(b'+' | b'-')) {
                                if let Some(sign) = self.next_translated() {
                                    self.num_push_raw(&mut scan, sign);
                                }
                            }
                            saw_exp_digit |=
                                self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
                        }
                    }
                }
                Some(b'b' | b'B') => {
                    used_bin = true;
                    scan.base = ScanBase::Bin;
                    if let Some(b) = self.next_translated() {
                        self.num_push(&mut scan, b, start);
                    }
                    scan.reset_seq();
                    self.num_scan_run(&mut scan, start, |b| b == b'0' || b == b'1');
                }
                _ => {
                    self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
                    if self.stream.peek() == Some(b'.') {
                        is_float = true;
                        scan.reset_seq();
                        if let Some(dot) = self.next_translated() {
                            self.num_push(&mut scan, dot, start);
                        }
                        self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
                    }
                }
            }
        } else if self.stream.peek() == Some(b'.') {
            is_float = true;
            scan.reset_seq();
            if let Some(dot) = self.next_translated() {
                self.num_push(&mut scan, dot, start);
            }
            self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
        } else {
            self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
            if self.stream.peek() == Some(b'.') {
                is_float = true;
                scan.reset_seq();
                if let Some(dot) = self.next_translated() {
                    self.num_push(&mut scan, dot, start);
                }
                self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
            }
        }

        if !is_hex_float && matches!(self.stream.peek(), Some(b'e' | b'E')) {
            is_float = true;
            scan.in_exp = true;
            scan.reset_seq();
            if let Some(e) = self.next_translated() {
                self.num_push_raw(&mut scan, e);
            }
            if matches!(self.stream.peek(), Some(b'+' | b'-')) {
                if let Some(sign) = self.next_translated() {
                    self.num_push_raw(&mut scan, sign);
                }
            }
            saw_dec_exp_digit |= self.num_scan_run(&mut scan, start, |b| b.is_ascii_digit());
        }

        // Suffixes.
        let mut float_suffix_text = String::new();
        let mut float_suffix_lower = String::new();
        if is_float {
            while float_suffix_text.len() < 7 {
                let Some(byte) = self.stream.peek() else { break };
                if !byte.is_ascii_alphanumeric() || matches!(byte, b'i' | b'I' | b'j' | b'J') {
                    break;
                }
                self.next_translated();
                float_suffix_text.push(byte as char);
            }
            float_suffix_lower = float_suffix_text.to_ascii_lowercase();

            let suffix_ok = match float_suffix_lower.as_str() {
                "" | "f" | "l" => true,
                "f16" | "f32" | "f64" | "f128" | "f32x" | "f64x" | "f128x" => {
                    if !self.ctx.gnu_extensions {
                        let span = SourceSpan::new(start, self.stream.position());
                        self.extension(
                            span,
                            format!("floating suffix '{float_suffix_text}' requires GNU extensions"),
                        );
                    }
                    true
                }
                "df" | "dd" | "dl" => {
                    if !(self.ctx.std_at_least(LangStandard::C23) || self.ctx.gnu_extensions) {
                        let span = SourceSpan::new(start, self.stream.position());
                        self.extension(
                            span,
                            format!(
                                "decimal floating suffix '{float_suffix_text}' requires C23 or GNU extensions"
                            ),
                        );
                    }
                    true
                }
                _ => false,
            };
            if !suffix_ok {
                let span = SourceSpan::new(start, self.stream.position());
                self.diag
                    .error(span, format!("unknown floating suffix '{float_suffix_text}'"));
                return self.error_token(span, "bad floating suffix");
            }
        }

        let mut int_suffix = String::new();
        if !is_float {
            while matches!(self.stream.peek(), Some(b'u' | b'U' | b'l' | b'L')) {
                if let Some(c) = self.next_translated() {
                    int_suffix.push(c as char);
                }
            }
        }

        let span_num = SourceSpan::new(start, self.stream.position());

        if matches!(self.stream.peek(), Some(b'i' | b'I' | b'j' | b'J')) {
            self.next_translated();
            if self.ctx.std_at_least(LangStandard::C23) {
                self.diag
                    .error(span_num, "imaginary-number suffix is removed in C23");
            } else if !self.ctx.gnu_extensions {
                self.extension(span_num, "imaginary-number suffix is a non-standard extension");
            }
        }

        if !valid_int_suffix(&int_suffix) {
            let span = SourceSpan::new(start, self.stream.position());
            self.diag
                .error(span, format!("invalid integer suffix '{int_suffix}'"));
            return self.error_token(span, "bad integer suffix");
        }

        if is_hex_float {
            if !saw_p {
                self.diag
                    .error(span_num, "hexadecimal floating constant requires a 'p' exponent");
                return self.error_token(span_num, "missing p exponent");
            }
            if !saw_exp_digit {
                self.diag.error(span_num, "exponent has no digits after 'p'");
                return self.error_token(span_num, "digits after p exponent");
            }
            if !saw_hex_sig_digit {
                self.diag.error(
                    span_num,
                    "hexadecimal floating constant has no significant hex digits",
                );
                return self.error_token(span_num, "no significant hex digits");
            }
        }
        if is_float && !is_hex_float && scan.in_exp && !saw_dec_exp_digit {
            self.diag.error(span_num, "exponent has no digits after 'e'");
            return self.error_token(span_num, "no digits after e");
        }

        if used_bin && !(self.ctx.std_at_least(LangStandard::C23) || self.ctx.gnu_extensions) {
            self.extension(span_num, "binary literal '0b...' requires C23 or GNU extensions");
        }
        if scan.used_quote_sep && !self.ctx.std_at_least(LangStandard::C23) {
            self.extension(span_num, "digit separator '\\'' is not allowed before C23");
        }
        if scan.used_underscore_sep && !self.ctx.gnu_extensions {
            self.extension(span_num, "underscore digit separator is a non-standard extension");
        }
        if is_hex_float && !(self.ctx.std_at_least(LangStandard::C99) || self.ctx.gnu_extensions) {
            self.extension(span_num, "hexadecimal floating constant requires C99 or GNU extensions");
        }
        if is_float && self.ctx.float_mode == FloatMode::Disabled {
            self.diag
                .error(span_num, "floating constants are disabled by configuration");
        }

        let cleaned: String = scan
            .text
            .chars()
            .filter(|c| *c != '\'' && *c != '_')
            .collect();
        let unsigned = int_suffix.chars().any(|c| c == 'u' || c == 'U');
        let l_count = int_suffix.chars().filter(|c| *c == 'l' || *c == 'L').count();

        let kind = if is_float {
            let value = if is_hex_float {
                parse_hex_float(&cleaned)
            } else {
                match cleaned.parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => {
                        let p = self.stream.position();
                        self.diag.error(
                            SourceSpan::new(start, p),
                            format!("malformed floating constant '{}'", scan.text),
                        );
                        0.0
                    }
                }
            };

            if value.is_infinite() {
                self.diag.warning(span_num, "floating constant overflow");
            } else if value == 0.0 && significand_nonzero(&cleaned, is_hex_float) {
                self.diag.warning(span_num, "floating constant underflow");
            }

            TokenKind::Float(FloatValue {
                value,
                style: if is_hex_float {
                    FloatStyle::Hex
                } else {
                    FloatStyle::Decimal
                },
                suffix: classify_float_suffix(&float_suffix_lower),
            })
        } else {
            let (value, base) = self.convert_integer(&scan, &cleaned, used_bin, unsigned, start, span_num);
            match (value, base) {
                (Some(value), base) => TokenKind::Integer(IntegerValue {
                    value,
                    base,
                    unsigned,
                    size: match l_count {
                        0 => IntSize::None,
                        1 => IntSize::Long,
                        _ => IntSize::LongLong,
                    },
                }),
                (None, _) => {
                    let span = SourceSpan::new(start, self.stream.position());
                    return self.error_token(span, "malformed binary integer constant");
                }
            }
        };

        Token::new(kind, SourceSpan::new(start, self.stream.position()))
    }

    /// Converts the cleaned integer spelling, diagnosing range problems.
    /// `None` means the constant was hopeless and an error token is due.
    fn convert_integer(
        &mut self,
        scan: &NumScan,
        cleaned: &str,
        used_bin: bool,
        unsigned: bool,
        start: SourcePosition,
        span_num: SourceSpan,
    ) -> (Option<u64>, IntBase) {
        if used_bin {
            let digits = cleaned.get(2..).unwrap_or("");
            if digits.is_empty() {
                let p = self.stream.position();
                self.diag.error(
                    SourceSpan::new(start, p),
                    format!("malformed binary integer constant '{}'", scan.text),
                );
                return (None, IntBase::Binary);
            }
            let mut value: u64 = 0;
            let mut overflow = false;
            for d in digits.bytes() {
                let bit = u64::from(d - b'0');
                if value > (u64::MAX >> 1) || (value == (u64::MAX >> 1) && bit != 0) {
                    overflow = true;
                }
                value = (value << 1) | bit;
            }
            if overflow {
                self.diag.warning(span_num, "integer constant out of range");
            } else if !unsigned && value > i64::MAX as u64 {
                self.diag
                    .warning(span_num, "integer constant out of range for signed type");
            }
            return (Some(value), IntBase::Binary);
        }

        let bytes = cleaned.as_bytes();
        let (radix, digits, base) =
            if bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
                (16u64, &cleaned[2..], IntBase::Hex)
            } else if bytes.first() == Some(&b'0') && cleaned.len() > 1 {
                (8u64, &cleaned[1..], IntBase::Octal)
            } else {
                (10u64, cleaned, IntBase::Decimal)
            };

        let mut digits = digits;
        if base == IntBase::Octal {
            if let Some(idx) = digits.bytes().position(|d| d == b'8' || d == b'9') {
                let bad = digits.as_bytes()[idx] as char;
                self.diag
                    .error(span_num, format!("invalid digit '{bad}' in octal constant"));
                digits = &digits[..idx];
            }
        }

        if digits.is_empty() && base == IntBase::Hex {
            let p = self.stream.position();
            self.diag.error(
                SourceSpan::new(start, p),
                format!("malformed integer constant '{}'", scan.text),
            );
        }

        let mut value: u64 = 0;
        let mut overflow = false;
        for d in digits.bytes() {
            let dv = u64::from(hex_value(d));
            match value.checked_mul(radix).and_then(|v| v.checked_add(dv)) {
                Some(v) => value = v,
                None => {
                    overflow = true;
                    value = u64::MAX;
                    break;
                }
            }
        }

        if overflow {
            self.diag.warning(span_num, "integer constant out of range");
            if !unsigned {
                value = i64::MAX as u64;
            }
        } else if !unsigned && value > i64::MAX as u64 {
            self.diag.warning(span_num, "integer constant out of range");
            value = i64::MAX as u64;
        }

        (Some(value), base)
    }
}

/// Zero or one `u`, zero/one/two `l` (a pair must share case).
fn valid_int_suffix(suffix: &str) -> bool {
    let u_count = suffix.chars().filter(|c| *c == 'u' || *c == 'U').count();
    let ls: Vec<char> = suffix.chars().filter(|c| *c == 'l' || *c == 'L').collect();
    u_count <= 1 && ls.len() <= 2 && (ls.len() < 2 || ls[0] == ls[1])
}

fn classify_float_suffix(lower: &str) -> FloatSuffix {
    match lower {
        "f" => FloatSuffix::F,
        "l" => FloatSuffix::L,
        "f16" => FloatSuffix::F16,
        "f32" => FloatSuffix::F32,
        "f64" => FloatSuffix::F64,
        "f128" => FloatSuffix::F128,
        "f32x" => FloatSuffix::F32x,
        "f64x" => FloatSuffix::F64x,
        "f128x" => FloatSuffix::F128x,
        "df" => FloatSuffix::Df,
        "dd" => FloatSuffix::Dd,
        "dl" => FloatSuffix::Dl,
        _ => FloatSuffix::None,
    }
}

/// Whether the significand contains a nonzero digit, so conversion to zero
/// means underflow rather than a genuine zero.
fn significand_nonzero(cleaned: &str, hex: bool) -> bool {
    if hex {
        let body = cleaned.get(2..).unwrap_or("");
        let mantissa = body.split(['p', 'P']).next().unwrap_or("");
        mantissa
            .bytes()
            .any(|b| b.is_ascii_hexdigit() && b != b'0')
    } else {
        let mantissa = cleaned.split(['e', 'E']).next().unwrap_or("");
        mantissa.bytes().any(|b| b.is_ascii_digit() && b != b'0')
    }
}

/// Converts a cleaned `0x...p...` spelling. The scanner has already
/// guaranteed a significand digit and exponent digits exist.
fn parse_hex_float(cleaned: &str) -> f64 {
    let body = cleaned.get(2..).unwrap_or("");
    let (mantissa, exponent) = body.split_once(['p', 'P']).unwrap_or((body, "0"));
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut value = 0.0f64;
    for d in int_part.bytes() {
        value = value * 16.0 + f64::from(hex_value(d));
    }
    let mut scale = 1.0 / 16.0;
    for d in frac_part.bytes() {
        value += f64::from(hex_value(d)) * scale;
        scale /= 16.0;
    }

    let (negative, digits) = match exponent.as_bytes().first() {
        Some(b'+') => (false, &exponent[1..]),
        Some(b'-') => (true, &exponent[1..]),
        _ => (false, exponent),
    };
    let mut exp: i64 = 0;
    for d in digits.bytes() {
        exp = (exp * 10 + i64::from(d - b'0')).min(100_000);
    }
    if negative {
        exp = -exp;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "exponent is clamped well inside i32 range"
    )]
    let exp = exp.clamp(-100_000, 100_000) as i32;

    value * 2f64.powi(exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_suffix_validation() {
        assert!(valid_int_suffix(""));
        assert!(valid_int_suffix("u"));
        assert!(valid_int_suffix("UL"));
        assert!(valid_int_suffix("ll"));
        assert!(valid_int_suffix("ull"));
        assert!(valid_int_suffix("LLU"));
        assert!(!valid_int_suffix("lL"));
        assert!(!valid_int_suffix("uu"));
        assert!(!valid_int_suffix("lll"));
    }

    #[test]
    fn hex_float_conversion() {
        assert_eq!(parse_hex_float("0x1p0"), 1.0);
        assert_eq!(parse_hex_float("0x1.8p1"), 3.0);
        assert_eq!(parse_hex_float("0x.8p0"), 0.5);
        assert_eq!(parse_hex_float("0x10p-4"), 1.0);
        assert_eq!(parse_hex_float("0xA.Bp2"), (10.0 + 11.0 / 16.0) * 4.0);
        assert!(parse_hex_float("0x1p99999").is_infinite());
    }

    #[test]
    fn underflow_detection_needs_nonzero_significand() {
        assert!(significand_nonzero("1e-9999", false));
        assert!(!significand_nonzero("0e-9999", false));
        assert!(significand_nonzero("0x1p-99999", true));
        assert!(!significand_nonzero("0x0p-99999", true));
    }

    #[test]
    fn float_suffix_classification() {
        assert_eq!(classify_float_suffix(""), FloatSuffix::None);
        assert_eq!(classify_float_suffix("f"), FloatSuffix::F);
        assert_eq!(classify_float_suffix("l"), FloatSuffix::L);
        assert_eq!(classify_float_suffix("f128x"), FloatSuffix::F128x);
        assert_eq!(classify_float_suffix("dd"), FloatSuffix::Dd);
    }
}
