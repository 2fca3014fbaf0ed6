// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the lexer.
//!
//! Each [`Token`] pairs a [`TokenKind`] with the [`SourceSpan`] it was read
//! from. Literal payloads (decoded numbers, strings, characters) live inside
//! the kind, so consumers pattern-match once and get both classification and
//! value.
//!
//! Identifier, keyword-spelling, header-name, and error-reason strings are
//! interned; the kinds carry [`Symbol`]s that resolve through the lexer's
//! [`Interner`](crate::intern::Interner).

use std::fmt;

use crate::intern::Symbol;

use super::span::SourceSpan;

/// Text encoding of a string or character literal.
///
/// Exactly one encoding applies to every string or character token; it is
/// carried structurally by [`StringValue`] and [`CharValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Encoding {
    /// No prefix: `""` / `''`. 8-bit units, source bytes only.
    Plain,
    /// `u8""` / `u8''`. UTF-8 code units.
    Utf8,
    /// `u""` / `u''`. UTF-16 code units.
    Utf16,
    /// `U""` / `U''`. UTF-32 code units.
    Utf32,
    /// `L""` / `L''`. Target-dependent wide units.
    Wide,
}

impl Encoding {
    /// Promotion rank: `plain < u8 < u16 < u32 < wide`.
    #[must_use]
    pub const fn rank(self) -> u32 {
        self as u32
    }

    /// The prefix spelling used in diagnostics.
    #[must_use]
    pub const fn prefix_name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Utf8 => "u8",
            Self::Utf16 => "u",
            Self::Utf32 => "U",
            Self::Wide => "L",
        }
    }

    /// Code-unit width in bits; `wchar_bits` resolves the wide case.
    #[must_use]
    pub const fn unit_bits(self, wchar_bits: u32) -> u32 {
        match self {
            Self::Plain | Self::Utf8 => 8,
            Self::Utf16 => 16,
            Self::Utf32 => 32,
            Self::Wide => wchar_bits,
        }
    }
}

/// Radix of an integer constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntBase {
    /// Ordinary decimal.
    Decimal,
    /// `0x` / `0X` prefix.
    Hex,
    /// Leading `0`.
    Octal,
    /// `0b` / `0B` prefix.
    Binary,
}

/// Length suffix on an integer constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntSize {
    /// No `l` suffix.
    #[default]
    None,
    /// `l` / `L`.
    Long,
    /// `ll` / `LL`.
    LongLong,
}

/// Decoded integer constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerValue {
    /// Magnitude as parsed, saturated at `u64::MAX` on overflow.
    pub value: u64,
    /// Radix the constant was written in.
    pub base: IntBase,
    /// `u`/`U` suffix present.
    pub unsigned: bool,
    /// `l`/`ll` suffix.
    pub size: IntSize,
}

impl IntegerValue {
    /// The value viewed as the signed 64-bit representation.
    #[must_use]
    pub const fn as_signed(&self) -> i64 {
        self.value as i64
    }

    /// The value viewed as the unsigned 64-bit representation.
    #[must_use]
    pub const fn as_unsigned(&self) -> u64 {
        self.value
    }
}

/// Whether a floating constant was spelled in decimal or hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatStyle {
    /// `1.5`, `2e10`, `.25`.
    Decimal,
    /// `0x1.8p3`.
    Hex,
}

/// Suffix on a floating constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum FloatSuffix {
    #[default]
    None,
    F,
    /// `l`/`L`: `long double`.
    L,
    F16,
    F32,
    F64,
    F128,
    F32x,
    F64x,
    F128x,
    /// `df`: `_Decimal32`.
    Df,
    /// `dd`: `_Decimal64`.
    Dd,
    /// `dl`: `_Decimal128`.
    Dl,
}

/// Decoded floating constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatValue {
    /// The binary64 value.
    pub value: f64,
    /// Spelling style.
    pub style: FloatStyle,
    /// Suffix, if any.
    pub suffix: FloatSuffix,
}

/// Decoded character constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharValue {
    /// The scalar, already folded/clamped to the encoding's width.
    pub value: u32,
    /// Encoding prefix the constant was written with.
    pub encoding: Encoding,
}

/// Decoded string literal payload, NUL-terminated in its unit width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringValue {
    /// `""`: each unit is a source byte (escapes masked to 8 bits).
    Plain(Vec<u8>),
    /// `u8""`: UTF-8 encoded bytes.
    Utf8(Vec<u8>),
    /// `u""`: UTF-16 units with surrogate pairs.
    Utf16(Vec<u16>),
    /// `U""`: one unit per code point.
    Utf32(Vec<u32>),
    /// `L""`: units clamped to the target wide width.
    Wide(Vec<u32>),
}

impl StringValue {
    /// The encoding this payload was produced for.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        match self {
            Self::Plain(_) => Encoding::Plain,
            Self::Utf8(_) => Encoding::Utf8,
            Self::Utf16(_) => Encoding::Utf16,
            Self::Utf32(_) => Encoding::Utf32,
            Self::Wide(_) => Encoding::Wide,
        }
    }

    /// Number of code units including the NUL terminator.
    #[must_use]
    pub fn unit_len(&self) -> usize {
        match self {
            Self::Plain(v) | Self::Utf8(v) => v.len(),
            Self::Utf16(v) => v.len(),
            Self::Utf32(v) | Self::Wide(v) => v.len(),
        }
    }

    /// Number of code units before the NUL terminator.
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.unit_len().saturating_sub(1)
    }
}

/// Punctuators, with digraph spellings already folded to their primary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Period,
    Ellipsis,
    Arrow,
    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Star,
    Slash,
    Percent,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Tilde,
    Bang,
    Question,
    Colon,
    Semicolon,
    Comma,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    ShlAssign,
    ShrAssign,
    Shl,
    Shr,
    AmpAssign,
    CaretAssign,
    PipeAssign,
    /// `#`, which opens a directive at the start of a line.
    Hash,
    /// `##`, the preprocessor paste operator.
    HashHash,
}

impl Punct {
    /// All punctuators with their spellings, longest first so maximal munch
    /// falls out of a linear scan.
    pub(super) const TABLE: &'static [(&'static str, Punct)] = &[
        ("<<=", Punct::ShlAssign),
        (">>=", Punct::ShrAssign),
        ("...", Punct::Ellipsis),
        ("##", Punct::HashHash),
        ("<<", Punct::Shl),
        (">>", Punct::Shr),
        ("&&", Punct::AmpAmp),
        ("||", Punct::PipePipe),
        ("->", Punct::Arrow),
        ("++", Punct::PlusPlus),
        ("--", Punct::MinusMinus),
        ("+=", Punct::PlusAssign),
        ("-=", Punct::MinusAssign),
        ("*=", Punct::StarAssign),
        ("/=", Punct::SlashAssign),
        ("%=", Punct::PercentAssign),
        ("&=", Punct::AmpAssign),
        ("^=", Punct::CaretAssign),
        ("|=", Punct::PipeAssign),
        ("<=", Punct::Le),
        (">=", Punct::Ge),
        ("==", Punct::EqEq),
        ("!=", Punct::Ne),
        ("#", Punct::Hash),
        ("?", Punct::Question),
        (":", Punct::Colon),
        (";", Punct::Semicolon),
        (",", Punct::Comma),
        (".", Punct::Period),
        ("+", Punct::Plus),
        ("-", Punct::Minus),
        ("*", Punct::Star),
        ("/", Punct::Slash),
        ("%", Punct::Percent),
        ("<", Punct::Lt),
        (">", Punct::Gt),
        ("=", Punct::Assign),
        ("!", Punct::Bang),
        ("~", Punct::Tilde),
        ("^", Punct::Caret),
        ("&", Punct::Amp),
        ("|", Punct::Pipe),
        ("(", Punct::LParen),
        (")", Punct::RParen),
        ("[", Punct::LBracket),
        ("]", Punct::RBracket),
        ("{", Punct::LBrace),
        ("}", Punct::RBrace),
    ];

    /// The primary spelling.
    #[must_use]
    pub fn spelling(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, p)| *p == self)
            .map_or("", |&(s, _)| s)
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Language keywords.
///
/// Alternate spellings that name the same meaning share a kind: `_Alignas`
/// and `alignas` both classify as [`Keyword::Alignas`]. Spellings that GNU C
/// treats as distinct tokens (`asm` vs `__asm__`) keep distinct kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Keyword {
    Alignas,
    Alignof,
    Asm,
    AsmGnu,
    Atomic,
    Attribute,
    Auto,
    AutoType,
    BitInt,
    Bool,
    BoolUnderscore,
    Break,
    BuiltinTypesCompatibleP,
    Case,
    Char,
    Complex,
    Const,
    ConstGnu,
    Continue,
    Decimal32,
    Decimal64,
    Decimal128,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extension,
    Extern,
    False,
    Float,
    Float32,
    Float64,
    Float80,
    Float128,
    For,
    Function,
    Generic,
    Goto,
    If,
    Imag,
    Imaginary,
    Inline,
    InlineGnu,
    Int,
    Int128,
    Label,
    Long,
    Noreturn,
    Pragma,
    Real,
    Register,
    Restrict,
    RestrictGnu,
    Return,
    Short,
    Signed,
    SignedGnu,
    Sizeof,
    Static,
    StaticAssert,
    Struct,
    Switch,
    Thread,
    ThreadLocal,
    True,
    Typedef,
    Typeof,
    Union,
    Unsigned,
    Void,
    Volatile,
    VolatileGnu,
    While,
}

/// Preprocessor directive names and operators.
///
/// These classify only inside a directive line; outside one, the same
/// spellings are ordinary identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum PpKeyword {
    Assert,
    AssertAny,
    AssertGnu,
    Define,
    Defined,
    Elif,
    Elifdef,
    Elifndef,
    Else,
    Embed,
    Endif,
    Error,
    HasCAttribute,
    HasInclude,
    Ident,
    If,
    Ifdef,
    Ifndef,
    Import,
    Include,
    IncludeNext,
    Line,
    Pragma,
    Sccs,
    Unassert,
    Undef,
    VaOpt,
    Warning,
}

/// Classification plus payload for one lexed token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// End of input. Always produced, never an error.
    Eof,
    /// Malformed input; carries the interned reason string and nothing else.
    Error(Symbol),
    /// An identifier (or a keyword spelling demoted by context).
    Identifier(Symbol),
    /// An integer constant.
    Integer(IntegerValue),
    /// A floating constant.
    Float(FloatValue),
    /// A character constant.
    Character(CharValue),
    /// A string literal, after adjacent-literal concatenation.
    String(StringValue),
    /// A `<...>` or `"..."` header name inside an include-family directive.
    HeaderName(Symbol),
    /// A punctuator.
    Punct(Punct),
    /// A language keyword.
    Keyword(Keyword),
    /// A preprocessor directive keyword or operator.
    PpKeyword(PpKeyword),
}

impl TokenKind {
    /// Returns true for the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns true for an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the interned string if this kind carries one.
    #[must_use]
    pub const fn symbol(&self) -> Option<Symbol> {
        match self {
            Self::Identifier(sym) | Self::HeaderName(sym) | Self::Error(sym) => Some(*sym),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "<eof>"),
            Self::Error(_) => write!(f, "<error>"),
            Self::Identifier(_) => write!(f, "identifier"),
            Self::Integer(v) => write!(f, "integer constant {}", v.value),
            Self::Float(v) => write!(f, "floating constant {}", v.value),
            Self::Character(_) => write!(f, "character constant"),
            Self::String(_) => write!(f, "string literal"),
            Self::HeaderName(_) => write!(f, "header name"),
            Self::Punct(p) => write!(f, "'{p}'"),
            Self::Keyword(k) => write!(f, "keyword {k:?}"),
            Self::PpKeyword(k) => write!(f, "directive {k:?}"),
        }
    }
}

/// A classified token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    span: SourceSpan,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// The token's classification and payload.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token, returning its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Where the token was read from.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punct_table_is_longest_first() {
        let mut last_len = usize::MAX;
        for (spelling, _) in Punct::TABLE {
            assert!(spelling.len() <= last_len, "table out of order at {spelling}");
            last_len = spelling.len();
        }
    }

    #[test]
    fn punct_spellings_round_trip() {
        assert_eq!(Punct::ShlAssign.spelling(), "<<=");
        assert_eq!(Punct::Ellipsis.spelling(), "...");
        assert_eq!(Punct::Hash.spelling(), "#");
        assert_eq!(Punct::Semicolon.to_string(), ";");
    }

    #[test]
    fn encoding_ranks_are_ordered() {
        assert!(Encoding::Plain.rank() < Encoding::Utf8.rank());
        assert!(Encoding::Utf8.rank() < Encoding::Utf16.rank());
        assert!(Encoding::Utf16.rank() < Encoding::Utf32.rank());
        assert!(Encoding::Utf32.rank() < Encoding::Wide.rank());
    }

    #[test]
    fn encoding_unit_bits() {
        assert_eq!(Encoding::Plain.unit_bits(32), 8);
        assert_eq!(Encoding::Utf16.unit_bits(32), 16);
        assert_eq!(Encoding::Wide.unit_bits(16), 16);
        assert_eq!(Encoding::Wide.unit_bits(8), 8);
    }

    #[test]
    fn integer_value_views() {
        let v = IntegerValue {
            value: u64::MAX,
            base: IntBase::Hex,
            unsigned: true,
            size: IntSize::None,
        };
        assert_eq!(v.as_unsigned(), u64::MAX);
        assert_eq!(v.as_signed(), -1);
    }

    #[test]
    fn string_value_lengths() {
        let v = StringValue::Utf16(vec![0x41, 0x42, 0]);
        assert_eq!(v.unit_len(), 3);
        assert_eq!(v.content_len(), 2);
        assert_eq!(v.encoding(), Encoding::Utf16);
    }
}
