// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! Compiler-wide configuration consulted by the front end.
//!
//! A [`Context`] is a plain record of language/dialect switches: the language
//! standard, GNU-extension and pedantic modes, trigraph translation, warning
//! masks, and a handful of target parameters the lexer needs (wide-character
//! width, floating-point mode). It is constructed once per compilation and
//! passed by reference to the lexer.

/// Language standard the front end should adhere to.
///
/// The variants are ordered, so `std >= LangStandard::C11` asks "is this at
/// least C11".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LangStandard {
    /// ISO C 1990 (and C89).
    C89,
    /// ISO C 1999.
    C99,
    /// ISO C 2011.
    C11,
    /// ISO C 2017.
    C17,
    /// ISO C 2023.
    C23,
}

impl LangStandard {
    /// Short name used in diagnostics, e.g. `"C99"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::C89 => "C89",
            Self::C99 => "C99",
            Self::C11 => "C11",
            Self::C17 => "C17",
            Self::C23 => "C23",
        }
    }
}

/// Floating-point handling: full hardware support, soft-float codegen
/// intent, or rejection of floating constants altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatMode {
    /// Hardware floating point.
    #[default]
    Full,
    /// Soft-float codegen intent; the lexer treats this like `Full`.
    Soft,
    /// Floating constants are rejected with an error.
    Disabled,
}

/// How diagnostics decide whether to emit ANSI color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Probe stderr and the `NO_COLOR`/`CLICOLOR_FORCE` environment.
    #[default]
    Auto,
    /// Always colorize.
    Always,
    /// Never colorize.
    Never,
}

/// Individually maskable warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// Unused entities (reserved for later passes).
    Unused,
    /// Shadowed declarations (reserved for later passes).
    Shadow,
    /// Trigraph/digraph translation or ignorance.
    Trigraphs,
    /// Multi-character character constants.
    MulticharChar,
    /// String concatenation widening an operand's encoding.
    StringWidthPromotion,
    /// Non-conforming constructs flagged under `-pedantic`.
    Pedantic,
    /// Use of spellings or features a newer standard deprecates.
    Deprecated,
}

impl Warning {
    const COUNT: u32 = 7;

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Top-level compiler context.
#[derive(Debug, Clone)]
pub struct Context {
    /// Language standard to adhere to.
    pub lang_std: LangStandard,
    /// `gnu*` dialects: `$` in identifiers, `\e`, extra suffixes, alternate
    /// keyword spellings, relaxed `u8` gating.
    pub gnu_extensions: bool,
    /// Diagnose non-conforming constructs.
    pub pedantic: bool,
    /// Translate trigraphs and the digraph punctuators.
    pub enable_trigraphs: bool,
    /// Width of the target `wchar_t` in bits: 8, 16, or 32.
    pub wchar_bits: u32,
    /// Floating-point mode.
    pub float_mode: FloatMode,
    /// Upgrade enabled warnings (whose error bit is set) to errors.
    pub warnings_as_errors: bool,
    /// Cap on hard errors before the driver should give up.
    pub max_errors: u32,
    /// Diagnostics color policy.
    pub color_mode: ColorMode,
    /// Emit a trace event per lexed token.
    pub trace_lexer: bool,
    warning_enabled_mask: u32,
    warning_error_mask: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            lang_std: LangStandard::C17,
            gnu_extensions: false,
            pedantic: false,
            enable_trigraphs: false,
            wchar_bits: 32,
            float_mode: FloatMode::Full,
            warnings_as_errors: false,
            max_errors: 20,
            color_mode: ColorMode::Auto,
            trace_lexer: false,
            warning_enabled_mask: (1 << Warning::COUNT) - 1,
            warning_error_mask: 0,
        }
    }
}

impl Context {
    /// Creates a context with default settings: C17, no dialect extensions,
    /// all warnings enabled, none upgraded to errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context for the given standard.
    #[must_use]
    pub fn with_standard(std: LangStandard) -> Self {
        Self {
            lang_std: std,
            ..Self::default()
        }
    }

    /// True when the configured standard is at least `need`.
    #[must_use]
    pub fn std_at_least(&self, need: LangStandard) -> bool {
        self.lang_std >= need
    }

    /// Whether `warning`'s bit is set in the enabled mask.
    #[must_use]
    pub const fn warning_enabled(&self, warning: Warning) -> bool {
        self.warning_enabled_mask & warning.bit() != 0
    }

    /// Whether `warning`'s bit is set in the error mask.
    #[must_use]
    pub const fn warning_as_error(&self, warning: Warning) -> bool {
        self.warning_error_mask & warning.bit() != 0
    }

    /// Enables or disables a warning.
    pub fn set_warning_enabled(&mut self, warning: Warning, on: bool) {
        if on {
            self.warning_enabled_mask |= warning.bit();
        } else {
            self.warning_enabled_mask &= !warning.bit();
        }
    }

    /// Marks a warning for upgrade to error under `warnings_as_errors`.
    pub fn set_warning_as_error(&mut self, warning: Warning, on: bool) {
        if on {
            self.warning_error_mask |= warning.bit();
        } else {
            self.warning_error_mask &= !warning.bit();
        }
    }

    /// Largest code point representable in the target `wchar_t`.
    ///
    /// The 32-bit width reports the signed maximum, matching a signed
    /// `wchar_t` on the usual targets.
    #[must_use]
    pub const fn wchar_max(&self) -> u32 {
        match self.wchar_bits {
            8 => 0xFF,
            16 => 0xFFFF,
            _ => 0x7FFF_FFFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standards_are_ordered() {
        let ctx = Context::with_standard(LangStandard::C11);
        assert!(ctx.std_at_least(LangStandard::C89));
        assert!(ctx.std_at_least(LangStandard::C11));
        assert!(!ctx.std_at_least(LangStandard::C23));
    }

    #[test]
    fn c17_counts_as_c11() {
        let ctx = Context::with_standard(LangStandard::C17);
        assert!(ctx.std_at_least(LangStandard::C11));
        assert!(!ctx.std_at_least(LangStandard::C23));
    }

    #[test]
    fn warning_masks_toggle() {
        let mut ctx = Context::new();
        assert!(ctx.warning_enabled(Warning::Trigraphs));
        ctx.set_warning_enabled(Warning::Trigraphs, false);
        assert!(!ctx.warning_enabled(Warning::Trigraphs));
        assert!(ctx.warning_enabled(Warning::Pedantic));

        assert!(!ctx.warning_as_error(Warning::MulticharChar));
        ctx.set_warning_as_error(Warning::MulticharChar, true);
        assert!(ctx.warning_as_error(Warning::MulticharChar));
    }

    #[test]
    fn wchar_max_per_width() {
        let mut ctx = Context::new();
        assert_eq!(ctx.wchar_max(), 0x7FFF_FFFF);
        ctx.wchar_bits = 16;
        assert_eq!(ctx.wchar_max(), 0xFFFF);
        ctx.wchar_bits = 8;
        assert_eq!(ctx.wchar_max(), 0xFF);
    }

    #[test]
    fn standard_names() {
        assert_eq!(LangStandard::C89.name(), "C89");
        assert_eq!(LangStandard::C23.name(), "C23");
    }
}
