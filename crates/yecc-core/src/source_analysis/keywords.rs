// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! The keyword and directive-name table.
//!
//! One static table classifies every reserved spelling the lexer knows:
//! language keywords, preprocessor directive names, and the GNU extension
//! vocabulary. Each entry records the context it applies to (directive line
//! or regular code), the minimum standard that blesses it, whether it is
//! GNU-only, which spelling generation it belongs to (`_Alignas` vs
//! `alignas`), and its C23 status. The lexer turns those policy bits into
//! extension/deprecation diagnostics after classification.
//!
//! The table is sorted by spelling; lookup is a binary search widened to the
//! neighbor entries for the two spellings (`if`, `else`) that exist in both
//! contexts.

use crate::context::LangStandard;

use super::token::{Keyword, PpKeyword, TokenKind};

/// Which spelling generation an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SpellingForm {
    /// The only spelling there is.
    Neutral,
    /// Underscored spelling that C23 deprecates (`_Alignas`).
    OldForm,
    /// Lowercase spelling introduced by C23 (`alignas`).
    NewForm,
}

/// C23's verdict on a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum C23Status {
    /// Unaffected.
    None,
    /// Still accepted, but diagnosed.
    Deprecated,
    /// No longer part of the language.
    Removed,
}

/// What a reserved spelling classifies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KwKind {
    /// A language keyword.
    Keyword(Keyword),
    /// A preprocessor directive name or operator.
    Pp(PpKeyword),
}

/// One reserved spelling with its classification policy.
#[derive(Debug)]
pub(super) struct KwEntry {
    pub(super) spelling: &'static str,
    pub(super) kind: KwKind,
    pub(super) min_std: LangStandard,
    pub(super) gnu_only: bool,
    pub(super) spelling_form: SpellingForm,
    pub(super) c23: C23Status,
}

impl KwEntry {
    /// True for directive-context entries.
    pub(super) const fn is_preprocessor(&self) -> bool {
        matches!(self.kind, KwKind::Pp(_))
    }

    /// The token kind this entry classifies to.
    pub(super) const fn token_kind(&self) -> TokenKind {
        match self.kind {
            KwKind::Keyword(k) => TokenKind::Keyword(k),
            KwKind::Pp(p) => TokenKind::PpKeyword(p),
        }
    }
}

const fn kw(spelling: &'static str, keyword: Keyword, min_std: LangStandard) -> KwEntry {
    KwEntry {
        spelling,
        kind: KwKind::Keyword(keyword),
        min_std,
        gnu_only: false,
        spelling_form: SpellingForm::Neutral,
        c23: C23Status::None,
    }
}

const fn kw_gnu(spelling: &'static str, keyword: Keyword) -> KwEntry {
    KwEntry {
        gnu_only: true,
        ..kw(spelling, keyword, LangStandard::C89)
    }
}

const fn kw_old(spelling: &'static str, keyword: Keyword, min_std: LangStandard) -> KwEntry {
    KwEntry {
        spelling_form: SpellingForm::OldForm,
        ..kw(spelling, keyword, min_std)
    }
}

const fn kw_new(spelling: &'static str, keyword: Keyword) -> KwEntry {
    KwEntry {
        spelling_form: SpellingForm::NewForm,
        ..kw(spelling, keyword, LangStandard::C23)
    }
}

const fn kw_c23(spelling: &'static str, keyword: Keyword, min_std: LangStandard, c23: C23Status) -> KwEntry {
    KwEntry {
        c23,
        ..kw(spelling, keyword, min_std)
    }
}

const fn pp(spelling: &'static str, keyword: PpKeyword, min_std: LangStandard) -> KwEntry {
    KwEntry {
        spelling,
        kind: KwKind::Pp(keyword),
        min_std,
        gnu_only: false,
        spelling_form: SpellingForm::Neutral,
        c23: C23Status::None,
    }
}

const fn pp_gnu(spelling: &'static str, keyword: PpKeyword) -> KwEntry {
    KwEntry {
        gnu_only: true,
        ..pp(spelling, keyword, LangStandard::C89)
    }
}

/// The reserved-spelling table, sorted by spelling.
#[rustfmt::skip]
static TABLE: &[KwEntry] = &[
    kw_old("_Alignas", Keyword::Alignas, LangStandard::C11),
    kw_old("_Alignof", Keyword::Alignof, LangStandard::C11),
    kw("_Atomic", Keyword::Atomic, LangStandard::C11),
    kw("_BitInt", Keyword::BitInt, LangStandard::C23),
    kw("_Bool", Keyword::BoolUnderscore, LangStandard::C99),
    kw("_Complex", Keyword::Complex, LangStandard::C99),
    kw("_Decimal128", Keyword::Decimal128, LangStandard::C23),
    kw("_Decimal32", Keyword::Decimal32, LangStandard::C23),
    kw("_Decimal64", Keyword::Decimal64, LangStandard::C23),
    kw("_Float128", Keyword::Float128, LangStandard::C23),
    kw("_Float32", Keyword::Float32, LangStandard::C23),
    kw("_Float64", Keyword::Float64, LangStandard::C23),
    kw("_Float80", Keyword::Float80, LangStandard::C23),
    kw("_Generic", Keyword::Generic, LangStandard::C11),
    kw_c23("_Imaginary", Keyword::Imaginary, LangStandard::C99, C23Status::Removed),
    kw_c23("_Noreturn", Keyword::Noreturn, LangStandard::C11, C23Status::Deprecated),
    kw("_Pragma", Keyword::Pragma, LangStandard::C99),
    kw_old("_Static_assert", Keyword::StaticAssert, LangStandard::C11),
    kw_old("_Thread_local", Keyword::ThreadLocal, LangStandard::C11),
    kw_gnu("__FUNCTION__", Keyword::Function),
    pp("__VA_OPT__", PpKeyword::VaOpt, LangStandard::C23),
    kw_gnu("__asm__", Keyword::AsmGnu),
    pp("__assert", PpKeyword::AssertGnu, LangStandard::C89),
    pp("__assert_any", PpKeyword::AssertAny, LangStandard::C89),
    kw_gnu("__attribute__", Keyword::Attribute),
    kw_gnu("__auto_type", Keyword::AutoType),
    kw_gnu("__builtin_types_compatible_p", Keyword::BuiltinTypesCompatibleP),
    kw_gnu("__const__", Keyword::ConstGnu),
    kw_gnu("__extension__", Keyword::Extension),
    pp("__has_c_attribute", PpKeyword::HasCAttribute, LangStandard::C23),
    pp("__has_include", PpKeyword::HasInclude, LangStandard::C23),
    kw_gnu("__imag__", Keyword::Imag),
    kw_gnu("__inline__", Keyword::InlineGnu),
    kw_gnu("__int128", Keyword::Int128),
    kw_gnu("__label__", Keyword::Label),
    kw_gnu("__real__", Keyword::Real),
    kw_gnu("__restrict__", Keyword::RestrictGnu),
    kw_gnu("__signed__", Keyword::SignedGnu),
    kw_gnu("__thread", Keyword::Thread),
    kw_gnu("__volatile__", Keyword::VolatileGnu),
    kw_new("alignas", Keyword::Alignas),
    kw_new("alignof", Keyword::Alignof),
    kw_gnu("asm", Keyword::Asm),
    pp_gnu("assert", PpKeyword::Assert),
    kw("auto", Keyword::Auto, LangStandard::C89),
    kw("bool", Keyword::Bool, LangStandard::C23),
    kw("break", Keyword::Break, LangStandard::C89),
    kw("case", Keyword::Case, LangStandard::C89),
    kw("char", Keyword::Char, LangStandard::C89),
    kw("const", Keyword::Const, LangStandard::C89),
    kw("continue", Keyword::Continue, LangStandard::C89),
    kw("default", Keyword::Default, LangStandard::C89),
    pp("define", PpKeyword::Define, LangStandard::C89),
    pp("defined", PpKeyword::Defined, LangStandard::C89),
    kw("do", Keyword::Do, LangStandard::C89),
    kw("double", Keyword::Double, LangStandard::C89),
    pp("elif", PpKeyword::Elif, LangStandard::C89),
    pp("elifdef", PpKeyword::Elifdef, LangStandard::C23),
    pp("elifndef", PpKeyword::Elifndef, LangStandard::C23),
    pp("else", PpKeyword::Else, LangStandard::C89),
    kw("else", Keyword::Else, LangStandard::C89),
    pp("embed", PpKeyword::Embed, LangStandard::C23),
    pp("endif", PpKeyword::Endif, LangStandard::C89),
    kw("enum", Keyword::Enum, LangStandard::C89),
    pp("error", PpKeyword::Error, LangStandard::C89),
    kw("extern", Keyword::Extern, LangStandard::C89),
    kw("false", Keyword::False, LangStandard::C23),
    kw("float", Keyword::Float, LangStandard::C89),
    kw("for", Keyword::For, LangStandard::C89),
    kw("goto", Keyword::Goto, LangStandard::C89),
    pp_gnu("ident", PpKeyword::Ident),
    pp("if", PpKeyword::If, LangStandard::C89),
    kw("if", Keyword::If, LangStandard::C89),
    pp("ifdef", PpKeyword::Ifdef, LangStandard::C89),
    pp("ifndef", PpKeyword::Ifndef, LangStandard::C89),
    pp_gnu("import", PpKeyword::Import),
    pp("include", PpKeyword::Include, LangStandard::C89),
    pp_gnu("include_next", PpKeyword::IncludeNext),
    kw("inline", Keyword::Inline, LangStandard::C99),
    kw("int", Keyword::Int, LangStandard::C89),
    pp("line", PpKeyword::Line, LangStandard::C89),
    kw("long", Keyword::Long, LangStandard::C89),
    pp("pragma", PpKeyword::Pragma, LangStandard::C89),
    kw_c23("register", Keyword::Register, LangStandard::C89, C23Status::Deprecated),
    kw("restrict", Keyword::Restrict, LangStandard::C99),
    kw("return", Keyword::Return, LangStandard::C89),
    pp_gnu("sccs", PpKeyword::Sccs),
    kw("short", Keyword::Short, LangStandard::C89),
    kw("signed", Keyword::Signed, LangStandard::C89),
    kw("sizeof", Keyword::Sizeof, LangStandard::C89),
    kw("static", Keyword::Static, LangStandard::C89),
    kw_new("static_assert", Keyword::StaticAssert),
    kw("struct", Keyword::Struct, LangStandard::C89),
    kw("switch", Keyword::Switch, LangStandard::C89),
    kw_new("thread_local", Keyword::ThreadLocal),
    kw("true", Keyword::True, LangStandard::C23),
    kw("typedef", Keyword::Typedef, LangStandard::C89),
    kw_gnu("typeof", Keyword::Typeof),
    pp_gnu("unassert", PpKeyword::Unassert),
    pp("undef", PpKeyword::Undef, LangStandard::C89),
    kw("union", Keyword::Union, LangStandard::C89),
    kw("unsigned", Keyword::Unsigned, LangStandard::C89),
    kw("void", Keyword::Void, LangStandard::C89),
    kw("volatile", Keyword::Volatile, LangStandard::C89),
    pp("warning", PpKeyword::Warning, LangStandard::C23),
    kw("while", Keyword::While, LangStandard::C89),
];

/// Finds the best entry for `spelling` in the given context.
///
/// When a spelling has entries for both contexts, the one matching
/// `in_directive` wins. When only a wrong-context entry exists, it is still
/// returned; [`classify`] decides whether that degrades to an identifier.
pub(super) fn lookup(spelling: &str, in_directive: bool) -> Option<&'static KwEntry> {
    let probe = TABLE
        .binary_search_by(|entry| entry.spelling.cmp(spelling))
        .ok()?;

    let mut first = probe;
    while first > 0 && TABLE[first - 1].spelling == spelling {
        first -= 1;
    }
    let mut last = probe;
    while last + 1 < TABLE.len() && TABLE[last + 1].spelling == spelling {
        last += 1;
    }

    TABLE[first..=last]
        .iter()
        .find(|entry| entry.is_preprocessor() == in_directive)
        .or(Some(&TABLE[first]))
}

/// Classifies a spelling, or `None` when it lexes as a plain identifier.
///
/// A preprocessor-only spelling outside a directive is an ordinary
/// identifier (`defined` in regular code, for example).
pub(super) fn classify(spelling: &str, in_directive: bool) -> Option<&'static KwEntry> {
    let entry = lookup(spelling, in_directive)?;
    if entry.is_preprocessor() && !in_directive {
        return None;
    }
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_by_spelling() {
        for pair in TABLE.windows(2) {
            assert!(
                pair[0].spelling <= pair[1].spelling,
                "table out of order: {} before {}",
                pair[0].spelling,
                pair[1].spelling
            );
        }
    }

    #[test]
    fn classify_prefers_context() {
        let in_dir = classify("if", true).expect("entry");
        assert_eq!(in_dir.kind, KwKind::Pp(PpKeyword::If));
        let in_code = classify("if", false).expect("entry");
        assert_eq!(in_code.kind, KwKind::Keyword(Keyword::If));

        let else_dir = classify("else", true).expect("entry");
        assert_eq!(else_dir.kind, KwKind::Pp(PpKeyword::Else));
        let else_code = classify("else", false).expect("entry");
        assert_eq!(else_code.kind, KwKind::Keyword(Keyword::Else));
    }

    #[test]
    fn pp_only_spellings_degrade_outside_directives() {
        assert!(classify("defined", false).is_none());
        assert!(classify("include", false).is_none());
        let entry = classify("defined", true).expect("entry");
        assert_eq!(entry.kind, KwKind::Pp(PpKeyword::Defined));
    }

    #[test]
    fn keyword_only_spellings_survive_in_directives() {
        // `int` has no directive entry; inside a directive the keyword entry
        // is still preferred over demotion.
        let entry = lookup("int", true).expect("entry");
        assert_eq!(entry.kind, KwKind::Keyword(Keyword::Int));
    }

    #[test]
    fn unknown_spellings_are_identifiers() {
        assert!(classify("banana", false).is_none());
        assert!(classify("banana", true).is_none());
    }

    #[test]
    fn policy_flags_carry_through() {
        let reg = classify("register", false).expect("entry");
        assert_eq!(reg.c23, C23Status::Deprecated);
        let imag = classify("_Imaginary", false).expect("entry");
        assert_eq!(imag.c23, C23Status::Removed);
        let old = classify("_Alignas", false).expect("entry");
        assert_eq!(old.spelling_form, SpellingForm::OldForm);
        assert_eq!(old.min_std, LangStandard::C11);
        let new = classify("alignas", false).expect("entry");
        assert_eq!(new.spelling_form, SpellingForm::NewForm);
        assert_eq!(new.min_std, LangStandard::C23);
        let tnext = classify("include_next", true).expect("entry");
        assert!(tnext.gnu_only);
    }
}
