// Copyright 2026 The yecc authors
// SPDX-License-Identifier: Apache-2.0

//! String interning for identifier and spelling storage.
//!
//! The lexer interns every identifier, keyword spelling, header name, and
//! error-reason string it produces. Interning the same byte content twice
//! yields the same [`Symbol`], so downstream passes compare names with an
//! integer compare instead of a byte compare.
//!
//! Storage is append-only: a [`Symbol`] handed out once stays valid for the
//! life of the [`Interner`]. One interner is constructed per compilation and
//! owned by the lexer; nothing here is global or thread-safe.
//!
//! # Examples
//!
//! ```
//! use yecc_core::intern::Interner;
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("main");
//! let b = interner.intern("main");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), "main");
//! ```

use std::collections::HashMap;

use ecow::EcoString;

/// A stable reference to an interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// The index of this symbol in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Deduplicating, append-only string storage.
#[derive(Debug, Default)]
pub struct Interner {
    map: HashMap<EcoString, Symbol>,
    strings: Vec<EcoString>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning the symbol for its content.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.map.get(text) {
            return sym;
        }
        let owned = EcoString::from(text);
        let sym = Symbol(u32::try_from(self.strings.len()).expect("interner overflow"));
        self.strings.push(owned.clone());
        self.map.insert(owned, sym);
        sym
    }

    /// Interns raw bytes, replacing invalid UTF-8 with U+FFFD.
    ///
    /// Header names are accumulated as raw bytes and may not be valid UTF-8;
    /// they are stored lossily so that every spelling resolves to `str`.
    pub fn intern_lossy(&mut self, bytes: &[u8]) -> Symbol {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.intern(text),
            Err(_) => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                self.intern(&text)
            }
        }
    }

    /// Returns the string content for `sym`.
    ///
    /// # Panics
    ///
    /// Panics if `sym` did not come from this interner.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.index()]
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_symbol() {
        let mut i = Interner::new();
        let a = i.intern("alpha");
        let b = i.intern("beta");
        let a2 = i.intern("alpha");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(i.len(), 2);
    }

    #[test]
    fn resolve_round_trips() {
        let mut i = Interner::new();
        let sym = i.intern("wchar_t");
        assert_eq!(i.resolve(sym), "wchar_t");
    }

    #[test]
    fn symbols_stay_valid_as_storage_grows() {
        let mut i = Interner::new();
        let first = i.intern("first");
        for n in 0..1000 {
            i.intern(&format!("filler{n}"));
        }
        assert_eq!(i.resolve(first), "first");
    }

    #[test]
    fn lossy_interning_replaces_bad_bytes() {
        let mut i = Interner::new();
        let sym = i.intern_lossy(b"std\xFFio.h");
        assert_eq!(i.resolve(sym), "std\u{FFFD}io.h");
        let clean = i.intern_lossy(b"stdio.h");
        assert_eq!(i.resolve(clean), "stdio.h");
    }

    #[test]
    fn empty_string_interns() {
        let mut i = Interner::new();
        let e = i.intern("");
        assert_eq!(i.resolve(e), "");
        assert_eq!(e, i.intern(""));
    }
}
