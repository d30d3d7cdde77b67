//! Symbols: the units merge rules operate on.
//!
//! A symbol is identified by its text together with a word-final flag, so
//! `t` at the end of a word and `t` inside a word are distinct symbols. In
//! rendered form (merge files, tie-breaking) a word-final symbol carries the
//! [`END_OF_WORD`] suffix.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix marking a word-final symbol in rendered form.
pub const END_OF_WORD: &str = "</w>";

/// Interned symbol identifier.
pub type SymbolId = u32;

/// An immutable string unit, either a base unit or a merged compound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    text: CompactString,
    is_final: bool,
}

impl Symbol {
    /// Create a symbol.
    pub fn new(text: impl Into<CompactString>, is_final: bool) -> Self {
        Self {
            text: text.into(),
            is_final,
        }
    }

    /// Create a word-internal symbol.
    pub fn internal(text: impl Into<CompactString>) -> Self {
        Self::new(text, false)
    }

    /// Create a word-final symbol.
    pub fn word_final(text: impl Into<CompactString>) -> Self {
        Self::new(text, true)
    }

    /// The symbol's text, without any end-of-word suffix.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the symbol ends a word.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// The symbol produced by merging `self` with `right`.
    ///
    /// The merged symbol inherits the word-final flag of its right member.
    pub fn concat(&self, right: &Symbol) -> Symbol {
        let mut text = CompactString::with_capacity(self.text.len() + right.text.len());
        text.push_str(&self.text);
        text.push_str(&right.text);
        Symbol::new(text, right.is_final)
    }

    /// Rendered form: the text, plus [`END_OF_WORD`] when word-final.
    pub fn render(&self) -> CompactString {
        if self.is_final {
            let mut out = CompactString::with_capacity(self.text.len() + END_OF_WORD.len());
            out.push_str(&self.text);
            out.push_str(END_OF_WORD);
            out
        } else {
            self.text.clone()
        }
    }

    /// Parse a rendered symbol.
    ///
    /// Returns `None` for an empty symbol or a bare end-of-word suffix.
    pub fn parse_rendered(rendered: &str) -> Option<Symbol> {
        let (text, is_final) = match rendered.strip_suffix(END_OF_WORD) {
            Some(text) => (text, true),
            None => (rendered, false),
        };
        if text.is_empty() {
            return None;
        }
        Some(Symbol::new(text, is_final))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        if self.is_final {
            f.write_str(END_OF_WORD)?;
        }
        Ok(())
    }
}
