//! Vocabulary storage and lookup.
//!
//! The vocabulary interns every symbol ever produced (base units plus merged
//! compounds) to a dense `u32` id, and remembers the rank of the merge rule
//! that created each compound. Merge rules and the segmenter refer to
//! symbols by id only, so rank lookups never compare strings.

use super::symbol::{Symbol, SymbolId};
use crate::error::{BpeError, Result};
use ahash::AHashMap;
use compact_str::CompactString;

/// Forward mapping: symbol -> ID
pub type SymbolIds = AHashMap<Symbol, SymbolId>;

#[derive(Debug, Clone)]
struct VocabEntry {
    symbol: Symbol,
    /// Rank of the creating merge rule; `None` for base units
    rank: Option<u32>,
}

/// Interning table for symbols, with the rank each one was created at.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: SymbolIds,
    entries: Vec<VocabEntry>,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new vocabulary with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SymbolIds::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Add a base symbol.
    ///
    /// Returns the existing ID if the symbol is already present.
    pub fn add_base(&mut self, symbol: Symbol) -> Result<SymbolId> {
        self.insert(symbol, None)
    }

    /// Add a symbol created by the merge rule of the given rank.
    ///
    /// A symbol that already exists keeps its ID and its original rank.
    pub fn add_merged(&mut self, symbol: Symbol, rank: u32) -> Result<SymbolId> {
        self.insert(symbol, Some(rank))
    }

    fn insert(&mut self, symbol: Symbol, rank: Option<u32>) -> Result<SymbolId> {
        if let Some(&id) = self.ids.get(&symbol) {
            return Ok(id);
        }

        let id = SymbolId::try_from(self.entries.len()).map_err(|_| {
            BpeError::VocabularyOverflow {
                max: SymbolId::MAX as usize,
            }
        })?;
        self.ids.insert(symbol.clone(), id);
        self.entries.push(VocabEntry { symbol, rank });

        Ok(id)
    }

    /// Get the ID of a symbol.
    #[inline]
    pub fn get_id(&self, symbol: &Symbol) -> Option<SymbolId> {
        self.ids.get(symbol).copied()
    }

    /// Get the ID of the symbol with the given text and word-final flag.
    #[inline]
    pub fn lookup(&self, text: &str, is_final: bool) -> Option<SymbolId> {
        self.get_id(&Symbol::new(text, is_final))
    }

    /// Get the symbol for an ID.
    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.entries.get(id as usize).map(|e| &e.symbol)
    }

    /// Rank of the merge rule that created a symbol.
    ///
    /// `None` for base units and unknown IDs.
    #[inline]
    pub fn rank(&self, id: SymbolId) -> Option<u32> {
        self.entries.get(id as usize).and_then(|e| e.rank)
    }

    /// Whether an ID names a base unit.
    pub fn is_base(&self, id: SymbolId) -> bool {
        self.entries
            .get(id as usize)
            .map_or(false, |e| e.rank.is_none())
    }

    /// Rendered form of a symbol, see [`Symbol::render`].
    pub fn render(&self, id: SymbolId) -> Option<CompactString> {
        self.symbol(id).map(Symbol::render)
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(id, symbol, rank)` in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol, Option<u32>)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, e)| (id as SymbolId, &e.symbol, e.rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_base() {
        let mut vocab = Vocabulary::new();
        let a = vocab.add_base(Symbol::internal("a")).unwrap();
        let b = vocab.add_base(Symbol::word_final("b")).unwrap();

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(vocab.lookup("a", false), Some(0));
        assert_eq!(vocab.lookup("b", true), Some(1));
        assert_eq!(vocab.lookup("b", false), None);
        assert_eq!(vocab.symbol(1), Some(&Symbol::word_final("b")));
        assert!(vocab.is_base(a));
        assert_eq!(vocab.rank(a), None);
    }

    #[test]
    fn test_add_duplicate_symbol() {
        let mut vocab = Vocabulary::new();
        let id1 = vocab.add_base(Symbol::internal("a")).unwrap();
        let id2 = vocab.add_base(Symbol::internal("a")).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_merged_keeps_first_rank() {
        let mut vocab = Vocabulary::new();
        let id = vocab.add_merged(Symbol::word_final("est"), 3).unwrap();
        let again = vocab.add_merged(Symbol::word_final("est"), 7).unwrap();

        assert_eq!(id, again);
        assert_eq!(vocab.rank(id), Some(3));
        assert!(!vocab.is_base(id));
        assert_eq!(vocab.render(id).as_deref(), Some("est</w>"));
    }

    #[test]
    fn test_iter_reports_ranks() {
        let mut vocab = Vocabulary::new();
        vocab.add_base(Symbol::internal("a")).unwrap();
        vocab.add_base(Symbol::word_final("b")).unwrap();
        vocab.add_merged(Symbol::word_final("ab"), 0).unwrap();

        assert_eq!(vocab.len(), 3);
        let ranks: Vec<_> = vocab.iter().map(|(_, _, rank)| rank).collect();
        assert_eq!(ranks, vec![None, None, Some(0)]);
    }
}
