//! Merge rule management for BPE.
//!
//! Merge rules are kept in learning order (the index is the rank) with a
//! hash index from symbol-ID pair to `(rank, merged_id)` for O(1) lookup.

use super::symbol::SymbolId;
use crate::error::{BpeError, Result};
use ahash::AHashMap;

/// A pair of adjacent symbol IDs.
pub type Pair = (SymbolId, SymbolId);

/// Merge rule index: pair -> (rank, merged_id).
///
/// The rank indicates the priority of this merge rule (lower rank = higher priority).
pub type MergeMap = AHashMap<Pair, (u32, SymbolId)>;

/// One learned merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRule {
    /// The adjacent symbols being merged
    pub pair: Pair,
    /// The symbol produced by the merge
    pub merged: SymbolId,
}

/// Ordered collection of BPE merge rules with efficient lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeRules {
    rules: Vec<MergeRule>,
    index: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            index: MergeMap::with_capacity(capacity),
        }
    }

    /// Append a merge rule at the next rank.
    ///
    /// Returns the assigned rank. A pair can only be ranked once.
    pub fn push(&mut self, pair: Pair, merged: SymbolId) -> Result<u32> {
        if self.index.contains_key(&pair) {
            return Err(BpeError::DuplicateRule(format!("({}, {})", pair.0, pair.1)));
        }
        let rank = u32::try_from(self.rules.len()).map_err(|_| BpeError::VocabularyOverflow {
            max: u32::MAX as usize,
        })?;

        self.rules.push(MergeRule { pair, merged });
        self.index.insert(pair, (rank, merged));
        Ok(rank)
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, merged_id)) if this pair should be merged,
    /// None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, SymbolId)> {
        self.index.get(&pair).copied()
    }

    /// The rule learned at `rank`.
    #[inline]
    pub fn rule(&self, rank: u32) -> Option<&MergeRule> {
        self.rules.get(rank as usize)
    }

    /// Rules in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeRule> + '_ {
        self.rules.iter()
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Replace every occurrence of `pair` in `word` with `merged`.
///
/// Occurrences are claimed left to right, so in `a a a` merging `(a, a)`
/// yields `aa a`. Returns the number of merges performed.
pub fn merge_pair(word: &mut Vec<SymbolId>, pair: Pair, merged: SymbolId) -> usize {
    if word.len() < 2 {
        return 0;
    }

    let mut merges = 0;
    let mut out = Vec::with_capacity(word.len());
    let mut i = 0;

    while i < word.len() {
        if i + 1 < word.len() && word[i] == pair.0 && word[i + 1] == pair.1 {
            out.push(merged);
            merges += 1;
            i += 2;
        } else {
            out.push(word[i]);
            i += 1;
        }
    }

    if merges > 0 {
        *word = out;
    }
    merges
}
