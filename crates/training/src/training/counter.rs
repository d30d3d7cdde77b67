//! Pair counting for BPE training.
//!
//! This module holds the per-word symbol sequences of a learning run and
//! counts adjacent pairs, weighted by word frequency. The initial count can
//! run in parallel; updates after each merge are incremental and only touch
//! the words that contain the merged pair.

use ahash::{AHashMap, AHashSet};
use subbpe_core::{
    merge_pair, BaseUnit, BpeError, Pair, Result, Symbol, SymbolId, Vocabulary, END_OF_WORD,
};

use super::corpus::WordCounts;

/// Counter for BPE pair frequencies.
pub struct PairCounter {
    /// Word -> symbol IDs
    words: Vec<Vec<SymbolId>>,
    /// Word -> frequency count
    word_counts: Vec<u64>,
    /// Pair -> indices of words that contained it when last indexed
    index: AHashMap<Pair, AHashSet<usize>>,
}

impl PairCounter {
    /// Create an empty pair counter.
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            word_counts: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Split every corpus word into base symbols, registering them in `vocab`.
    ///
    /// The last symbol of each word is word-final.
    pub fn from_corpus(corpus: &WordCounts, vocab: &mut Vocabulary, unit: BaseUnit) -> Result<Self> {
        let mut counter = Self::new();

        for (word, count) in corpus.sorted() {
            counter.add_word(word, count, vocab, unit)?;
        }

        Ok(counter)
    }

    /// Add a single word occurring `count` times.
    ///
    /// Words containing [`END_OF_WORD`] are rejected: a merged symbol ending
    /// in it would render the same as a word-final symbol.
    pub fn add_word(
        &mut self,
        word: &str,
        count: u64,
        vocab: &mut Vocabulary,
        unit: BaseUnit,
    ) -> Result<()> {
        if word.contains(END_OF_WORD) {
            return Err(BpeError::ReservedSuffix(word.to_string()));
        }
        let spans = unit.spans(word);
        if spans.is_empty() || count == 0 {
            return Ok(());
        }

        let last = spans.len() - 1;
        let ids = spans
            .into_iter()
            .enumerate()
            .map(|(i, span)| vocab.add_base(Symbol::new(&word[span], i == last)))
            .collect::<Result<Vec<_>>>()?;

        let word_idx = self.words.len();
        for window in ids.windows(2) {
            self.index
                .entry((window[0], window[1]))
                .or_default()
                .insert(word_idx);
        }
        self.words.push(ids);
        self.word_counts.push(count);

        Ok(())
    }

    /// Count all pairs in parallel.
    ///
    /// This returns a map of pair -> frequency count across all words.
    /// Counts saturate at `u64::MAX`.
    pub fn count_pairs_parallel(&self) -> AHashMap<Pair, u64> {
        use rayon::prelude::*;

        self.words
            .par_iter()
            .zip(self.word_counts.par_iter())
            .fold(AHashMap::new, |mut acc: AHashMap<Pair, u64>, (word, &count)| {
                for window in word.windows(2) {
                    add_count(&mut acc, (window[0], window[1]), count);
                }
                acc
            })
            .reduce(AHashMap::new, |mut acc, pair_counts| {
                for (pair, count) in pair_counts {
                    add_count(&mut acc, pair, count);
                }
                acc
            })
    }

    /// Count all pairs sequentially.
    pub fn count_pairs_sequential(&self) -> AHashMap<Pair, u64> {
        let mut pair_counts: AHashMap<Pair, u64> = AHashMap::new();

        for (word, &count) in self.words.iter().zip(self.word_counts.iter()) {
            for window in word.windows(2) {
                add_count(&mut pair_counts, (window[0], window[1]), count);
            }
        }

        pair_counts
    }

    /// Merge a pair in every word containing it.
    ///
    /// Returns the weighted change of every pair count affected, including
    /// the merged pair itself (which drops to zero).
    pub fn merge_pair_in_words(&mut self, pair: Pair, merged: SymbolId) -> AHashMap<Pair, i128> {
        let mut deltas: AHashMap<Pair, i128> = AHashMap::new();

        let mut candidates: Vec<usize> = match self.index.remove(&pair) {
            Some(words) => words.into_iter().collect(),
            None => return deltas,
        };
        candidates.sort_unstable();

        for word_idx in candidates {
            let word = &mut self.words[word_idx];
            let weight = i128::from(self.word_counts[word_idx]);

            let before: Vec<Pair> = word.windows(2).map(|w| (w[0], w[1])).collect();
            if merge_pair(word, pair, merged) == 0 {
                // Stale index entry
                continue;
            }

            for old in before {
                *deltas.entry(old).or_insert(0) -= weight;
            }
            for window in word.windows(2) {
                let new = (window[0], window[1]);
                *deltas.entry(new).or_insert(0) += weight;
                self.index.entry(new).or_default().insert(word_idx);
            }
        }

        deltas.retain(|_, delta| *delta != 0);
        deltas
    }

    /// Get the number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the total count of all word occurrences.
    pub fn total_word_occurrences(&self) -> u64 {
        self.word_counts
            .iter()
            .fold(0u64, |total, &count| total.saturating_add(count))
    }

    /// Get a reference to the words.
    pub fn words(&self) -> &[Vec<SymbolId>] {
        &self.words
    }

    /// Get a reference to the word counts.
    pub fn word_counts(&self) -> &[u64] {
        &self.word_counts
    }
}

fn add_count(counts: &mut AHashMap<Pair, u64>, pair: Pair, count: u64) {
    let slot = counts.entry(pair).or_insert(0);
    *slot = slot.saturating_add(count);
}

impl Default for PairCounter {
    fn default() -> Self {
        Self::new()
    }
}
