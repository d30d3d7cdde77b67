//! Priority queue for BPE merge candidates.
//!
//! The queue uses lazy deletion: every count change pushes a fresh entry and
//! entries whose count no longer matches the tracked count are skipped on
//! pop. Among equal counts the pair with the lexicographically smallest
//! rendered text wins, which makes selection independent of hash order.

use super::merges::Pair;
use ahash::AHashMap;
use compact_str::CompactString;
use dary_heap::OctonaryHeap;
use std::cmp::Ordering;

/// Rendered text of a pair's left and right symbols, used for tie-breaking.
pub type PairKey = (CompactString, CompactString);

/// A merge candidate during BPE training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The pair of symbol IDs to merge
    pub pair: Pair,
    /// The weighted frequency of this pair
    pub count: u64,
    /// Rendered pair text
    pub key: PairKey,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pair: Pair, count: u64, key: PairKey) -> Self {
        Self { pair, count, key }
    }
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher count first, then smaller rendered text first
        self.count
            .cmp(&other.count)
            .then_with(|| other.key.cmp(&self.key))
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for BPE merge operations.
///
/// Uses an 8-ary heap for better cache locality than a binary heap.
pub struct PairPriorityQueue {
    /// The heap storing merge candidates
    heap: OctonaryHeap<MergeCandidate>,
    /// Track current counts to detect stale entries
    current_counts: AHashMap<Pair, u64>,
}

impl PairPriorityQueue {
    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            current_counts: AHashMap::with_capacity(capacity),
        }
    }

    /// Create a new empty priority queue.
    pub fn new() -> Self {
        Self {
            heap: OctonaryHeap::new(),
            current_counts: AHashMap::new(),
        }
    }

    /// Push a candidate, superseding any earlier entry for the same pair.
    ///
    /// A zero count removes the pair from the queue.
    pub fn push(&mut self, candidate: MergeCandidate) {
        if candidate.count == 0 {
            self.current_counts.remove(&candidate.pair);
            return;
        }
        self.current_counts.insert(candidate.pair, candidate.count);
        self.heap.push(candidate);
    }

    /// Pop the highest priority merge candidate.
    ///
    /// Returns None if the queue is empty or only contains stale entries.
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        while let Some(candidate) = self.heap.pop() {
            if self.current_counts.get(&candidate.pair) == Some(&candidate.count) {
                self.current_counts.remove(&candidate.pair);
                return Some(candidate);
            }
        }
        None
    }

    /// Drop a pair without popping it.
    pub fn remove(&mut self, pair: Pair) {
        self.current_counts.remove(&pair);
    }

    /// Get the number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check whether any live entry remains.
    pub fn is_empty(&self) -> bool {
        self.current_counts.is_empty()
    }
}

impl Default for PairPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
