//! Core BPE data structures.
//!
//! This module contains the symbol, vocabulary and merge-rule types shared
//! by the learner and the codec.

pub mod merges;
pub mod model;
pub mod priority;
pub mod symbol;
pub mod vocab;

pub use merges::{merge_pair, MergeMap, MergeRule, MergeRules, Pair};
pub use model::BpeModel;
pub use priority::{MergeCandidate, PairKey, PairPriorityQueue};
pub use symbol::{Symbol, SymbolId, END_OF_WORD};
pub use vocab::Vocabulary;
