//! subbpe-core - Core data structures for subword BPE codecs
//!
//! This crate provides the symbol, vocabulary and merge-rule types that the
//! learner produces and the segmenter and reassembler replay.
//!
//! # Features
//!
//! - Interned symbols tagged word-final or word-internal
//! - Ranked merge rules with O(1) lookup by symbol-ID pair
//! - Deterministic lazy-deletion priority queue for merge selection
//! - Character or grapheme base units
//!
//! # Example
//!
//! ```rust
//! use subbpe_core::{BaseUnit, BpeModel, Symbol};
//!
//! let mut model = BpeModel::new(BaseUnit::Char);
//! let e = model.vocab_mut().add_base(Symbol::internal("e"))?;
//! let s = model.vocab_mut().add_base(Symbol::internal("s"))?;
//! let (rank, merged) = model.add_rule((e, s))?;
//!
//! assert_eq!(rank, 0);
//! assert_eq!(model.vocab().symbol(merged).map(|s| s.text()), Some("es"));
//! # Ok::<(), subbpe_core::BpeError>(())
//! ```

pub mod error;
pub use error::{BpeError, Result};

pub mod core;
pub use self::core::{
    merge_pair, BpeModel, MergeCandidate, MergeMap, MergeRule, MergeRules, Pair, PairKey,
    PairPriorityQueue, Symbol, SymbolId, Vocabulary, END_OF_WORD,
};

pub mod encoding;
pub use encoding::BaseUnit;
