//! subbpe-training - Merge-rule learning for subword BPE
//!
//! This crate learns ranked merge rules from a corpus of word counts.
//!
//! # Features
//!
//! - Frequency-weighted pair counting with a parallel initial pass
//! - Incremental count updates touching only the words a merge changes
//! - Deterministic tie-breaking on rendered pair text
//! - Early termination reported as an outcome, not an error
//!
//! # Example
//!
//! ```rust
//! use subbpe_training::{MergeLearner, WordCounts};
//!
//! let corpus = WordCounts::from_counts([("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)]);
//! let outcome = MergeLearner::with_merges(2).learn(&corpus)?;
//!
//! let rules: Vec<_> = outcome.model.rendered_rules().collect();
//! assert_eq!(rules[0], ("e".into(), "s".into()));
//! # Ok::<(), subbpe_training::BpeError>(())
//! ```

pub use subbpe_core::{BpeError, Result};

pub mod training;
pub use training::{
    LearnOutcome, LearnerConfig, LearnerConfigBuilder, MergeLearner, PairCounter, StopReason,
    WordCounts,
};
