//! Training infrastructure for BPE merge rules.
//!
//! This module provides the corpus word counts, the pair counter and the
//! merge learner built on them.

pub mod config;
pub mod corpus;
pub mod counter;
pub mod learner;

pub use config::{LearnerConfig, LearnerConfigBuilder};
pub use corpus::WordCounts;
pub use counter::PairCounter;
pub use learner::{LearnOutcome, MergeLearner, StopReason};
