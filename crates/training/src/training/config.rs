//! Learner configuration.

use subbpe_core::{BaseUnit, BpeError, Result};

/// Configuration for merge learning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerConfig {
    /// Number of merge operations to learn
    pub num_merges: usize,
    /// Stop once the best pair occurs fewer times than this
    pub min_frequency: u64,
    /// Count initial pairs in parallel
    pub parallel: bool,
    /// Granularity of base symbols
    pub base_unit: BaseUnit,
    /// Log every merge at info level instead of debug
    pub show_progress: bool,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            num_merges: 10_000,
            min_frequency: 1,
            parallel: true,
            base_unit: BaseUnit::Char,
            show_progress: false,
        }
    }
}

impl LearnerConfig {
    /// Create a builder starting from the defaults.
    pub fn builder() -> LearnerConfigBuilder {
        LearnerConfigBuilder::new()
    }

    /// Check the configuration for values the learner cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.min_frequency == 0 {
            return Err(BpeError::InvalidConfig(
                "min_frequency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`LearnerConfig`].
#[derive(Debug, Clone, Default)]
pub struct LearnerConfigBuilder {
    config: LearnerConfig,
}

impl LearnerConfigBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of merges to learn.
    pub fn num_merges(mut self, num_merges: usize) -> Self {
        self.config.num_merges = num_merges;
        self
    }

    /// Set the minimum pair frequency.
    pub fn min_frequency(mut self, freq: u64) -> Self {
        self.config.min_frequency = freq;
        self
    }

    /// Enable or disable the parallel initial count.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the base unit.
    pub fn base_unit(mut self, unit: BaseUnit) -> Self {
        self.config.base_unit = unit;
        self
    }

    /// Log each merge at info level.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<LearnerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
