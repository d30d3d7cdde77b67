//! Base units a word is split into before any merge is applied.
//!
//! Two granularities are supported:
//! - Character: one Unicode scalar value per base symbol
//! - Grapheme: one extended grapheme cluster per base symbol
//!
//! The learner and the segmenter must agree on the unit, so the choice is
//! recorded alongside persisted models.

pub mod char_level;

pub use char_level::{char_spans, grapheme_spans};

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Granularity of base symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseUnit {
    /// Unicode scalar values
    #[default]
    Char,
    /// Extended grapheme clusters
    Grapheme,
}

impl BaseUnit {
    /// Byte ranges of the base units of `word`, in order.
    pub fn spans(self, word: &str) -> Vec<Range<usize>> {
        match self {
            BaseUnit::Char => char_spans(word),
            BaseUnit::Grapheme => grapheme_spans(word),
        }
    }

    /// Number of base units in `text`.
    pub fn count(self, text: &str) -> usize {
        match self {
            BaseUnit::Char => text.chars().count(),
            BaseUnit::Grapheme => {
                use unicode_segmentation::UnicodeSegmentation;
                text.graphemes(true).count()
            }
        }
    }
}

impl std::fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseUnit::Char => f.write_str("char"),
            BaseUnit::Grapheme => f.write_str("grapheme"),
        }
    }
}

impl std::str::FromStr for BaseUnit {
    type Err = crate::BpeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "char" => Ok(BaseUnit::Char),
            "grapheme" => Ok(BaseUnit::Grapheme),
            other => Err(crate::BpeError::InvalidConfig(format!(
                "Unknown base unit '{}' (expected 'char' or 'grapheme')",
                other
            ))),
        }
    }
}
