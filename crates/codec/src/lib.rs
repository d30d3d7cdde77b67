//! subbpe-codec - Subword segmentation and reassembly
//!
//! This crate applies a learned BPE rule table to text and reverses the
//! result, integrating the segmenter, the reassembler, glossaries and
//! rule table persistence behind a single `Codec` API.
//!
//! # Features
//!
//! - Segmentation by replaying merge rules in rank order
//! - Lossless reassembly from `@@` continuation markers
//! - Regex glossaries for strings that must never be split
//! - Merges-file and JSON bundle persistence
//! - LRU segment cache and parallel batch encoding
//!
//! # Example
//!
//! ```rust
//! use subbpe_codec::Codec;
//! use subbpe_training::{MergeLearner, WordCounts};
//!
//! let corpus = WordCounts::from_counts([("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)]);
//! let (codec, _) = Codec::builder().train(&corpus, &MergeLearner::with_merges(2))?;
//!
//! let encoded = codec.encode_line("newest lowest");
//! assert_eq!(encoded, "n@@ e@@ w@@ est l@@ o@@ w@@ est");
//! assert_eq!(codec.decode_line(&encoded).text(), "newest lowest");
//! # Ok::<(), subbpe_codec::BpeError>(())
//! ```

pub use subbpe_core::{BaseUnit, BpeError, BpeModel, Result};

/// Default continuation marker.
pub const DEFAULT_SEPARATOR: &str = "@@";

// Codec API
pub mod codec;
pub use codec::{Codec, CodecBuilder, CodecConfig};

pub mod segmenter;
pub use segmenter::{render_pieces, Segmenter};

pub mod reassembler;
pub use reassembler::{DecodeAnomaly, Decoded, Reassembler};

// IO/Serialization
pub mod io;
pub use io::{CodecLoader, CodecSaver, ModelFormat};

// Pre-segmentation
pub mod pre_tokenizer;
pub use pre_tokenizer::{Glossary, Span};

// Utilities
pub mod utils;
pub use utils::{CacheStats, SegmentCache};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
