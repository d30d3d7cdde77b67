//! Utility modules for the codec.

pub mod cache;

pub use cache::{CacheStats, SegmentCache};
