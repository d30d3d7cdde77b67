//! Format definitions for rule table serialization.

use crate::codec::CodecConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version written into JSON bundles.
pub const FORMAT_VERSION: &str = "1.0";

/// Prefix of the optional header line of a merges file.
pub const VERSION_HEADER: &str = "#version";

/// On-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Plain text, one `left right` pair per line in rank order
    MergesText,
    /// JSON bundle (`codec.json`)
    Bundle,
}

impl ModelFormat {
    /// Guess the format from a file extension; `.json` is a bundle.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ModelFormat::Bundle,
            _ => ModelFormat::MergesText,
        }
    }
}

/// Complete codec serialization format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedCodec {
    /// Format version
    pub version: String,
    /// Codec configuration, including the base unit
    pub config: CodecConfig,
    /// Rendered merge pairs in rank order
    pub merges: Vec<(String, String)>,
}

impl SerializedCodec {
    /// Whether this build can read the bundle.
    pub fn is_supported(&self) -> bool {
        let major = |v: &str| v.split('.').next().map(str::to_owned);
        major(&self.version) == major(FORMAT_VERSION)
    }
}
