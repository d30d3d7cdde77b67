//! Main codec implementation.
//!
//! This module provides the high-level `Codec` struct that ties a learned
//! rule table to a continuation marker and optional glossaries, and
//! exposes word, line and batch encoding plus the matching decoder.

use crate::io::{CodecLoader, CodecSaver, ModelFormat};
use crate::pre_tokenizer::Glossary;
use crate::reassembler::{Decoded, Reassembler};
use crate::segmenter::{render_pieces, Segmenter};
use crate::utils::SegmentCache;
use crate::DEFAULT_SEPARATOR;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use subbpe_core::{BaseUnit, BpeError, BpeModel, Result};
use subbpe_training::{LearnOutcome, MergeLearner, WordCounts};

/// Configuration for building a codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Continuation marker appended to every non-final piece
    pub separator: String,
    /// Base unit used when reading a plain merges file
    pub base_unit: BaseUnit,
    /// Regex patterns protected from segmentation
    pub glossaries: Vec<String>,
    /// Capacity of the per-caller segment cache
    pub cache_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            base_unit: BaseUnit::Char,
            glossaries: Vec::new(),
            cache_capacity: 10_000,
        }
    }
}

impl CodecConfig {
    /// Check the configuration for values the codec cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(BpeError::InvalidConfig(
                "separator must not be empty".to_string(),
            ));
        }
        if self.separator.chars().any(char::is_whitespace) {
            return Err(BpeError::InvalidConfig(format!(
                "separator '{}' must not contain whitespace",
                self.separator
            )));
        }
        Ok(())
    }
}

/// Builder for creating a codec.
#[derive(Debug, Clone, Default)]
pub struct CodecBuilder {
    config: CodecConfig,
}

impl CodecBuilder {
    /// Create a new codec builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the continuation marker.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// Set the base unit used when loading plain merges files.
    pub fn base_unit(mut self, unit: BaseUnit) -> Self {
        self.config.base_unit = unit;
        self
    }

    /// Add one glossary pattern.
    pub fn glossary(mut self, pattern: impl Into<String>) -> Self {
        self.config.glossaries.push(pattern.into());
        self
    }

    /// Add several glossary patterns.
    pub fn glossaries<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .glossaries
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Set the segment cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Build a codec around a learned model.
    pub fn build(self, model: BpeModel) -> Result<Codec> {
        Codec::with_config(model, self.config)
    }

    /// Learn a model from `corpus` and build a codec around it.
    pub fn train(
        self,
        corpus: &WordCounts,
        learner: &MergeLearner,
    ) -> Result<(Codec, LearnOutcome)> {
        let outcome = learner.learn(corpus)?;
        let codec = Codec::with_config(outcome.model.clone(), self.config)?;
        Ok((codec, outcome))
    }

    /// Load a merges file or JSON bundle, chosen by extension.
    ///
    /// A bundle carries its own configuration, which replaces the
    /// builder's except for explicitly added glossaries.
    pub fn load(self, path: &Path) -> Result<Codec> {
        match ModelFormat::from_path(path) {
            ModelFormat::MergesText => {
                let model = CodecLoader::load_merges(path, self.config.base_unit)?;
                Codec::with_config(model, self.config)
            }
            ModelFormat::Bundle => {
                let (model, mut config) = CodecLoader::load_bundle(path)?;
                config.glossaries.extend(self.config.glossaries);
                Codec::with_config(model, config)
            }
        }
    }
}

/// Subword codec.
///
/// Cheap to clone and safe to share between threads; the rule table is
/// immutable once built.
#[derive(Debug, Clone)]
pub struct Codec {
    segmenter: Segmenter,
    reassembler: Reassembler,
    glossary: Glossary,
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the default configuration.
    pub fn new(model: BpeModel) -> Self {
        let config = CodecConfig {
            base_unit: model.base_unit(),
            ..Default::default()
        };

        Self {
            segmenter: Segmenter::new(Arc::new(model)),
            reassembler: Reassembler::new(&config.separator),
            glossary: Glossary::default(),
            config,
        }
    }

    /// Create a codec builder.
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    fn with_config(model: BpeModel, mut config: CodecConfig) -> Result<Self> {
        config.validate()?;
        config.base_unit = model.base_unit();
        let glossary = Glossary::new(&config.glossaries)?;

        debug!(
            "codec ready: {} rules, separator '{}', {} glossary patterns",
            model.len(),
            config.separator,
            glossary.len()
        );

        Ok(Self {
            segmenter: Segmenter::new(Arc::new(model)),
            reassembler: Reassembler::new(&config.separator),
            glossary,
            config,
        })
    }

    /// Split a word into subword pieces, honouring glossaries.
    pub fn segment_word<'a>(&self, word: &'a str) -> Vec<&'a str> {
        if self.glossary.is_empty() {
            return self.segmenter.segment(word);
        }

        let mut pieces = Vec::new();
        for span in self.glossary.split(word) {
            if span.protected {
                pieces.push(span.text);
            } else {
                pieces.extend(self.segmenter.segment(span.text));
            }
        }
        pieces
    }

    /// Encode a word into rendered subword tokens.
    pub fn encode_word(&self, word: &str) -> Vec<String> {
        render_pieces(&self.segment_word(word), &self.config.separator)
    }

    /// Encode every whitespace-delimited word of a line into tokens.
    pub fn encode_tokens(&self, line: &str) -> Vec<String> {
        line.split_whitespace()
            .flat_map(|word| self.encode_word(word))
            .collect()
    }

    /// Encode a line; tokens are joined with single spaces.
    pub fn encode_line(&self, line: &str) -> String {
        self.encode_tokens(line).join(" ")
    }

    /// Like [`Codec::encode_line`], reusing segmentations from `cache`.
    pub fn encode_line_cached(&self, line: &str, cache: &mut SegmentCache) -> String {
        let mut tokens = Vec::new();
        for word in line.split_whitespace() {
            tokens.extend(cache.get_or_insert_with(word, |w| self.encode_word(w)));
        }
        tokens.join(" ")
    }

    /// Encode lines in parallel, preserving their order.
    pub fn encode_lines_parallel<S>(&self, lines: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        lines
            .par_iter()
            .map(|line| self.encode_line(line.as_ref()))
            .collect()
    }

    /// A cache sized from the configuration.
    pub fn new_cache(&self) -> SegmentCache {
        SegmentCache::with_capacity(self.config.cache_capacity)
    }

    /// Rebuild words from tokens.
    pub fn decode_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Decoded {
        self.reassembler.decode_tokens(tokens)
    }

    /// Rebuild words from a line of tokens.
    pub fn decode_line(&self, line: &str) -> Decoded {
        self.reassembler.decode_line(line)
    }

    /// The learned rule table.
    pub fn model(&self) -> &BpeModel {
        self.segmenter.model()
    }

    /// The configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The continuation marker.
    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// Save the rule table as a merges file.
    pub fn save_merges(&self, path: &Path) -> Result<()> {
        CodecSaver::new(self.model()).save_merges(path)
    }

    /// Save the rule table and configuration as a JSON bundle.
    pub fn save_bundle(&self, path: &Path) -> Result<()> {
        CodecSaver::new(self.model()).save_bundle(path, &self.config)
    }

    /// Save in the format implied by the extension of `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        match ModelFormat::from_path(path) {
            ModelFormat::MergesText => self.save_merges(path),
            ModelFormat::Bundle => self.save_bundle(path),
        }
    }

    /// Load a merges file or bundle with the default configuration.
    pub fn load(path: &Path) -> Result<Self> {
        CodecBuilder::new().load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_codec() -> Codec {
        let model =
            BpeModel::from_rendered_pairs(BaseUnit::Char, [(1, "e", "s"), (2, "es", "t</w>")])
                .unwrap();
        Codec::new(model)
    }

    #[test]
    fn test_builder_rejects_bad_separator() {
        let model = BpeModel::new(BaseUnit::Char);
        assert!(matches!(
            Codec::builder().separator("").build(model.clone()),
            Err(BpeError::InvalidConfig(_))
        ));
        assert!(matches!(
            Codec::builder().separator("@ @").build(model),
            Err(BpeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builder_rejects_bad_glossary() {
        let result = Codec::builder()
            .glossary("[unclosed")
            .build(BpeModel::new(BaseUnit::Char));
        assert!(matches!(result, Err(BpeError::Glossary(_))));
    }

    #[test]
    fn test_encode_word() {
        let codec = sample_codec();
        assert_eq!(codec.encode_word("newest"), vec!["n@@", "e@@", "w@@", "est"]);
        assert!(codec.encode_word("").is_empty());
    }

    #[test]
    fn test_encode_line_and_decode() {
        let codec = sample_codec();
        let encoded = codec.encode_line("  the  newest\tlowest ");
        assert_eq!(encoded, "t@@ h@@ e n@@ e@@ w@@ est l@@ o@@ w@@ est");

        let decoded = codec.decode_line(&encoded);
        assert!(decoded.is_clean());
        assert_eq!(decoded.text(), "the newest lowest");
    }

    #[test]
    fn test_custom_separator() {
        let codec = Codec::builder()
            .separator("##")
            .build(sample_codec().model().clone())
            .unwrap();
        assert_eq!(codec.encode_line("nest"), "n## est");
        assert_eq!(codec.decode_line("n## est").text(), "nest");
    }

    #[test]
    fn test_glossary_keeps_matches_whole() {
        let codec = Codec::builder()
            .glossary("[0-9]+")
            .build(sample_codec().model().clone())
            .unwrap();

        assert_eq!(codec.encode_word("2024"), vec!["2024"]);
        assert_eq!(codec.encode_word("v12est"), vec!["v@@", "12@@", "est"]);
        assert_eq!(codec.decode_line("v@@ 12@@ est").text(), "v12est");
    }

    #[test]
    fn test_cached_encoding_matches_uncached() {
        let codec = sample_codec();
        let mut cache = codec.new_cache();
        let line = "newest widest newest";

        assert_eq!(codec.encode_line_cached(line, &mut cache), codec.encode_line(line));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_parallel_batch_preserves_order() {
        let codec = sample_codec();
        let lines = ["newest", "", "low est", "widest"];
        let expected: Vec<String> = lines.iter().map(|l| codec.encode_line(l)).collect();
        assert_eq!(codec.encode_lines_parallel(&lines), expected);
    }

    #[test]
    fn test_train_builds_codec() {
        let corpus =
            WordCounts::from_counts([("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)]);
        let (codec, outcome) = Codec::builder()
            .train(&corpus, &MergeLearner::with_merges(2))
            .unwrap();

        assert_eq!(outcome.model.len(), 2);
        assert_eq!(codec.encode_line("lowest"), "l@@ o@@ w@@ est");
    }
}
