//! Load functionality for learned rule tables.
//!
//! Loading is all-or-nothing: any malformed line fails the load with the
//! offending line number, and no partial table is ever returned.

use super::format::{SerializedCodec, VERSION_HEADER};
use crate::codec::CodecConfig;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use subbpe_core::{BaseUnit, BpeError, BpeModel, Result};

/// Rule table loader.
pub struct CodecLoader;

impl CodecLoader {
    /// Load a merges file.
    pub fn load_merges(path: &Path, unit: BaseUnit) -> Result<BpeModel> {
        let file = File::open(path).map_err(|e| BpeError::io(path, e))?;
        let model = Self::parse_merges(BufReader::new(file), unit, path)?;

        info!("loaded {} merge rules from {}", model.len(), path.display());
        Ok(model)
    }

    /// Read merge rules from any buffered reader.
    pub fn read_merges<R: BufRead>(reader: R, unit: BaseUnit) -> Result<BpeModel> {
        Self::parse_merges(reader, unit, Path::new("<stream>"))
    }

    fn parse_merges<R: BufRead>(reader: R, unit: BaseUnit, origin: &Path) -> Result<BpeModel> {
        let mut lines = reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| BpeError::io(origin, e))?;

        while lines.last().map_or(false, |l| l.trim().is_empty()) {
            lines.pop();
        }

        let skip = match lines.first() {
            Some(first) if first.starts_with(VERSION_HEADER) => {
                debug!("skipping header '{}'", first);
                1
            }
            _ => 0,
        };

        let mut pairs = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate().skip(skip) {
            let line_no = idx + 1;
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(left), Some(right), None) => pairs.push((line_no, left, right)),
                _ => {
                    return Err(BpeError::corrupt(
                        line_no,
                        format!("expected two symbols, found '{}'", line),
                    ))
                }
            }
        }

        BpeModel::from_rendered_pairs(unit, pairs)
    }

    /// Load a JSON bundle, returning the model and its codec configuration.
    pub fn load_bundle(path: &Path) -> Result<(BpeModel, CodecConfig)> {
        let file = File::open(path).map_err(|e| BpeError::io(path, e))?;
        let serialized: SerializedCodec = serde_json::from_reader(BufReader::new(file))?;
        let loaded = Self::deserialize(serialized)?;

        info!(
            "loaded {} merge rules from bundle {}",
            loaded.0.len(),
            path.display()
        );
        Ok(loaded)
    }

    /// Rebuild a model from the bundle structure.
    pub fn deserialize(data: SerializedCodec) -> Result<(BpeModel, CodecConfig)> {
        if !data.is_supported() {
            return Err(BpeError::InvalidConfig(format!(
                "unsupported bundle version {}",
                data.version
            )));
        }

        let pairs = data
            .merges
            .iter()
            .enumerate()
            .map(|(i, (left, right))| (i + 1, left.as_str(), right.as_str()));
        let model = BpeModel::from_rendered_pairs(data.config.base_unit, pairs)?;

        Ok((model, data.config))
    }
}
