//! Save functionality for learned rule tables.

use super::format::{SerializedCodec, FORMAT_VERSION, VERSION_HEADER};
use crate::codec::CodecConfig;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use subbpe_core::{BpeError, BpeModel, Result};

/// Merges-file format version written by [`CodecSaver::with_header`].
const MERGES_VERSION: &str = "0.2";

/// Rule table saver.
pub struct CodecSaver<'a> {
    /// Model reference
    model: &'a BpeModel,
    /// Write a `#version` line before the rules
    header: bool,
}

impl<'a> CodecSaver<'a> {
    /// Create a new saver.
    pub fn new(model: &'a BpeModel) -> Self {
        Self {
            model,
            header: false,
        }
    }

    /// Write a `#version` header line in merges files.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Write the rules as text, one rendered pair per line in rank order.
    pub fn write_merges<W: Write>(&self, writer: W) -> std::io::Result<()> {
        let mut writer = BufWriter::new(writer);
        if self.header {
            writeln!(writer, "{}: {}", VERSION_HEADER, MERGES_VERSION)?;
        }
        for (left, right) in self.model.rendered_rules() {
            writeln!(writer, "{} {}", left, right)?;
        }
        writer.flush()
    }

    /// Save the rules to a merges file.
    pub fn save_merges(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        let file = File::create(path).map_err(|e| BpeError::io(path, e))?;
        self.write_merges(file).map_err(|e| BpeError::io(path, e))?;

        info!("saved {} merge rules to {}", self.model.len(), path.display());
        Ok(())
    }

    /// Build the JSON bundle structure.
    pub fn serialize(&self, config: &CodecConfig) -> SerializedCodec {
        let mut config = config.clone();
        config.base_unit = self.model.base_unit();

        SerializedCodec {
            version: FORMAT_VERSION.to_string(),
            config,
            merges: self
                .model
                .rendered_rules()
                .map(|(left, right)| (left.to_string(), right.to_string()))
                .collect(),
        }
    }

    /// Save the rules and `config` as a JSON bundle.
    pub fn save_bundle(&self, path: &Path, config: &CodecConfig) -> Result<()> {
        create_parent(path)?;
        let file = File::create(path).map_err(|e| BpeError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.serialize(config))?;
        writer.flush().map_err(|e| BpeError::io(path, e))?;

        info!("saved codec bundle to {}", path.display());
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| BpeError::io(parent, e))
        }
        _ => Ok(()),
    }
}
