//! CLI commands for subbpe.

pub mod apply;
pub mod decode;
pub mod learn;

pub use apply::ApplyCommand;
pub use decode::DecodeCommand;
pub use learn::LearnCommand;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Open `path` for reading, or stdin when no path is given.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Create `path` for writing, or stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
