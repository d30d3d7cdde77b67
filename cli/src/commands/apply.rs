//! Apply command implementation.

use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Apply command arguments.
#[derive(Parser)]
pub struct ApplyCommand {
    /// Merges file or JSON bundle
    #[arg(short, long)]
    pub codes: PathBuf,

    /// Continuation marker [default: @@, or the one stored in a bundle]
    #[arg(long)]
    pub separator: Option<String>,

    /// Regex for strings that must not be split (repeatable)
    #[arg(long = "glossary")]
    pub glossaries: Vec<String>,

    /// Read merges files as grapheme clusters
    #[arg(long, default_value_t = false)]
    pub graphemes: bool,

    /// Text to segment (stdin if not specified)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use super::{open_input, open_output};
use anyhow::{Context, Result as AnyhowResult};
use log::info;
use std::io::Write;
use subbpe_codec::Codec;
use subbpe_core::BaseUnit;

pub fn run(cmd: ApplyCommand) -> AnyhowResult<()> {
    let base_unit = if cmd.graphemes {
        BaseUnit::Grapheme
    } else {
        BaseUnit::Char
    };

    let mut builder = Codec::builder()
        .base_unit(base_unit)
        .glossaries(cmd.glossaries.iter().cloned());
    if let Some(separator) = &cmd.separator {
        builder = builder.separator(separator.as_str());
    }
    let codec = builder
        .load(&cmd.codes)
        .with_context(|| format!("failed to load codes from {}", cmd.codes.display()))?;

    // A bundle brings its own separator; an explicit one wins
    let codec = match &cmd.separator {
        Some(separator) if separator != codec.separator() => Codec::builder()
            .config(codec.config().clone())
            .separator(separator.as_str())
            .build(codec.model().clone())?,
        _ => codec,
    };

    let reader = open_input(cmd.input.as_deref())?;
    let mut out = open_output(cmd.output.as_deref())?;
    let mut cache = codec.new_cache();

    let mut lines = 0usize;
    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        writeln!(out, "{}", codec.encode_line_cached(&line, &mut cache))?;
        lines += 1;
    }
    out.flush()?;

    let stats = cache.stats();
    info!(
        "segmented {} lines; cache {} entries, {} hits, {} misses",
        lines, stats.entries, stats.hits, stats.misses
    );

    Ok(())
}
