//! Learn command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Learn command arguments.
#[derive(Parser)]
pub struct LearnCommand {
    /// Training corpus, one sentence per line (stdin if not specified)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Read the input as a `word count` dictionary instead of text
    #[arg(long, default_value_t = false)]
    pub dict: bool,

    /// Number of merge operations to learn
    #[arg(short = 's', long, default_value_t = 10_000)]
    pub merges: usize,

    /// Stop when the best pair occurs fewer times than this
    #[arg(long, default_value_t = 1)]
    pub min_frequency: u64,

    /// Use grapheme clusters instead of characters as base units
    #[arg(long, default_value_t = false)]
    pub graphemes: bool,

    /// Merges file to write (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a JSON bundle
    #[arg(long)]
    pub bundle: Option<PathBuf>,

    /// Log every merge
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

use super::{open_input, open_output};
use anyhow::{Context, Result as AnyhowResult};
use log::info;
use std::time::Instant;
use subbpe_codec::{CodecConfig, CodecSaver};
use subbpe_core::BaseUnit;
use subbpe_training::{LearnerConfig, MergeLearner, WordCounts};

pub fn run(cmd: LearnCommand) -> AnyhowResult<()> {
    let base_unit = if cmd.graphemes {
        BaseUnit::Grapheme
    } else {
        BaseUnit::Char
    };

    let start = Instant::now();
    let reader = open_input(cmd.input.as_deref())?;
    let corpus = if cmd.dict {
        WordCounts::from_dict_reader(reader)?
    } else {
        WordCounts::from_reader(reader).context("failed to read corpus")?
    };
    info!(
        "read {} distinct words ({} tokens) in {:.2}s",
        corpus.len(),
        corpus.total(),
        start.elapsed().as_secs_f64()
    );

    let config = LearnerConfig::builder()
        .num_merges(cmd.merges)
        .min_frequency(cmd.min_frequency)
        .base_unit(base_unit)
        .show_progress(cmd.progress)
        .build()?;

    let start = Instant::now();
    let outcome = MergeLearner::new(config).learn(&corpus)?;
    info!(
        "learned {} merges in {:.2}s",
        outcome.model.len(),
        start.elapsed().as_secs_f64()
    );

    let saver = CodecSaver::new(&outcome.model);
    match &cmd.output {
        Some(path) => saver.save_merges(path)?,
        None => {
            let out = open_output(None)?;
            saver
                .write_merges(out)
                .context("failed to write merges to stdout")?;
        }
    }

    if let Some(path) = &cmd.bundle {
        let config = CodecConfig {
            base_unit,
            ..Default::default()
        };
        saver.save_bundle(path, &config)?;
    }

    Ok(())
}
