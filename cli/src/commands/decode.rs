//! Decode command implementation.

use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Continuation marker
    #[arg(long, default_value = subbpe_codec::DEFAULT_SEPARATOR)]
    pub separator: String,

    /// Segmented text (stdin if not specified)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use super::{open_input, open_output};
use anyhow::{Context, Result as AnyhowResult};
use log::{info, warn};
use std::io::Write;
use subbpe_codec::{CodecConfig, Reassembler};

/// Build a reassembler, applying the same separator rules as `apply`.
fn reassembler_for(separator: &str) -> AnyhowResult<Reassembler> {
    CodecConfig {
        separator: separator.to_string(),
        ..Default::default()
    }
    .validate()?;
    Ok(Reassembler::new(separator))
}

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let reassembler = reassembler_for(&cmd.separator)?;
    let reader = open_input(cmd.input.as_deref())?;
    let mut out = open_output(cmd.output.as_deref())?;

    let mut anomalies = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let decoded = reassembler.decode_line(&line);
        if !decoded.is_clean() {
            warn!("line {}: {} anomalies", idx + 1, decoded.anomalies.len());
            anomalies += decoded.anomalies.len();
        }
        writeln!(out, "{}", decoded.text())?;
    }
    out.flush()?;

    if anomalies > 0 {
        info!("recovered {} malformed tokens", anomalies);
    }

    Ok(())
}
