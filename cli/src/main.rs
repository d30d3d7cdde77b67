//! subbpe CLI - Command-line interface for subword BPE.
//!
//! This is the main entry point for the `subbpe` command-line tool.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use commands::{ApplyCommand, DecodeCommand, LearnCommand};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "subbpe")]
#[command(about = "Learn and apply subword BPE merge rules", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn merge rules from a corpus
    Learn(LearnCommand),
    /// Segment text with learned merge rules
    Apply(ApplyCommand),
    /// Reassemble segmented text
    Decode(DecodeCommand),
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Learn(cmd) => commands::learn::run(cmd)?,
        Commands::Apply(cmd) => commands::apply::run(cmd)?,
        Commands::Decode(cmd) => commands::decode::run(cmd)?,
    }

    Ok(())
}
