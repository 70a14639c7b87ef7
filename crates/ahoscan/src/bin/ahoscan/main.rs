//! Ahoscan CLI
//!
//! Scan files for a set of patterns and inspect the automaton built for them.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod cli_utils;
mod commands;

use commands::{cmd_inspect, cmd_match};

#[derive(Parser)]
#[command(name = "ahoscan")]
#[command(author, version, about = "Parallel Aho-Corasick multi-pattern scanner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where patterns come from
#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    /// Comma-separated pattern list (e.g. "he,she,his,hers")
    #[arg(short, long, required_unless_present = "patterns_file")]
    pub patterns: Option<String>,

    /// File with one pattern per line (blank lines and '#' comments skipped)
    #[arg(long, conflicts_with = "patterns")]
    pub patterns_file: Option<PathBuf>,

    /// Alphabet symbols as a string (default: a-z)
    #[arg(long)]
    pub alphabet: Option<String>,

    /// Worker threads for automaton construction (number or "auto")
    #[arg(long)]
    pub build_threads: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable line per match
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every pattern occurrence in a file
    Match {
        /// Input text file
        file: PathBuf,

        #[command(flatten)]
        patterns: PatternArgs,

        /// Worker threads for scanning (number or "auto")
        #[arg(short, long)]
        threads: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print build and scan statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Sort matches by start offset then pattern id
        #[arg(long)]
        sort: bool,

        /// Scan the file bytes as-is instead of lowercasing and filtering
        #[arg(long)]
        raw: bool,
    },

    /// Build the automaton, validate it and print its statistics
    Inspect {
        #[command(flatten)]
        patterns: PatternArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            file,
            patterns,
            threads,
            format,
            stats,
            sort,
            raw,
        } => cmd_match(file, patterns, threads, format, stats, sort, raw),
        Commands::Inspect { patterns, format } => cmd_inspect(patterns, format),
    }
}
