mod inspect_cmd;
mod match_cmd;

pub use inspect_cmd::cmd_inspect;
pub use match_cmd::cmd_match;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead};

use ahoscan::{available_workers, Alphabet, Matcher};

use crate::PatternArgs;

/// Load patterns from a comma list or a text file (one per line)
pub fn load_patterns(args: &PatternArgs) -> Result<Vec<String>> {
    if let Some(path) = &args.patterns_file {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open patterns file: {}", path.display()))?;
        let reader = io::BufReader::new(file);

        let mut patterns = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let entry = line.trim();
            if !entry.is_empty() && !entry.starts_with('#') {
                patterns.push(entry.to_string());
            }
        }
        return Ok(patterns);
    }

    let list = args.patterns.as_deref().unwrap_or_default();
    Ok(list
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse a thread count: None or "auto" = available parallelism, "N" = N
pub fn parse_threads(arg: Option<&str>) -> Result<usize> {
    match arg {
        None | Some("auto") => Ok(available_workers()),
        Some(s) => {
            let n = s.parse::<usize>().with_context(|| {
                format!("Invalid thread count '{}', expected a number or 'auto'", s)
            })?;
            if n == 0 {
                anyhow::bail!("Invalid thread count '0', must be at least 1");
            }
            Ok(n)
        }
    }
}

/// Parse the alphabet flag (default: lowercase ASCII letters)
pub fn parse_alphabet(arg: Option<&str>) -> Result<Alphabet> {
    match arg {
        None => Ok(Alphabet::lowercase_ascii()),
        Some(symbols) => Alphabet::from_symbols(symbols.as_bytes())
            .with_context(|| format!("Invalid alphabet '{}'", symbols)),
    }
}

/// Build a matcher from pattern flags
pub fn build_matcher(
    args: &PatternArgs,
    search_workers: usize,
    show_stats: bool,
) -> Result<Matcher> {
    let patterns = load_patterns(args)?;
    let alphabet = parse_alphabet(args.alphabet.as_deref())?;
    let build_workers = parse_threads(args.build_threads.as_deref())?;

    if show_stats {
        eprintln!("[INFO] Loaded {} patterns", patterns.len());
    }

    Matcher::builder(&patterns)
        .alphabet(alphabet)
        .build_workers(build_workers)
        .search_workers(search_workers)
        .build()
        .context("Failed to build automaton")
}
