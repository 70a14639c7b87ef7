use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use ahoscan::normalize::clean_text;
use ahoscan::{MatchOrder, MatchRecord, Matcher};

use super::{build_matcher, parse_threads};
use crate::cli_utils::{format_number, format_throughput};
use crate::{OutputFormat, PatternArgs};

#[allow(clippy::too_many_arguments)]
pub fn cmd_match(
    file: PathBuf,
    pattern_args: PatternArgs,
    threads_arg: Option<String>,
    format: OutputFormat,
    show_stats: bool,
    sort: bool,
    raw: bool,
) -> Result<()> {
    let num_threads = parse_threads(threads_arg.as_deref())?;

    if show_stats {
        if num_threads == 1 {
            eprintln!("[INFO] Mode: Sequential (single-threaded)");
        } else {
            eprintln!("[INFO] Mode: Parallel ({} workers)", num_threads);
        }
    }

    let matcher = build_matcher(&pattern_args, num_threads, show_stats)?;

    if show_stats {
        let summary = matcher.summary();
        eprintln!(
            "[INFO] Automaton: {} nodes, {} levels, max pattern length {}",
            format_number(summary.node_count),
            summary.max_depth + 1,
            summary.max_pattern_len
        );
        eprintln!(
            "[INFO] Build time: {:.2}ms ({} build workers)",
            summary.elapsed.as_secs_f64() * 1000.0,
            summary.build_workers
        );
    }

    let load_start = Instant::now();
    let raw_bytes =
        fs::read(&file).with_context(|| format!("Failed to read input: {}", file.display()))?;
    let text = if raw {
        raw_bytes
    } else {
        clean_text(&raw_bytes, matcher.automaton().alphabet())
    };

    if show_stats {
        eprintln!(
            "[INFO] Loaded {} symbols from {} in {:.2}ms",
            format_number(text.len()),
            file.display(),
            load_start.elapsed().as_secs_f64() * 1000.0
        );
    }

    let order = if sort {
        MatchOrder::ByStart
    } else {
        MatchOrder::Discovery
    };

    let search_start = Instant::now();
    let matches = matcher
        .find_all_with(&text, num_threads, order)
        .with_context(|| format!("Failed to scan: {}", file.display()))?;
    let search_time = search_start.elapsed();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in &matches {
        write_match(&mut out, &matcher, record, format)?;
    }
    out.flush()?;

    if show_stats {
        eprintln!("[INFO] Matches: {}", format_number(matches.len()));
        eprintln!(
            "[INFO] Throughput: {}",
            format_throughput(text.len(), search_time)
        );
        eprintln!(
            "Search completed in {:.6} seconds.",
            search_time.as_secs_f64()
        );
    }

    Ok(())
}

fn write_match<W: Write>(
    out: &mut W,
    matcher: &Matcher,
    record: &MatchRecord,
    format: OutputFormat,
) -> Result<()> {
    let pattern = String::from_utf8_lossy(matcher.pattern(record.pattern_id).unwrap_or_default());

    match format {
        OutputFormat::Text => writeln!(
            out,
            "Pattern \"{}\" found from index {} to {}",
            pattern, record.start, record.end
        )?,
        OutputFormat::Json => {
            let match_obj = json!({
                "pattern": pattern,
                "pattern_id": record.pattern_id,
                "start": record.start,
                "end": record.end,
            });
            writeln!(out, "{}", serde_json::to_string(&match_obj)?)?;
        }
    }
    Ok(())
}
