use anyhow::Result;
use serde_json::json;

use super::build_matcher;
use crate::cli_utils::format_number;
use crate::{OutputFormat, PatternArgs};

pub fn cmd_inspect(pattern_args: PatternArgs, format: OutputFormat) -> Result<()> {
    let matcher = build_matcher(&pattern_args, 1, false)?;
    let summary = matcher.summary();
    let validation = matcher.validate();
    let stats = &validation.stats;

    match format {
        OutputFormat::Json => {
            let report = json!({
                "patterns": summary.pattern_count,
                "nodes": summary.node_count,
                "max_depth": summary.max_depth,
                "max_pattern_len": summary.max_pattern_len,
                "build_workers": summary.build_workers,
                "build_time_ms": summary.elapsed.as_secs_f64() * 1000.0,
                "level_widths": stats.level_widths,
                "output_entries": stats.output_entries,
                "terminal_nodes": stats.terminal_nodes,
                "orphaned_nodes": stats.orphaned_count,
                "valid": validation.is_valid(),
                "errors": validation.errors,
                "warnings": validation.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Automaton");
            println!("  Patterns:        {}", format_number(summary.pattern_count));
            println!("  Nodes:           {}", format_number(summary.node_count));
            println!("  Max depth:       {}", summary.max_depth);
            println!("  Longest pattern: {}", summary.max_pattern_len);
            println!(
                "  Build:           {:.2}ms ({} workers)",
                summary.elapsed.as_secs_f64() * 1000.0,
                summary.build_workers
            );
            println!("  Level widths:    {:?}", stats.level_widths);
            println!("  Output entries:  {}", stats.output_entries);
            println!("  Terminal nodes:  {}", stats.terminal_nodes);
            println!();

            if validation.is_valid() {
                println!("Validation: OK");
            } else {
                println!("Validation: FAILED");
            }
            for error in &validation.errors {
                println!("  ERROR: {}", error);
            }
            for warning in &validation.warnings {
                println!("  WARNING: {}", warning);
            }
        }
    }

    if !validation.is_valid() {
        anyhow::bail!(
            "Automaton failed validation with {} errors",
            validation.errors.len()
        );
    }
    Ok(())
}
