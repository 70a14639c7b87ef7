//! Profile build and scan scaling across worker counts
//!
//! Usage with simple timing:
//! `cargo run --release --example profile_scan`
//!
//! Set `RUST_LOG=ahoscan=debug` to see chunk layouts and build summaries.

use ahoscan::{MatchOrder, Matcher};
use std::time::Instant;

fn main() {
    env_logger::init();
    println!("=== Parallel AC Scan Profiling ===\n");

    // (name, pattern count, text size)
    let configs = vec![
        ("Small", 100, 64 * 1024),
        ("Medium", 1_000, 1024 * 1024),
        ("Large", 10_000, 8 * 1024 * 1024),
    ];

    for (name, pattern_count, text_size) in configs {
        println!("--- {} Workload ---", name);
        println!("Patterns: {}, Text: {} bytes", pattern_count, text_size);

        let patterns: Vec<String> = (0..pattern_count).map(pattern_name).collect();
        let text = generate_text(text_size, pattern_count);

        for build_workers in [1, 4] {
            let build_start = Instant::now();
            let matcher = Matcher::builder(&patterns)
                .build_workers(build_workers)
                .build()
                .expect("Failed to build matcher");
            println!(
                "  Build ({} workers): {:?}, {} nodes",
                build_workers,
                build_start.elapsed(),
                matcher.summary().node_count
            );
        }

        let matcher = Matcher::new(&patterns).expect("Failed to build matcher");
        let baseline = matcher
            .find_all_with(&text, 1, MatchOrder::ByStart)
            .expect("scan failed");

        for workers in [1, 2, 4, 8] {
            // Warm-up run
            let _ = matcher.find_all_with(&text, workers, MatchOrder::Discovery);

            let iterations = 10;
            let start = Instant::now();
            for _ in 0..iterations {
                let results = matcher
                    .find_all_with(&text, workers, MatchOrder::Discovery)
                    .expect("scan failed");
                std::hint::black_box(results);
            }
            let elapsed = start.elapsed();
            let throughput =
                (text.len() as f64 * iterations as f64) / elapsed.as_secs_f64() / 1024.0 / 1024.0;

            let sorted = matcher
                .find_all_with(&text, workers, MatchOrder::ByStart)
                .expect("scan failed");
            assert_eq!(sorted, baseline, "results differ at {} workers", workers);

            println!(
                "  Scan ({} workers): avg {:?}, {:.2} MiB/s, {} matches",
                workers,
                elapsed / iterations,
                throughput,
                baseline.len()
            );
        }
        println!();
    }

    println!("=== Profiling Complete ===");
}

/// Letters-only pattern name (digits are outside the alphabet)
fn pattern_name(mut i: usize) -> String {
    let mut name = String::from("pattern");
    loop {
        name.push((b'a' + (i % 26) as u8) as char);
        i /= 26;
        if i == 0 {
            break;
        }
    }
    name
}

fn generate_text(size: usize, pattern_count: usize) -> Vec<u8> {
    let mut text = Vec::with_capacity(size + 32);
    let mut i = 0;
    while text.len() < size {
        if i % 4 == 0 {
            text.extend_from_slice(pattern_name(i % pattern_count).as_bytes());
        } else {
            text.extend_from_slice(b"nomatchword");
        }
        i += 1;
    }
    text.truncate(size);
    text
}
