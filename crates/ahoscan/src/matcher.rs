//! The `Matcher` facade
//!
//! A [`Matcher`] owns the pattern list, the built automaton and the worker
//! configuration for both phases. It is configured through a builder:
//!
//! ```
//! use ahoscan::{Matcher, MatchOrder};
//!
//! let matcher = Matcher::builder(["he", "she", "his", "hers"])
//!     .build_workers(2)
//!     .search_workers(4)
//!     .order(MatchOrder::ByStart)
//!     .build()?;
//!
//! let matches = matcher.find_all(b"ushers")?;
//! assert_eq!(matcher.pattern(matches[0].pattern_id), Some(&b"she"[..]));
//! # Ok::<(), ahoscan::AhoscanError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use ahoscan_ac::{
    check_worker_count, validate_automaton, ACAutomaton, ACValidationResult, MatchRecord,
    PatternId,
};
use ahoscan_alphabet::Alphabet;
use log::debug;

use crate::aggregate::{aggregate, MatchOrder};
use crate::error::Result;
use crate::scan::scan_chunked;

/// Worker count matching the machine's available parallelism
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .max(1)
}

/// Configuration for building and scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Symbols patterns and text are drawn from
    pub alphabet: Alphabet,
    /// Threads used to resolve each trie level (1 = sequential)
    pub build_workers: usize,
    /// Chunks / threads used per scan (1 = sequential)
    pub search_workers: usize,
    /// Ordering of returned matches
    pub order: MatchOrder,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            build_workers: 1,
            search_workers: 1,
            order: MatchOrder::Discovery,
        }
    }
}

/// Statistics for scans
/// Uses atomic counters for thread-safe access across all threads
#[derive(Debug, Default)]
pub struct MatcherStats {
    /// Number of completed scans
    pub scans: AtomicU64,
    /// Total symbols scanned
    pub bytes_scanned: AtomicU64,
    /// Total matches returned
    pub matches_found: AtomicU64,
}

/// Snapshot of scan statistics at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatcherStatsSnapshot {
    /// Number of completed scans
    pub scans: u64,
    /// Total symbols scanned
    pub bytes_scanned: u64,
    /// Total matches returned
    pub matches_found: u64,
}

impl MatcherStats {
    /// Take a snapshot of current statistics
    pub fn snapshot(&self) -> MatcherStatsSnapshot {
        MatcherStatsSnapshot {
            scans: self.scans.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
        }
    }

    fn record_scan(&self, bytes: usize, matches: usize) {
        self.scans.fetch_add(1, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes as u64, Ordering::Relaxed);
        self.matches_found.fetch_add(matches as u64, Ordering::Relaxed);
    }
}

/// Facts about a finished build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    /// Patterns inserted
    pub pattern_count: usize,
    /// Trie nodes including the root
    pub node_count: usize,
    /// Deepest trie level
    pub max_depth: usize,
    /// Longest pattern in symbols
    pub max_pattern_len: usize,
    /// Threads used for failure propagation
    pub build_workers: usize,
    /// Wall time of trie insertion plus propagation
    pub elapsed: Duration,
}

/// Builder for [`Matcher`]
#[derive(Debug, Clone)]
pub struct MatcherBuilder {
    patterns: Vec<Vec<u8>>,
    options: MatcherOptions,
}

impl MatcherBuilder {
    fn new(patterns: Vec<Vec<u8>>) -> Self {
        Self {
            patterns,
            options: MatcherOptions::default(),
        }
    }

    /// Replace every option at once
    pub fn options(mut self, options: MatcherOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the symbol alphabet
    ///
    /// Default: lowercase ASCII letters
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.options.alphabet = alphabet;
        self
    }

    /// Threads used to resolve each trie level
    ///
    /// Default: 1 (sequential)
    pub fn build_workers(mut self, workers: usize) -> Self {
        self.options.build_workers = workers;
        self
    }

    /// Threads used by [`Matcher::find_all`]
    ///
    /// Default: 1 (sequential)
    pub fn search_workers(mut self, workers: usize) -> Self {
        self.options.search_workers = workers;
        self
    }

    /// Set both worker counts
    pub fn workers(self, workers: usize) -> Self {
        self.build_workers(workers).search_workers(workers)
    }

    /// Ordering of returned matches
    ///
    /// Default: [`MatchOrder::Discovery`]
    pub fn order(mut self, order: MatchOrder) -> Self {
        self.options.order = order;
        self
    }

    /// Validate the configuration and build the automaton
    ///
    /// # Errors
    ///
    /// Worker counts of zero, empty patterns and out-of-alphabet pattern
    /// bytes are all rejected before any construction work starts.
    pub fn build(self) -> Result<Matcher> {
        let options = self.options;
        check_worker_count(options.build_workers)?;
        check_worker_count(options.search_workers)?;

        let start = Instant::now();
        let automaton =
            ACAutomaton::build_with_workers(&self.patterns, &options.alphabet, options.build_workers)?;

        let summary = BuildSummary {
            pattern_count: automaton.pattern_count(),
            node_count: automaton.node_count(),
            max_depth: automaton.max_depth(),
            max_pattern_len: automaton.max_pattern_len(),
            build_workers: options.build_workers,
            elapsed: start.elapsed(),
        };

        Ok(Matcher {
            automaton,
            patterns: self.patterns,
            options,
            summary,
            stats: MatcherStats::default(),
        })
    }
}

/// Multi-pattern matcher with configurable build and search parallelism
///
/// All scanning methods take `&self`; a matcher can be shared across threads
/// (e.g. in an `Arc`) and scanned concurrently.
#[derive(Debug)]
pub struct Matcher {
    automaton: ACAutomaton,
    patterns: Vec<Vec<u8>>,
    options: MatcherOptions,
    summary: BuildSummary,
    stats: MatcherStats,
}

impl Matcher {
    /// Start configuring a matcher for `patterns`
    ///
    /// Pattern ids are positions in the iteration order.
    pub fn builder<I, P>(patterns: I) -> MatcherBuilder
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        MatcherBuilder::new(
            patterns
                .into_iter()
                .map(|pattern| pattern.as_ref().to_vec())
                .collect(),
        )
    }

    /// Build with default options (lowercase ASCII, sequential)
    pub fn new<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        Self::builder(patterns).build()
    }

    /// The underlying automaton
    pub fn automaton(&self) -> &ACAutomaton {
        &self.automaton
    }

    /// Pattern bytes by id
    pub fn pattern(&self, pattern_id: PatternId) -> Option<&[u8]> {
        self.patterns.get(pattern_id as usize).map(Vec::as_slice)
    }

    /// All patterns in id order
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    /// Options the matcher was built with
    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Build facts
    pub fn summary(&self) -> &BuildSummary {
        &self.summary
    }

    /// Current scan statistics
    pub fn stats(&self) -> MatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Find every occurrence using the configured search workers and order
    pub fn find_all(&self, text: &[u8]) -> Result<Vec<MatchRecord>> {
        self.find_all_with(text, self.options.search_workers, self.options.order)
    }

    /// Find every occurrence with an explicit worker count and order
    ///
    /// # Errors
    ///
    /// - [`ahoscan_ac::ACError::InvalidWorkerCount`] when `workers` is zero
    /// - [`ahoscan_ac::ACError::InvalidAlphabetSymbol`] for a text byte
    ///   outside the alphabet; no worker is started in that case
    pub fn find_all_with(
        &self,
        text: &[u8],
        workers: usize,
        order: MatchOrder,
    ) -> Result<Vec<MatchRecord>> {
        check_worker_count(workers)?;
        let symbols = self.automaton.encode_text(text)?;

        let slots = scan_chunked(&self.automaton, &symbols, workers)?;
        let matches = aggregate(slots, order);

        debug!(
            "Scan of {} symbols with {} workers found {} matches",
            symbols.len(),
            workers,
            matches.len()
        );
        self.stats.record_scan(symbols.len(), matches.len());
        Ok(matches)
    }

    /// Single left-to-right pass on the calling thread, no chunking
    pub fn find_sequential(&self, text: &[u8]) -> Result<Vec<MatchRecord>> {
        let matches = self.automaton.find(text)?;
        self.stats.record_scan(text.len(), matches.len());
        Ok(matches)
    }

    /// Check every automaton invariant
    pub fn validate(&self) -> ACValidationResult {
        validate_automaton(&self.automaton)
    }
}
