//! Ahoscan - Parallel Aho-Corasick Multi-Pattern Scanning
//!
//! Ahoscan finds every occurrence of every pattern in a text in one pass.
//! Both phases can use several threads: failure links are resolved one trie
//! level at a time by a pool of workers, and the text is split into
//! overlapping chunks that are scanned concurrently.
//!
//! # Quick Start
//!
//! ```rust
//! use ahoscan::{Matcher, MatchOrder};
//!
//! let matcher = Matcher::builder(["he", "she", "his", "hers"])
//!     .search_workers(2)
//!     .order(MatchOrder::ByStart)
//!     .build()?;
//!
//! for m in matcher.find_all(b"ushers")? {
//!     let pattern = matcher.pattern(m.pattern_id).unwrap_or_default();
//!     println!(
//!         "Pattern \"{}\" found from index {} to {}",
//!         String::from_utf8_lossy(pattern),
//!         m.start,
//!         m.end
//!     );
//! }
//! # Ok::<(), ahoscan::AhoscanError>(())
//! ```
//!
//! Raw input (mixed case, punctuation) goes through
//! [`normalize::clean_text`] first; scanning itself rejects any byte outside
//! the alphabet.
//!
//! # Architecture
//!
//! ```text
//! patterns ──► trie (goto rows, depth, local outputs)
//!                 │ level-parallel failure propagation
//!                 ▼
//!            ACAutomaton (total goto, failure, effective outputs)
//!                 │ shared read-only
//!      ┌──────────┼──────────┐
//!   chunk 0    chunk 1    chunk k-1     one worker each, overlap m-1
//!      └──────────┼──────────┘
//!                 ▼
//!          aggregate (chunk order, optional sort)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Merging per-worker match buffers
pub mod aggregate;
/// Error types for ahoscan operations
pub mod error;
/// Matcher facade, options and statistics
pub mod matcher;
/// Text normalization for raw input
pub mod normalize;
/// Chunk planning and parallel scanning
pub mod scan;

/// Main matcher API
pub use crate::matcher::{
    available_workers, BuildSummary, Matcher, MatcherBuilder, MatcherOptions, MatcherStats,
    MatcherStatsSnapshot,
};

/// Result ordering
pub use crate::aggregate::MatchOrder;

/// Main error type for ahoscan operations
pub use crate::error::{AhoscanError, Result};

// Re-export the automaton layer for advanced users
pub use ahoscan_ac::{
    validate_automaton, ACAutomaton, ACError, ACStats, ACValidationResult, MatchRecord, PatternId,
    StateId, SymbolSource,
};
pub use ahoscan_alphabet::{Alphabet, SymbolError};

// Version information
/// Library version string
pub const AHOSCAN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library major version
pub const AHOSCAN_VERSION_MAJOR: &str = env!("CARGO_PKG_VERSION_MAJOR");

/// Library minor version
pub const AHOSCAN_VERSION_MINOR: &str = env!("CARGO_PKG_VERSION_MINOR");

/// Library patch version
pub const AHOSCAN_VERSION_PATCH: &str = env!("CARGO_PKG_VERSION_PATCH");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(AHOSCAN_VERSION_MAJOR.parse::<u32>().is_ok());
        assert!(AHOSCAN_VERSION_MINOR.parse::<u32>().is_ok());
        assert!(AHOSCAN_VERSION_PATCH.parse::<u32>().is_ok());

        let expected = format!(
            "{}.{}.{}",
            AHOSCAN_VERSION_MAJOR, AHOSCAN_VERSION_MINOR, AHOSCAN_VERSION_PATCH
        );
        assert_eq!(AHOSCAN_VERSION, expected);
    }

    #[test]
    fn test_quick_start_matches() {
        let matcher = Matcher::builder(["he", "she", "his", "hers"])
            .search_workers(2)
            .order(MatchOrder::ByStart)
            .build()
            .unwrap();
        let found: Vec<_> = matcher
            .find_all(b"ushers")
            .unwrap()
            .into_iter()
            .map(|m| (m.pattern_id, m.start, m.end))
            .collect();
        assert_eq!(found, vec![(1, 1, 3), (0, 2, 3), (3, 2, 5)]);
    }
}
