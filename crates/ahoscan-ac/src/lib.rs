//! Arena-based Aho-Corasick Automaton
//!
//! This crate builds a deterministic multi-pattern automaton from a fixed
//! dictionary and replays it over encoded text. Every node lives in a single
//! arena and is addressed by a [`StateId`]; the root is always [`ROOT`].
//!
//! # Design
//!
//! Construction runs in two phases:
//! - the trie phase inserts every pattern, recording the pattern id on the
//!   node where it ends (the node's *local* output)
//! - the propagation phase walks the trie level by level, resolving failure
//!   links, inheriting outputs through them and filling in every missing
//!   transition so the goto function is total
//!
//! Propagation has a sequential FIFO variant and a level-parallel variant.
//! Both produce the same arena for the same pattern list.
//!
//! Once built, an [`ACAutomaton`] is immutable and `Send + Sync`, so any
//! number of scans can share it without locking.
//!
//! ```
//! use ahoscan_ac::{ACAutomaton, Alphabet, MatchRecord};
//!
//! let alphabet = Alphabet::lowercase_ascii();
//! let ac = ACAutomaton::build(&["he", "she", "his", "hers"], &alphabet).unwrap();
//!
//! let matches = ac.find(b"ushers").unwrap();
//! assert!(matches.contains(&MatchRecord::new(1, 1, 3))); // "she"
//! assert!(matches.contains(&MatchRecord::new(3, 2, 5))); // "hers"
//! ```

use std::fmt;

mod automaton;
mod failure;
mod trie;

// Validation module for automaton invariants
pub mod validation;

pub use ahoscan_alphabet::{Alphabet, DisplayByte, SymbolError};
pub use automaton::ACAutomaton;

// Re-export validation types for convenience
pub use validation::{validate_automaton, ACStats, ACValidationResult};

/// Index of a node in the automaton arena
pub type StateId = u32;

/// Identifier of a pattern: its position in the build input
pub type PatternId = u32;

/// The root node is always the first arena slot
pub const ROOT: StateId = 0;

/// Where an out-of-alphabet byte was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSource {
    /// Inside the pattern with this id
    Pattern(PatternId),
    /// Inside the scanned text
    Text,
}

/// Error type for AC automaton operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ACError {
    /// A pattern or text byte is not part of the configured alphabet
    InvalidAlphabetSymbol {
        /// The offending byte
        byte: u8,
        /// Offset inside the pattern or text
        offset: usize,
        /// Pattern or text
        location: SymbolSource,
    },
    /// A zero-length pattern was supplied
    EmptyPattern {
        /// Id the pattern would have received
        pattern_id: PatternId,
    },
    /// A worker count of zero was requested
    InvalidWorkerCount(usize),
    /// The alphabet itself is malformed
    Alphabet(SymbolError),
    /// Resource limit exceeded (e.g., too many states)
    ResourceLimitExceeded(String),
}

impl ACError {
    pub(crate) fn from_symbol(err: SymbolError, location: SymbolSource) -> Self {
        match err {
            SymbolError::Unmapped { byte, offset } => ACError::InvalidAlphabetSymbol {
                byte,
                offset,
                location,
            },
            other => ACError::Alphabet(other),
        }
    }
}

impl fmt::Display for ACError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ACError::InvalidAlphabetSymbol {
                byte,
                offset,
                location: SymbolSource::Pattern(id),
            } => write!(
                f,
                "Invalid alphabet symbol: byte {} at offset {} of pattern {}",
                DisplayByte(*byte),
                offset,
                id
            ),
            ACError::InvalidAlphabetSymbol {
                byte,
                offset,
                location: SymbolSource::Text,
            } => write!(
                f,
                "Invalid alphabet symbol: byte {} at text offset {}",
                DisplayByte(*byte),
                offset
            ),
            ACError::EmptyPattern { pattern_id } => {
                write!(f, "Empty pattern: pattern {} has no symbols", pattern_id)
            }
            ACError::InvalidWorkerCount(count) => {
                write!(f, "Invalid worker count: {} (must be at least 1)", count)
            }
            ACError::Alphabet(err) => write!(f, "Invalid alphabet: {}", err),
            ACError::ResourceLimitExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
        }
    }
}

impl std::error::Error for ACError {}

/// Reject a zero worker count
pub fn check_worker_count(workers: usize) -> Result<usize, ACError> {
    if workers == 0 {
        return Err(ACError::InvalidWorkerCount(workers));
    }
    Ok(workers)
}

/// One occurrence of a pattern in the scanned text.
///
/// `start` and `end` are 0-indexed and `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchRecord {
    /// Pattern that matched
    pub pattern_id: PatternId,
    /// Text offset of the first symbol of the occurrence
    pub start: usize,
    /// Text offset of the last symbol of the occurrence
    pub end: usize,
}

impl MatchRecord {
    pub fn new(pattern_id: PatternId, start: usize, end: usize) -> Self {
        Self {
            pattern_id,
            start,
            end,
        }
    }

    /// Number of symbols covered by the occurrence
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Occurrences always cover at least one symbol
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ACError::InvalidAlphabetSymbol {
            byte: b'X',
            offset: 2,
            location: SymbolSource::Pattern(4),
        };
        assert_eq!(
            err.to_string(),
            "Invalid alphabet symbol: byte 'X' at offset 2 of pattern 4"
        );

        let err = ACError::InvalidAlphabetSymbol {
            byte: b' ',
            offset: 10,
            location: SymbolSource::Text,
        };
        assert_eq!(
            err.to_string(),
            "Invalid alphabet symbol: byte 0x20 at text offset 10"
        );

        assert_eq!(
            ACError::EmptyPattern { pattern_id: 0 }.to_string(),
            "Empty pattern: pattern 0 has no symbols"
        );
    }

    #[test]
    fn test_check_worker_count() {
        assert_eq!(check_worker_count(0), Err(ACError::InvalidWorkerCount(0)));
        assert_eq!(check_worker_count(8), Ok(8));
    }

    #[test]
    fn test_match_record_len() {
        let record = MatchRecord::new(0, 3, 6);
        assert_eq!(record.len(), 4);
        assert!(!record.is_empty());
    }
}
