//! Error types for the ahoscan library
//!
//! Ahoscan uses a unified error type that wraps errors from the automaton
//! and alphabet crates, so callers only handle one type.

use thiserror::Error;

/// Main error type for ahoscan operations
#[derive(Error, Debug)]
pub enum AhoscanError {
    /// Error from automaton construction or text validation
    #[error(transparent)]
    Automaton(#[from] ahoscan_ac::ACError),

    /// Error from alphabet construction
    #[error(transparent)]
    Alphabet(#[from] ahoscan_alphabet::SymbolError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("{0}")]
    Config(String),
}

/// Result type alias for ahoscan operations
pub type Result<T> = std::result::Result<T, AhoscanError>;

impl From<String> for AhoscanError {
    fn from(s: String) -> Self {
        AhoscanError::Config(s)
    }
}

impl From<&str> for AhoscanError {
    fn from(s: &str) -> Self {
        AhoscanError::Config(s.to_string())
    }
}

// Re-export component error types for users who need them
pub use ahoscan_ac::{ACError, SymbolSource};
pub use ahoscan_alphabet::SymbolError;
