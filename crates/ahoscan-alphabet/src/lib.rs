//! Symbol alphabet configuration for the ahoscan crates.
//!
//! An [`Alphabet`] maps the bytes a caller declares as valid symbols onto a
//! dense index range `0..len`. The automaton stores one transition per index,
//! so the mapping doubles as the bounds check: a byte that has no index is
//! rejected instead of being used to address a transition row.
//!
//! ```
//! use ahoscan_alphabet::Alphabet;
//!
//! let alphabet = Alphabet::lowercase_ascii();
//! assert_eq!(alphabet.len(), 26);
//! assert_eq!(alphabet.index_of(b'c'), Some(2));
//! assert_eq!(alphabet.index_of(b'C'), None);
//!
//! let encoded = alphabet.encode(b"abc").unwrap();
//! assert_eq!(encoded, vec![0, 1, 2]);
//! ```

use std::fmt;

/// Largest number of symbols an alphabet can hold (every byte value)
pub const MAX_SYMBOLS: usize = 256;

/// Marker for bytes without a dense index
const UNMAPPED: u16 = u16::MAX;

/// Error type for alphabet construction and symbol mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolError {
    /// A byte outside the alphabet was found at `offset` in the input
    Unmapped {
        /// The offending byte
        byte: u8,
        /// Position of the byte in the mapped input
        offset: usize,
    },
    /// The alphabet was declared without any symbols
    Empty,
    /// The same byte was declared twice
    Duplicate(u8),
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolError::Unmapped { byte, offset } => write!(
                f,
                "Byte {} at offset {} is not in the alphabet",
                DisplayByte(*byte),
                offset
            ),
            SymbolError::Empty => write!(f, "Alphabet must contain at least one symbol"),
            SymbolError::Duplicate(byte) => {
                write!(f, "Symbol {} declared more than once", DisplayByte(*byte))
            }
        }
    }
}

impl std::error::Error for SymbolError {}

/// Renders a byte as a quoted character when printable, hex otherwise
pub struct DisplayByte(pub u8);

impl fmt::Display for DisplayByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "'{}'", self.0 as char)
        } else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}

/// Dense mapping from declared symbol bytes to transition indices.
///
/// Indices follow declaration order: the first declared symbol gets index 0.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    /// Index for every byte value, `UNMAPPED` when the byte is not a symbol
    ranks: [u16; MAX_SYMBOLS],
    /// Symbol bytes in index order
    symbols: Vec<u8>,
}

impl Alphabet {
    /// The 26 lowercase ASCII letters `a..=z`
    pub fn lowercase_ascii() -> Self {
        Self::build((b'a'..=b'z').collect())
    }

    /// Every byte value, in numeric order
    pub fn bytes() -> Self {
        Self::build((0..=u8::MAX).collect())
    }

    /// Build an alphabet from an explicit symbol list
    ///
    /// # Errors
    ///
    /// Returns [`SymbolError::Empty`] for an empty list and
    /// [`SymbolError::Duplicate`] when a byte appears twice.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self, SymbolError> {
        if symbols.is_empty() {
            return Err(SymbolError::Empty);
        }

        let mut seen = [false; MAX_SYMBOLS];
        for &byte in symbols {
            if seen[byte as usize] {
                return Err(SymbolError::Duplicate(byte));
            }
            seen[byte as usize] = true;
        }

        Ok(Self::build(symbols.to_vec()))
    }

    fn build(symbols: Vec<u8>) -> Self {
        let mut ranks = [UNMAPPED; MAX_SYMBOLS];
        for (index, &byte) in symbols.iter().enumerate() {
            ranks[byte as usize] = index as u16;
        }
        Self { ranks, symbols }
    }

    /// Number of symbols (the width of a transition row)
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet, provided for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol bytes in index order
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Whether `byte` is a declared symbol
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.ranks[byte as usize] != UNMAPPED
    }

    /// Dense index of `byte`, or `None` when it is not a symbol
    #[inline]
    pub fn index_of(&self, byte: u8) -> Option<u8> {
        match self.ranks[byte as usize] {
            UNMAPPED => None,
            rank => Some(rank as u8),
        }
    }

    /// Symbol byte stored at dense index `index`
    #[inline]
    pub fn symbol_at(&self, index: u8) -> Option<u8> {
        self.symbols.get(index as usize).copied()
    }

    /// Map every byte of `input` to its dense index
    ///
    /// # Errors
    ///
    /// Fails on the first byte outside the alphabet, reporting its offset.
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>, SymbolError> {
        let mut out = Vec::with_capacity(input.len());
        self.encode_into(input, &mut out)?;
        Ok(out)
    }

    /// Like [`Alphabet::encode`], appending into a caller-owned buffer
    ///
    /// On error `out` is left truncated to its original length.
    pub fn encode_into(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), SymbolError> {
        let original_len = out.len();
        out.reserve(input.len());

        for (offset, &byte) in input.iter().enumerate() {
            match self.index_of(byte) {
                Some(index) => out.push(index),
                None => {
                    out.truncate(original_len);
                    return Err(SymbolError::Unmapped { byte, offset });
                }
            }
        }

        Ok(())
    }

    /// Offset and value of the first byte in `input` outside the alphabet
    pub fn first_unmapped(&self, input: &[u8]) -> Option<(usize, u8)> {
        input
            .iter()
            .enumerate()
            .find(|(_, &byte)| !self.contains(byte))
            .map(|(offset, &byte)| (offset, byte))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::lowercase_ascii()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("len", &self.symbols.len())
            .field("symbols", &String::from_utf8_lossy(&self.symbols))
            .finish()
    }
}
