//! Text normalization for raw input
//!
//! Scanning rejects any byte outside the alphabet. Raw documents (mixed
//! case, punctuation, whitespace) go through [`clean_text`] first, which
//! ASCII-lowercases every byte and then drops what the alphabet does not
//! contain. With the default `a..=z` alphabet this keeps exactly the letters
//! of the input, folded to lowercase.

use std::fs;
use std::path::Path;

use ahoscan_alphabet::Alphabet;

use crate::error::Result;

/// Lowercase `input` and keep only alphabet symbols
pub fn clean_text(input: &[u8], alphabet: &Alphabet) -> Vec<u8> {
    input
        .iter()
        .map(u8::to_ascii_lowercase)
        .filter(|&byte| alphabet.contains(byte))
        .collect()
}

/// Read a file and normalize it with [`clean_text`]
pub fn load_clean_text<P: AsRef<Path>>(path: P, alphabet: &Alphabet) -> Result<Vec<u8>> {
    let raw = fs::read(path)?;
    Ok(clean_text(&raw, alphabet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_folds_and_filters() {
        let alphabet = Alphabet::lowercase_ascii();
        assert_eq!(
            clean_text(b"Hello, World!\n42 Ushers", &alphabet),
            b"helloworldushers".to_vec()
        );
    }

    #[test]
    fn test_clean_text_respects_custom_alphabet() {
        let alphabet = Alphabet::from_symbols(b"acgt").unwrap();
        assert_eq!(clean_text(b"GATTACA nnn", &alphabet), b"gattaca".to_vec());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_clean_text("/nonexistent/ahoscan/input.txt", &Alphabet::default());
        assert!(matches!(err, Err(crate::AhoscanError::Io(_))));
    }
}
