use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;

use crate::core::error::MinorError;

pub const GAP: u8 = b'-';

const NUCLEOTIDES: &[u8] = b"ACGT-";
const AMINOACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Ordered set of one-character symbols mapped to dense indices `0..len()`.
/// Everything else maps to the sentinel `len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    lookup: [u8; 256],
}

impl Alphabet {
    pub fn new(symbols: &[u8]) -> Result<Self, MinorError> {
        if symbols.is_empty() {
            return Err(MinorError::config("Alphabet must contain at least one symbol"));
        }
        if symbols.len() >= u8::MAX as usize {
            return Err(MinorError::config(format!("Alphabet is too large: {} symbols", symbols.len())));
        }
        if !symbols.iter().all(|x| x.is_ascii_graphic()) {
            return Err(MinorError::config("Alphabet symbols must be printable ASCII characters"));
        }
        let folded = symbols.iter().map(|x| x.to_ascii_uppercase()).collect_vec();
        if !folded.iter().all_unique() {
            return Err(MinorError::config(format!(
                "Alphabet symbols must be unique (case-insensitive): {}",
                String::from_utf8_lossy(symbols)
            )));
        }

        let sentinel = folded.len() as u8;
        let mut lookup = [sentinel; 256];
        for (ind, symbol) in folded.iter().enumerate() {
            // From the SAM specification: No assumptions can be made on the letter cases
            lookup[*symbol as usize] = ind as u8;
            lookup[symbol.to_ascii_lowercase() as usize] = ind as u8;
        }
        Ok(Self { symbols: folded, lookup })
    }

    pub fn nucleotides() -> Self {
        Self::new(NUCLEOTIDES).expect("nucleotide alphabet is valid")
    }

    pub fn aminoacids() -> Self {
        Self::new(AMINOACIDS).expect("amino acid alphabet is valid")
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn sentinel(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    pub fn symbol(&self, index: usize) -> char {
        self.symbols[index] as char
    }

    /// Index of the symbol or the sentinel if it is not a part of the alphabet
    #[inline]
    pub fn index(&self, symbol: u8) -> usize {
        self.lookup[symbol as usize] as usize
    }

    #[cfg(test)]
    pub fn contains(&self, symbol: u8) -> bool {
        self.index(symbol) < self.len()
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.symbols))
    }
}

impl FromStr for Alphabet {
    type Err = MinorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nt" | "nucleotides" => Ok(Self::nucleotides()),
            "aa" | "aminoacids" => Ok(Self::aminoacids()),
            custom if custom.len() > 1 => Self::new(custom.as_bytes()),
            _ => Err(MinorError::config(format!("Unsupported alphabet: {}", s))),
        }
    }
}
