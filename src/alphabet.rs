//! Nucleotide alphabets
//!
//! Each strand variant maps its four symbols onto the 2-bit codes `0..=3`:
//!
//! | Code | DNA | RNA |
//! | ---- | --- | --- |
//! | 0    | A   | A   |
//! | 1    | C   | C   |
//! | 2    | G   | G   |
//! | 3    | T   | U   |
//!
//! Encoding accepts upper and lower case symbols. Decoding always produces upper case.

use std::fmt;

use crate::error::CodecError;

/// Symbol tables indexed by 2-bit code
const DNA_SYMBOLS: [u8; 4] = [b'A', b'C', b'G', b'T'];
const RNA_SYMBOLS: [u8; 4] = [b'A', b'C', b'G', b'U'];

/// The symbol set used to interpret 2-bit codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strand {
    /// A, C, G, T
    #[default]
    Dna,
    /// A, C, G, U
    Rna,
}
impl Strand {
    /// The four symbols of this strand in code order
    #[must_use]
    pub fn symbols(self) -> &'static [u8; 4] {
        match self {
            Self::Dna => &DNA_SYMBOLS,
            Self::Rna => &RNA_SYMBOLS,
        }
    }

    /// The symbol every zero-valued digit decodes to
    #[must_use]
    pub fn zero_symbol(self) -> u8 {
        self.symbols()[0]
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dna => write!(f, "DNA"),
            Self::Rna => write!(f, "RNA"),
        }
    }
}

/// Returns the 2-bit code of `symbol` in the alphabet of `strand`
#[inline]
pub fn code(symbol: u8, strand: Strand) -> Result<u8, CodecError> {
    match (symbol.to_ascii_uppercase(), strand) {
        (b'A', _) => Ok(0),
        (b'C', _) => Ok(1),
        (b'G', _) => Ok(2),
        (b'T', Strand::Dna) | (b'U', Strand::Rna) => Ok(3),
        _ => Err(CodecError::InvalidSymbol {
            symbol: char::from(symbol),
            strand,
        }),
    }
}

/// Returns the symbol for a 2-bit code
///
/// Only the two low bits of `code` are considered, so every input is valid.
#[inline]
#[must_use]
pub fn symbol(code: u8, strand: Strand) -> u8 {
    strand.symbols()[usize::from(code & 0b11)]
}

/// Checks that every byte of `sequence` belongs to the alphabet of `strand`
pub fn validate(sequence: &[u8], strand: Strand) -> Result<(), CodecError> {
    sequence
        .iter()
        .try_for_each(|&s| code(s, strand).map(|_| ()))
}
