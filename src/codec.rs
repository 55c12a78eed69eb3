//! Positional base-4 codec
//!
//! A pattern of `n` symbols is read as a base-4 numeral whose first symbol is the
//! most significant digit:
//!
//! ```text
//! value = code(p[0]) * 4^(n-1) + code(p[1]) * 4^(n-2) + ... + code(p[n-1])
//! ```
//!
//! so `"ACGT"` encodes to `0b00_01_10_11`. Decoding needs the pattern length, since
//! leading `A` symbols contribute nothing to the value.

use std::fmt;

use crate::{
    alphabet::{self, Strand},
    error::{CodecError, HeaderError},
};

/// Integer width used to store one segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BitWidth {
    U16,
    U32,
    #[default]
    U64,
}
impl BitWidth {
    /// Parses a raw bit count as stored in the header
    pub fn from_bits(bits: u8) -> Result<Self, HeaderError> {
        match bits {
            16 => Ok(Self::U16),
            32 => Ok(Self::U32),
            64 => Ok(Self::U64),
            _ => Err(HeaderError::UnsupportedBitWidth(bits)),
        }
    }

    /// Number of bits in the integer
    #[must_use]
    pub fn bits(self) -> u8 {
        match self {
            Self::U16 => 16,
            Self::U32 => 32,
            Self::U64 => 64,
        }
    }

    /// Number of bytes one segment occupies on disk
    #[must_use]
    pub fn bytes(self) -> usize {
        usize::from(self.bits() / 8)
    }

    /// Largest value representable by the integer
    #[must_use]
    pub fn max_value(self) -> u64 {
        match self {
            Self::U16 => u64::from(u16::MAX),
            Self::U32 => u64::from(u32::MAX),
            Self::U64 => u64::MAX,
        }
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Longest pattern that fits in any supported width
const MAX_PATTERN: usize = 32;

/// Encodes `pattern` as a base-4 integer, first symbol most significant
///
/// # Errors
///
/// * [`CodecError::EmptyPattern`] if `pattern` is empty
/// * [`CodecError::InvalidSymbol`] if a symbol is outside the alphabet of `strand`
/// * [`CodecError::PatternTooLong`] if the value would not fit into 64 bits
pub fn encode(pattern: &[u8], strand: Strand) -> Result<u64, CodecError> {
    if pattern.is_empty() {
        return Err(CodecError::EmptyPattern);
    }
    if pattern.len() > MAX_PATTERN {
        return Err(CodecError::PatternTooLong(pattern.len()));
    }
    pattern.iter().try_fold(0u64, |value, &s| {
        alphabet::code(s, strand).map(|c| (value << 2) | u64::from(c))
    })
}

/// Appends the `length`-symbol decoding of `value` to `buffer`
///
/// Digits beyond the value's magnitude are padded with the zero symbol (`A`).
/// Digits of `value` above `length` are ignored; use [`fits`] to check beforehand.
pub fn decode_into(value: u64, length: usize, strand: Strand, buffer: &mut Vec<u8>) {
    let start = buffer.len();
    buffer.resize(start + length, strand.zero_symbol());
    let mut remainder = value;
    for slot in buffer[start..].iter_mut().rev() {
        if remainder == 0 {
            break;
        }
        *slot = alphabet::symbol((remainder % 4) as u8, strand);
        remainder /= 4;
    }
}

/// Decodes `value` into exactly `length` symbols
#[must_use]
pub fn decode(value: u64, length: usize, strand: Strand) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(length);
    decode_into(value, length, strand, &mut buffer);
    buffer
}

/// Decodes `value` into its shortest representation, without leading `A` padding
///
/// This loses information for any pattern starting with `A` and must not be used
/// to decode stored segments. It exists to derive capacity bounds such as
/// [`max_length`]. Zero decodes to a single zero symbol.
#[must_use]
pub fn decode_shortest(value: u64, strand: Strand) -> Vec<u8> {
    let mut digits = Vec::new();
    let mut remainder = value;
    loop {
        digits.push(alphabet::symbol((remainder % 4) as u8, strand));
        remainder /= 4;
        if remainder == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

/// Number of symbols one integer of `width` bits can hold
///
/// Derived from the shortest decoding of the width's maximum value. This equals
/// `bits / 2` because every supported `2^bits` is an exact power of four.
#[must_use]
pub fn max_length(width: BitWidth) -> usize {
    decode_shortest(width.max_value(), Strand::Dna).len()
}

/// Whether `value` is below `4^length`, i.e. decodes losslessly into `length` symbols
#[inline]
#[must_use]
pub fn fits(value: u64, length: usize) -> bool {
    length >= MAX_PATTERN || value >> (2 * length) == 0
}

#[cfg(test)]
mod testing {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    fn random_pattern(rng: &mut SmallRng, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| alphabet::symbol(rng.random_range(0..4), Strand::Dna))
            .collect()
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(b"A", Strand::Dna), Ok(0));
        assert_eq!(encode(b"T", Strand::Dna), Ok(3));
        assert_eq!(encode(b"CA", Strand::Dna), Ok(4));
        assert_eq!(encode(b"ACGT", Strand::Dna), Ok(0b00_01_10_11));
        assert_eq!(encode(b"ACGU", Strand::Rna), Ok(0b00_01_10_11));
        assert_eq!(encode(&[b'T'; 32], Strand::Dna), Ok(u64::MAX));
    }

    #[test]
    fn test_encode_errors() {
        assert_eq!(encode(b"", Strand::Dna), Err(CodecError::EmptyPattern));
        assert_eq!(
            encode(b"ACGN", Strand::Dna),
            Err(CodecError::InvalidSymbol {
                symbol: 'N',
                strand: Strand::Dna
            })
        );
        assert_eq!(
            encode(&[b'A'; 33], Strand::Dna),
            Err(CodecError::PatternTooLong(33))
        );
    }

    #[test]
    fn test_decode_pads_leading_zero_symbol() {
        assert_eq!(decode(0, 3, Strand::Dna), b"AAA");
        assert_eq!(decode(0b01_10_11, 5, Strand::Dna), b"AACGT");
        assert_eq!(decode(0, 0, Strand::Dna), b"");
    }

    #[test]
    fn test_decode_shortest() {
        assert_eq!(decode_shortest(0, Strand::Dna), b"A");
        assert_eq!(decode_shortest(0b00_01_10_11, Strand::Dna), b"CGT");
        assert_eq!(decode_shortest(3, Strand::Rna), b"U");
    }

    #[test]
    fn test_max_length() {
        assert_eq!(max_length(BitWidth::U16), 8);
        assert_eq!(max_length(BitWidth::U32), 16);
        assert_eq!(max_length(BitWidth::U64), 32);
        for width in [BitWidth::U16, BitWidth::U32, BitWidth::U64] {
            assert_eq!(max_length(width), usize::from(width.bits() / 2));
        }
    }

    #[test]
    fn test_round_trip_random() -> Result<(), CodecError> {
        let mut rng = SmallRng::seed_from_u64(42);
        for len in 1..=32 {
            for _ in 0..64 {
                let pattern = random_pattern(&mut rng, len);
                let value = encode(&pattern, Strand::Dna)?;
                assert!(fits(value, len));
                assert_eq!(decode(value, len, Strand::Dna), pattern);
            }
        }
        Ok(())
    }

    #[test]
    fn test_bijection_bound() -> Result<(), CodecError> {
        for len in 1..32 {
            let value = encode(&vec![b'T'; len], Strand::Dna)?;
            assert_eq!(value, (1u64 << (2 * len)) - 1);
            assert!(!fits(value + 1, len));
        }
        Ok(())
    }

    #[test]
    fn test_decode_into_appends() {
        let mut buffer = b"GG".to_vec();
        decode_into(1, 2, Strand::Dna, &mut buffer);
        assert_eq!(buffer, b"GGAC");
    }

    #[test]
    fn test_bit_width_parsing() {
        assert_eq!(BitWidth::from_bits(16).ok(), Some(BitWidth::U16));
        assert_eq!(BitWidth::from_bits(64).ok(), Some(BitWidth::U64));
        assert!(BitWidth::from_bits(8).is_err());
        assert_eq!(BitWidth::U32.bytes(), 4);
    }
}
