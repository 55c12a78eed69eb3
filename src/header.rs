//! Header module for the nucpack library
//!
//! The header is written once, before any segment data, and fully determines how
//! the segments following it are laid out.
//!
//! | Offset | Size (bytes) | Name           | Description                       | Type   |
//! | ------ | ------------ | -------------- | --------------------------------- | ------ |
//! | 0      | 1            | bit_width      | Segment integer width (16/32/64)  | uint8  |
//! | 1      | 8            | total_length   | Number of symbols in the stream   | uint64 |
//! | 9      | 1            | segment_length | Symbols per full segment          | uint8  |

use byteorder::{ByteOrder, LittleEndian};
use std::io::{ErrorKind, Read, Write};

use crate::{
    codec::{self, BitWidth},
    error::{HeaderError, Result},
};

/// Size of the header in bytes
pub const SIZE_HEADER: usize = 10;

/// Header structure for packed nucleotide streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Width of the integer each segment is stored in
    ///
    /// 1 byte
    pub bit_width: BitWidth,

    /// Number of symbols in the whole stream
    ///
    /// 8 bytes
    pub total_length: u64,

    /// Number of symbols in every segment but possibly the last
    ///
    /// 1 byte
    pub segment_length: u8,
}
impl StreamHeader {
    /// Creates a header whose segments use the full capacity of `bit_width`
    #[must_use]
    pub fn new(bit_width: BitWidth, total_length: u64) -> Self {
        Self {
            bit_width,
            total_length,
            segment_length: codec::max_length(bit_width) as u8,
        }
    }

    /// Number of segments following the header
    #[must_use]
    pub fn segment_count(&self) -> u64 {
        self.total_length.div_ceil(u64::from(self.segment_length))
    }

    /// Number of symbols stored in the final segment (0 for an empty stream)
    #[must_use]
    pub fn last_segment_length(&self) -> usize {
        match self.segment_count() {
            0 => 0,
            n => (self.total_length - (n - 1) * u64::from(self.segment_length)) as usize,
        }
    }

    /// Number of symbols stored in the segment at `index`
    #[must_use]
    pub fn segment_length_at(&self, index: u64) -> usize {
        if index + 1 == self.segment_count() {
            self.last_segment_length()
        } else {
            usize::from(self.segment_length)
        }
    }

    /// Expected size in bytes of the full stream, header included
    ///
    /// Returns `None` when the declared length implies a stream larger than `u64::MAX`
    /// bytes, which a parsed header can claim.
    #[must_use]
    pub fn stream_size(&self) -> Option<u64> {
        self.segment_count()
            .checked_mul(self.bit_width.bytes() as u64)?
            .checked_add(SIZE_HEADER as u64)
    }

    /// Parses a header from a fixed-size byte array
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The bit width is not 16, 32 or 64
    /// * The segment length is zero or exceeds the capacity of the bit width
    pub fn from_bytes(buffer: &[u8; SIZE_HEADER]) -> Result<Self> {
        let bit_width = BitWidth::from_bits(buffer[0])?;
        let total_length = LittleEndian::read_u64(&buffer[1..9]);
        let segment_length = buffer[9];
        let max = codec::max_length(bit_width);
        if segment_length == 0 || usize::from(segment_length) > max {
            return Err(HeaderError::InvalidSegmentLength {
                found: segment_length,
                max,
            }
            .into());
        }
        Ok(Self {
            bit_width,
            total_length,
            segment_length,
        })
    }

    /// Parses a header from the beginning of an arbitrarily sized buffer
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < SIZE_HEADER {
            return Err(HeaderError::InvalidSize(buffer.len(), SIZE_HEADER).into());
        }
        let mut bytes = [0u8; SIZE_HEADER];
        bytes.copy_from_slice(&buffer[..SIZE_HEADER]);
        Self::from_bytes(&bytes)
    }

    /// Writes the header to a writer
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buffer = [0u8; SIZE_HEADER];
        buffer[0] = self.bit_width.bits();
        LittleEndian::write_u64(&mut buffer[1..9], self.total_length);
        buffer[9] = self.segment_length;
        writer.write_all(&buffer)?;
        Ok(())
    }

    /// Reads exactly `SIZE_HEADER` bytes from a reader and parses them
    ///
    /// A source holding fewer bytes than a header fails with [`HeaderError::InvalidSize`].
    /// The number of bytes actually available is not known after a short read, so it
    /// is reported as 0.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_HEADER];
        match reader.read_exact(&mut buffer) {
            Ok(()) => Self::from_bytes(&buffer),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(HeaderError::InvalidSize(0, SIZE_HEADER).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::Error;

    #[test]
    fn test_segment_arithmetic() {
        let header = StreamHeader::new(BitWidth::U16, 9);
        assert_eq!(header.segment_length, 8);
        assert_eq!(header.segment_count(), 2);
        assert_eq!(header.last_segment_length(), 1);
        assert_eq!(header.segment_length_at(0), 8);
        assert_eq!(header.segment_length_at(1), 1);
        assert_eq!(header.stream_size(), Some(14));
    }

    #[test]
    fn test_exact_multiple() {
        let header = StreamHeader::new(BitWidth::U32, 48);
        assert_eq!(header.segment_count(), 3);
        assert_eq!(header.last_segment_length(), 16);
    }

    #[test]
    fn test_empty_stream() {
        let header = StreamHeader::new(BitWidth::U64, 0);
        assert_eq!(header.segment_count(), 0);
        assert_eq!(header.last_segment_length(), 0);
        assert_eq!(header.stream_size(), Some(SIZE_HEADER as u64));
    }

    #[test]
    fn test_layout() -> Result<()> {
        let header = StreamHeader::new(BitWidth::U16, 9);
        let mut bytes = Vec::new();
        header.write_bytes(&mut bytes)?;
        assert_eq!(bytes, [16, 9, 0, 0, 0, 0, 0, 0, 0, 8]);
        assert_eq!(StreamHeader::from_buffer(&bytes)?, header);
        Ok(())
    }

    #[test]
    fn test_unsupported_bit_width() {
        let bytes = [24, 1, 0, 0, 0, 0, 0, 0, 0, 8];
        assert!(matches!(
            StreamHeader::from_buffer(&bytes),
            Err(Error::HeaderError(HeaderError::UnsupportedBitWidth(24)))
        ));
    }

    #[test]
    fn test_invalid_segment_length() {
        let too_long = [16, 1, 0, 0, 0, 0, 0, 0, 0, 9];
        let zero = [64, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        for bytes in [too_long, zero] {
            assert!(matches!(
                StreamHeader::from_buffer(&bytes),
                Err(Error::HeaderError(HeaderError::InvalidSegmentLength { .. }))
            ));
        }
    }

    #[test]
    fn test_stream_size_overflow() -> Result<()> {
        let bytes = [64, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 1];
        let header = StreamHeader::from_buffer(&bytes)?;
        assert_eq!(header.total_length, u64::MAX);
        assert_eq!(header.segment_count(), u64::MAX);
        assert_eq!(header.stream_size(), None);

        // Largest declared length at full capacity still fits
        let header = StreamHeader::new(BitWidth::U64, u64::MAX);
        assert_eq!(
            header.stream_size(),
            Some(SIZE_HEADER as u64 + u64::MAX.div_ceil(32) * 8)
        );
        Ok(())
    }

    #[test]
    fn test_truncated_header() {
        for bytes in [&[64u8, 1, 0][..], &[][..]] {
            assert!(matches!(
                StreamHeader::from_reader(&mut &bytes[..]),
                Err(Error::HeaderError(HeaderError::InvalidSize(_, SIZE_HEADER)))
            ));
        }
    }
}
