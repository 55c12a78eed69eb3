//! Segment reader module
//!
//! Segments are decoded strictly in order, one at a time, as reads require them.
//! Reads may ask for any number of symbols: the tail of a segment that a read did
//! not need is kept in a carry-over queue and served first by the next read.

use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read, Seek, SeekFrom},
    path::Path,
};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, trace};

use crate::{
    alphabet::Strand,
    codec::{self, BitWidth},
    error::{ReadError, Result},
    queue::SymbolQueue,
    StreamHeader, SIZE_HEADER,
};

/// Reader for packed nucleotide streams
///
/// # Examples
///
/// ```
/// # use nucpack::{BitWidth, Result, SegmentReader, SegmentWriter, Strand};
/// # use std::io::Cursor;
/// # fn main() -> Result<()> {
/// let mut writer = SegmentWriter::new(Vec::new(), BitWidth::U16, 9, Strand::Dna)?;
/// writer.write(b"ACGTACGTA")?;
/// let bytes = writer.close()?;
///
/// let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
/// assert_eq!(reader.read(5)?.as_deref(), Some(&b"ACGTA"[..]));
/// assert_eq!(reader.read(10)?.as_deref(), Some(&b"CGTA"[..]));
/// assert_eq!(reader.read(1)?, None);
/// assert_eq!(reader.read_all()?, b"ACGTACGTA");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SegmentReader<R: Read> {
    /// The underlying source
    inner: R,

    /// Header parsed when the reader was created
    header: StreamHeader,

    /// Alphabet used to decode symbols
    strand: Strand,

    /// Decoded symbols not yet delivered to the caller
    carry: SymbolQueue,

    /// Symbols taken by a read that then failed, served again by the next read
    recovered: Vec<u8>,

    /// Reusable buffer holding the most recently decoded segment
    segment: Vec<u8>,

    /// Number of segments decoded so far
    segments_read: u64,

    /// Number of symbols decoded so far, including those still in `carry`
    symbols_decoded: u64,
}
impl<R: Read> SegmentReader<R> {
    /// Creates a reader and parses the stream header from `inner`
    ///
    /// The header must start at the current position of `inner`.
    pub fn new(mut inner: R, strand: Strand) -> Result<Self> {
        let header = StreamHeader::from_reader(&mut inner)?;
        debug!(
            "Read stream header: {header:?} ({} segments)",
            header.segment_count()
        );

        let segment_length = usize::from(header.segment_length);
        Ok(Self {
            inner,
            header,
            strand,
            carry: SymbolQueue::new(segment_length),
            recovered: Vec::new(),
            segment: Vec::with_capacity(segment_length),
            segments_read: 0,
            symbols_decoded: 0,
        })
    }

    /// Reads the raw integer of the next segment
    fn next_value(&mut self) -> Result<u64> {
        let value = match self.header.bit_width {
            BitWidth::U16 => self.inner.read_u16::<LittleEndian>().map(u64::from),
            BitWidth::U32 => self.inner.read_u32::<LittleEndian>().map(u64::from),
            BitWidth::U64 => self.inner.read_u64::<LittleEndian>(),
        };
        match value {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(ReadError::TruncatedStream {
                segment: self.segments_read,
                expected_bytes: self.header.bit_width.bytes(),
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Decodes the next segment into the internal segment buffer
    ///
    /// Returns the number of symbols decoded, or `None` once every segment declared by
    /// the header has been consumed.
    fn next_segment(&mut self) -> Result<Option<usize>> {
        if self.segments_read == self.header.segment_count() {
            return Ok(None);
        }

        let length = self.header.segment_length_at(self.segments_read);
        let value = self.next_value()?;
        if !codec::fits(value, length) {
            return Err(ReadError::InvalidSegmentValue {
                segment: self.segments_read,
                value,
                length,
            }
            .into());
        }

        self.segment.clear();
        codec::decode_into(value, length, self.strand, &mut self.segment);
        trace!("Decoded segment {} ({length} symbols)", self.segments_read);

        self.segments_read += 1;
        self.symbols_decoded += length as u64;
        Ok(Some(length))
    }

    /// Appends up to `k` symbols to `out`
    ///
    /// Returns the number of symbols appended, which is below `k` only when the stream
    /// ends first. Returns `None` if every symbol has already been delivered. A request
    /// for zero symbols always returns `Some(0)` and leaves the reader untouched.
    ///
    /// If decoding a segment fails, `out` is left as it was and the symbols this call
    /// had already taken are kept back, so the next read starts with them and
    /// [`Self::symbols_delivered`] does not count them.
    pub fn read_into(&mut self, k: usize, out: &mut Vec<u8>) -> Result<Option<usize>> {
        if k == 0 {
            return Ok(Some(0));
        }
        if self.is_finished() {
            return Ok(None);
        }

        let pending = self.recovered.len() + self.carry.len();
        let available = pending as u64 + (self.header.total_length - self.symbols_decoded);
        let target = (k as u64).min(available) as usize;
        let start = out.len();

        let from_recovered = target.min(self.recovered.len());
        out.extend(self.recovered.drain(..from_recovered));
        let from_carry = (target - from_recovered).min(self.carry.len());
        self.carry.pop_many(from_carry, out);

        let mut delivered = from_recovered + from_carry;
        while delivered < target {
            let length = match self.next_segment() {
                Ok(Some(length)) => length,
                Ok(None) => break,
                Err(e) => {
                    // The carry is empty here: leftovers are only queued by the last segment
                    self.recovered.extend(out.drain(start..));
                    return Err(e);
                }
            };
            let used = (target - delivered).min(length);
            out.extend_from_slice(&self.segment[..used]);
            self.carry.push_many(&self.segment[used..]);
            delivered += used;
        }
        Ok(Some(delivered))
    }

    /// Reads up to `k` symbols
    ///
    /// Returns `None` once every symbol has been delivered. See [`Self::read_into`].
    pub fn read(&mut self, k: usize) -> Result<Option<Vec<u8>>> {
        let mut out = Vec::new();
        Ok(self.read_into(k, &mut out)?.map(|_| out))
    }

    pub fn header(&self) -> StreamHeader {
        self.header
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Number of symbols handed out to the caller so far
    pub fn symbols_delivered(&self) -> u64 {
        self.symbols_decoded - (self.carry.len() + self.recovered.len()) as u64
    }

    /// Number of symbols left before the end of the stream
    pub fn symbols_remaining(&self) -> u64 {
        self.header.total_length - self.symbols_delivered()
    }

    /// Returns true once every symbol declared by the header has been delivered
    pub fn is_finished(&self) -> bool {
        self.symbols_remaining() == 0
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> SegmentReader<R> {
    /// Rewinds to the first segment and forgets all buffered symbols
    ///
    /// The header is assumed to start at offset 0 of the source.
    pub fn reset(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(SIZE_HEADER as u64))?;
        self.carry.clear();
        self.recovered.clear();
        self.segment.clear();
        self.segments_read = 0;
        self.symbols_decoded = 0;
        debug!("Reset reader to the first segment");
        Ok(())
    }

    /// Decodes the whole stream from the first segment
    ///
    /// Any progress made by earlier [`Self::read`] calls is discarded. Once this returns
    /// the reader is positioned at the end of the stream.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.reset()?;
        let mut out = Vec::new();
        while self.next_segment()?.is_some() {
            out.extend_from_slice(&self.segment);
        }
        Ok(out)
    }
}

impl SegmentReader<BufReader<File>> {
    /// Opens the file at `path` and parses its header
    pub fn open<P: AsRef<Path>>(path: P, strand: Strand) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file), strand)
    }
}

#[cfg(test)]
mod testing {
    use std::io::Cursor;

    use byteorder::WriteBytesExt;

    use super::*;
    use crate::{Error, SegmentWriter};

    fn packed(sequence: &[u8], bit_width: BitWidth, strand: Strand) -> Result<Vec<u8>> {
        let mut writer = SegmentWriter::new(Vec::new(), bit_width, sequence.len() as u64, strand)?;
        writer.write(sequence)?;
        writer.close()
    }

    #[test]
    fn test_read_zero_has_no_side_effects() -> Result<()> {
        let bytes = packed(b"ACGTACGTA", BitWidth::U16, Strand::Dna)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
        assert_eq!(reader.read(0)?, Some(Vec::new()));
        assert_eq!(reader.symbols_delivered(), 0);
        assert_eq!(reader.read(3)?.as_deref(), Some(&b"ACG"[..]));
        assert_eq!(reader.read(0)?, Some(Vec::new()));
        assert_eq!(reader.symbols_delivered(), 3);
        Ok(())
    }

    #[test]
    fn test_read_truncated_by_end_of_sequence() -> Result<()> {
        let bytes = packed(b"GATTACA", BitWidth::U32, Strand::Dna)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
        assert_eq!(reader.read(100)?.as_deref(), Some(&b"GATTACA"[..]));
        assert!(reader.is_finished());
        assert_eq!(reader.read(1)?, None);
        assert_eq!(reader.read(0)?, Some(Vec::new()));
        Ok(())
    }

    #[test]
    fn test_carry_over_spans_segments() -> Result<()> {
        let sequence = b"ACGTACGTTTGGCCAAG";
        let bytes = packed(sequence, BitWidth::U16, Strand::Dna)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;

        let mut out = Vec::new();
        assert_eq!(reader.read_into(5, &mut out)?, Some(5));
        assert_eq!(reader.symbols_remaining(), 12);
        assert_eq!(reader.read_into(6, &mut out)?, Some(6));
        assert_eq!(reader.read_into(6, &mut out)?, Some(6));
        assert_eq!(reader.read_into(6, &mut out)?, None);
        assert_eq!(out, sequence);
        Ok(())
    }

    #[test]
    fn test_read_all_after_partial_reads() -> Result<()> {
        let sequence = b"CCCCGGGGAAAATTTTC";
        let bytes = packed(sequence, BitWidth::U16, Strand::Dna)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
        reader.read(11)?;
        assert_eq!(reader.read_all()?, sequence);
        assert!(reader.is_finished());

        reader.reset()?;
        assert_eq!(reader.read(17)?.as_deref(), Some(&sequence[..]));
        Ok(())
    }

    #[test]
    fn test_truncated_stream() -> Result<()> {
        let mut bytes = packed(b"ACGTACGTACGTACGTAC", BitWidth::U16, Strand::Dna)?;
        bytes.truncate(bytes.len() - 1);
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;

        let mut out = b"GG".to_vec();
        let err = reader.read_into(18, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::ReadError(ReadError::TruncatedStream {
                segment: 2,
                expected_bytes: 2
            })
        ));
        assert_eq!(out, b"GG");
        assert_eq!(reader.symbols_delivered(), 0);

        // The decoded segments are still available to a smaller read
        assert_eq!(reader.read_into(16, &mut out)?, Some(16));
        assert_eq!(out, b"GGACGTACGTACGTACGT");
        assert_eq!(reader.symbols_remaining(), 2);
        Ok(())
    }

    #[test]
    fn test_failed_read_keeps_delivered_count() -> Result<()> {
        let mut bytes = packed(b"ACGTACGTTTGGCCAAG", BitWidth::U16, Strand::Dna)?;
        bytes.truncate(bytes.len() - 1);
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;

        assert_eq!(reader.read(3)?.as_deref(), Some(&b"ACG"[..]));
        assert!(matches!(
            reader.read(20),
            Err(Error::ReadError(ReadError::TruncatedStream { segment: 2, .. }))
        ));
        assert_eq!(reader.symbols_delivered(), 3);
        assert_eq!(reader.symbols_remaining(), 14);

        assert_eq!(reader.read(13)?.as_deref(), Some(&b"TACGTTTGGCCAA"[..]));
        assert_eq!(reader.symbols_delivered(), 16);
        assert!(matches!(
            reader.read(1),
            Err(Error::ReadError(ReadError::TruncatedStream { segment: 2, .. }))
        ));
        assert_eq!(reader.symbols_delivered(), 16);
        Ok(())
    }

    #[test]
    fn test_oversized_segment_value() -> Result<()> {
        let mut bytes = Vec::new();
        StreamHeader::new(BitWidth::U16, 2).write_bytes(&mut bytes)?;
        bytes.write_u16::<LittleEndian>(0b1_00_00)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
        assert!(matches!(
            reader.read(2),
            Err(Error::ReadError(ReadError::InvalidSegmentValue { length: 2, .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_shorter_segment_length_in_header() -> Result<()> {
        // Segments of 4 symbols stored in 16-bit integers
        let mut bytes: Vec<u8> = vec![16, 6, 0, 0, 0, 0, 0, 0, 0, 4];
        bytes.write_u16::<LittleEndian>(0b00_01_10_11)?;
        bytes.write_u16::<LittleEndian>(0b11_10)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
        assert_eq!(reader.read_all()?, b"ACGTTG");
        Ok(())
    }

    #[test]
    fn test_rna_strand() -> Result<()> {
        let bytes = packed(b"UUAGCU", BitWidth::U64, Strand::Rna)?;
        let mut reader = SegmentReader::new(Cursor::new(bytes.clone()), Strand::Rna)?;
        assert_eq!(reader.read_all()?, b"UUAGCU");

        // The header does not record the strand; decoding as DNA yields T for code 3
        let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
        assert_eq!(reader.read_all()?, b"TTAGCT");
        Ok(())
    }

    #[test]
    fn test_from_path() -> Result<()> {
        let path = "test_segment_reader_from_path.file";
        let mut writer = SegmentWriter::create(path, BitWidth::U32, 20, Strand::Dna)?;
        writer.write(&b"ACGTA".repeat(4))?;
        writer.close()?;

        let mut reader = SegmentReader::open(path, Strand::Dna)?;
        assert_eq!(reader.read_all()?, b"ACGTA".repeat(4));
        std::fs::remove_file(path)?;
        Ok(())
    }
}
