//! Segment writer module
//!
//! This module provides the writing half of the packed stream format:
//! - Header emission at construction time
//! - Buffering of arbitrarily sized symbol chunks into fixed-size segments
//! - Flushing of the final, possibly shorter, segment on close

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, trace};

use crate::{
    alphabet::{self, Strand},
    codec::{self, BitWidth},
    error::{Result, WriteError},
    queue::SymbolQueue,
    StreamHeader,
};

/// Default capacity of the `BufWriter` created by the builder and [`SegmentWriter::create`]
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Writes one encoded segment to a writer in little-endian format
///
/// The value is stored in `width / 8` bytes; callers guarantee it fits.
pub fn write_segment<W: Write>(writer: &mut W, width: BitWidth, value: u64) -> Result<()> {
    match width {
        BitWidth::U16 => writer.write_u16::<LittleEndian>(value as u16)?,
        BitWidth::U32 => writer.write_u32::<LittleEndian>(value as u32)?,
        BitWidth::U64 => writer.write_u64::<LittleEndian>(value)?,
    }
    Ok(())
}

/// Builder for creating configured `SegmentWriter` instances
///
/// # Examples
///
/// ```
/// # use nucpack::{BitWidth, Result, SegmentWriterBuilder, Strand};
/// # fn main() -> Result<()> {
/// let mut writer = SegmentWriterBuilder::default()
///     .bit_width(BitWidth::U16)
///     .strand(Strand::Rna)
///     .total_length(4)
///     .build(Vec::new())?;
/// writer.write(b"ACGU")?;
/// let bytes = writer.close()?;
/// assert_eq!(bytes.len(), 12);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SegmentWriterBuilder {
    /// Optional segment integer width (defaults to 64 bits)
    bit_width: Option<BitWidth>,
    /// Optional alphabet (defaults to DNA)
    strand: Option<Strand>,
    /// Required number of symbols the stream will hold
    total_length: Option<u64>,
    /// Optional buffer capacity for [`Self::build_buffered`]
    buffer_capacity: Option<usize>,
}
impl SegmentWriterBuilder {
    #[must_use]
    pub fn bit_width(mut self, bit_width: BitWidth) -> Self {
        self.bit_width = Some(bit_width);
        self
    }

    #[must_use]
    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    #[must_use]
    pub fn total_length(mut self, total_length: u64) -> Self {
        self.total_length = Some(total_length);
        self
    }

    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    pub fn build<W: Write>(self, inner: W) -> Result<SegmentWriter<W>> {
        let Some(total_length) = self.total_length else {
            return Err(WriteError::MissingTotalLength.into());
        };
        SegmentWriter::new(
            inner,
            self.bit_width.unwrap_or_default(),
            total_length,
            self.strand.unwrap_or_default(),
        )
    }

    /// Builds a writer on top of a `BufWriter` of the configured capacity
    pub fn build_buffered<W: Write>(self, inner: W) -> Result<SegmentWriter<BufWriter<W>>> {
        let capacity = self.buffer_capacity.unwrap_or(DEFAULT_BUFFER_CAPACITY);
        self.build(BufWriter::with_capacity(capacity, inner))
    }
}

/// Writer for packed nucleotide streams
///
/// The header is written as soon as the writer is created. Symbols are accepted in
/// chunks of any size; every time `segment_length` symbols have accumulated they are
/// encoded and written as one integer. [`SegmentWriter::close`] writes the remaining
/// symbols as the final segment and must be called once all data has been written.
pub struct SegmentWriter<W: Write> {
    /// The underlying writer for output
    inner: W,

    /// Header written at the start of the stream
    header: StreamHeader,

    /// Alphabet used to encode symbols
    strand: Strand,

    /// Symbols that do not yet form a full segment
    buffer: SymbolQueue,

    /// Reusable scratch space for the symbols of the segment being encoded
    segment: Vec<u8>,

    /// Number of symbols accepted so far
    symbols_written: u64,

    /// Number of segments written so far
    segments_written: u64,
}
impl<W: Write> SegmentWriter<W> {
    /// Creates a writer and immediately writes the stream header
    ///
    /// The segment length is the full capacity of `bit_width`. If the header cannot be
    /// written no writer is returned.
    pub fn new(mut inner: W, bit_width: BitWidth, total_length: u64, strand: Strand) -> Result<Self> {
        let header = StreamHeader::new(bit_width, total_length);
        header.write_bytes(&mut inner)?;
        debug!("Wrote stream header: {header:?}");

        let segment_length = usize::from(header.segment_length);
        Ok(Self {
            inner,
            header,
            strand,
            buffer: SymbolQueue::new(segment_length),
            segment: Vec::with_capacity(segment_length),
            symbols_written: 0,
            segments_written: 0,
        })
    }

    /// Appends `symbols` to the stream
    ///
    /// The whole chunk is validated before anything is buffered, so a chunk holding an
    /// invalid symbol or overrunning the declared total leaves the stream untouched.
    pub fn write(&mut self, symbols: &[u8]) -> Result<()> {
        alphabet::validate(symbols, self.strand)?;
        let got = self.symbols_written + symbols.len() as u64;
        if got > self.header.total_length {
            return Err(WriteError::LengthExceeded {
                expected: self.header.total_length,
                got,
            }
            .into());
        }

        let mut rest = symbols;
        while !rest.is_empty() {
            let taken = self.buffer.push_many(rest);
            rest = &rest[taken..];
            self.symbols_written += taken as u64;
            if self.buffer.is_full() {
                self.write_buffered_segment()?;
            }
        }
        Ok(())
    }

    /// Encodes the buffered symbols as one segment and writes it
    fn write_buffered_segment(&mut self) -> Result<()> {
        self.segment.clear();
        self.buffer.drain_into(&mut self.segment);
        let value = codec::encode(&self.segment, self.strand)?;
        write_segment(&mut self.inner, self.header.bit_width, value)?;
        trace!(
            "Wrote segment {} ({} symbols)",
            self.segments_written,
            self.segment.len()
        );
        self.segments_written += 1;
        Ok(())
    }

    /// Writes the final partial segment, flushes, and returns the inner writer
    ///
    /// # Errors
    ///
    /// Besides I/O failures, returns [`WriteError::IncompleteSequence`] when fewer
    /// symbols were written than the header declares. Everything written up to that
    /// point has been flushed when this error is returned.
    pub fn close(mut self) -> Result<W> {
        if !self.buffer.is_empty() {
            self.write_buffered_segment()?;
        }
        self.inner.flush()?;
        debug!(
            "Closed stream after {} symbols in {} segments",
            self.symbols_written, self.segments_written
        );

        if self.symbols_written != self.header.total_length {
            return Err(WriteError::IncompleteSequence {
                expected: self.header.total_length,
                got: self.symbols_written,
            }
            .into());
        }
        Ok(self.inner)
    }

    pub fn header(&self) -> StreamHeader {
        self.header
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Number of symbols accepted so far, buffered ones included
    pub fn symbols_written(&self) -> u64 {
        self.symbols_written
    }

    /// Number of symbols waiting for their segment to fill
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl SegmentWriter<BufWriter<File>> {
    /// Creates the file at `path` and writes the stream header to it
    pub fn create<P: AsRef<Path>>(
        path: P,
        bit_width: BitWidth,
        total_length: u64,
        strand: Strand,
    ) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(
            BufWriter::with_capacity(DEFAULT_BUFFER_CAPACITY, file),
            bit_width,
            total_length,
            strand,
        )
    }
}
