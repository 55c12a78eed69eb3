//! # nucpack
//!
//! Lossless 2-bit packing of nucleotide sequences.
//!
//! Each symbol of a DNA (`ACGT`) or RNA (`ACGU`) sequence is mapped to a 2-bit code and
//! runs of symbols are stored as base-4 numerals in fixed-width unsigned integers
//! (16, 32 or 64 bits). A stream is a 10 byte [`StreamHeader`] followed by the
//! segments, each holding `segment_length` symbols except possibly the last.
//!
//! [`SegmentWriter`] accepts symbols in chunks of any size and [`SegmentReader`] serves
//! reads of any size, independently of where segment boundaries fall.
//!
//! ```
//! use nucpack::{BitWidth, Result, SegmentReader, SegmentWriter, Strand};
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let mut writer = SegmentWriter::new(Vec::new(), BitWidth::U32, 20, Strand::Dna)?;
//!     writer.write(b"ACGTACGTAC")?;
//!     writer.write(b"GTACGTACGT")?;
//!     let bytes = writer.close()?;
//!
//!     let mut reader = SegmentReader::new(Cursor::new(bytes), Strand::Dna)?;
//!     while let Some(chunk) = reader.read(7)? {
//!         assert!(chunk.len() <= 7);
//!     }
//!     assert_eq!(reader.read_all()?, b"ACGTACGTACGTACGTACGT");
//!     Ok(())
//! }
//! ```

pub mod alphabet;
pub mod codec;
mod error;
pub mod fastq;
mod header;
mod queue;
mod reader;
mod writer;

pub use alphabet::Strand;
pub use codec::BitWidth;
pub use error::{CodecError, Error, FastqError, HeaderError, ReadError, Result, WriteError};
pub use header::{StreamHeader, SIZE_HEADER};
pub use reader::SegmentReader;
pub use writer::{write_segment, SegmentWriter, SegmentWriterBuilder, DEFAULT_BUFFER_CAPACITY};
