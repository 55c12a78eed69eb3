//! FASTQ record source
//!
//! Thin adapter over [`seq_io`] that hands out owned `(sequence, quality)` pairs.
//! A record whose sequence and quality lengths differ is reported as
//! [`FastqError::LengthMismatch`] so callers can skip it. The parser does not resume
//! after a malformed record, so [`FastqSource::halted`] tells callers whether the
//! input ended there rather than at end of file.

use std::io::Read;

use seq_io::fastq::{self, Reader, Record};

use crate::error::{FastqError, Result};

/// Sequence and quality lines of one FASTQ record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqPair {
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

pub struct FastqSource<R: Read> {
    inner: Reader<R>,
    n_processed: usize,
    halted: bool,
}
impl<R: Read> FastqSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: Reader::new(reader),
            n_processed: 0,
            halted: false,
        }
    }

    /// Returns the next record, or `None` once the input is exhausted
    pub fn next_record(&mut self) -> Option<Result<FastqPair>> {
        let record = match self.inner.next()? {
            Ok(record) => record,
            Err(fastq::Error::UnequalLengths { seq, qual, .. }) => {
                self.n_processed += 1;
                self.halted = true;
                return Some(Err(FastqError::LengthMismatch {
                    sequence: seq,
                    quality: qual,
                }
                .into()));
            }
            Err(e) => {
                self.halted = true;
                return Some(Err(FastqError::from(e).into()));
            }
        };
        self.n_processed += 1;
        Some(Ok(FastqPair {
            sequence: record.seq().to_vec(),
            quality: record.qual().to_vec(),
        }))
    }

    /// Returns true if parsing stopped at a malformed record instead of end of input
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Number of records parsed so far, malformed ones with a readable header included
    pub fn n_processed(&self) -> usize {
        self.n_processed
    }
}
