use crate::Strand;

/// Custom Result type for nucpack operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the nucpack library, encompassing all possible error cases
/// that can occur while packing or unpacking nucleotide streams.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors raised while converting between symbols and integers
    CodecError(#[from] CodecError),
    /// Errors related to stream header processing
    HeaderError(#[from] HeaderError),
    /// Errors that occur during read operations
    ReadError(#[from] ReadError),
    /// Errors that occur during write operations
    WriteError(#[from] WriteError),
    /// Errors raised by the FASTQ adapter
    FastqError(#[from] FastqError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
}

/// Errors raised by the alphabet and the base-4 codec
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// A character outside the active strand's alphabet was found
    ///
    /// # Fields
    /// * `symbol` - The offending character
    /// * `strand` - The strand whose alphabet was used
    #[error("Invalid {strand} symbol: {symbol:?}")]
    InvalidSymbol { symbol: char, strand: Strand },

    /// A zero-length pattern was passed to the encoder
    #[error("Cannot encode an empty pattern")]
    EmptyPattern,

    /// The pattern does not fit into the widest supported integer
    ///
    /// # Arguments
    /// * `usize` - The length of the rejected pattern
    #[error("Pattern of length {0} does not fit into 64 bits")]
    PatternTooLong(usize),
}

/// Errors specific to processing and validating stream headers
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    /// The bit width is not one of 16, 32 or 64
    ///
    /// # Arguments
    /// * `u8` - The unsupported bit width that was found
    #[error("Unsupported bit width: {0}")]
    UnsupportedBitWidth(u8),

    /// The segment length is zero or too large for the bit width
    #[error("Invalid segment length: {found} (maximum for this bit width is {max})")]
    InvalidSegmentLength { found: u8, max: usize },

    /// The size of the data does not match what a header requires
    ///
    /// # Arguments
    /// * First `usize` - The actual number of bytes provided
    /// * Second `usize` - The expected number of bytes
    #[error("Invalid number of bytes provided: {0}. Expected: {1}")]
    InvalidSize(usize, usize),
}

/// Errors that can occur while reading segment data
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The stream ended before all declared segments were read
    #[error("Stream truncated at segment {segment}: expected {expected_bytes} more bytes")]
    TruncatedStream { segment: u64, expected_bytes: usize },

    /// A stored integer holds more symbols than its segment allows
    #[error("Segment {segment} value {value:#x} does not fit into {length} symbols")]
    InvalidSegmentValue { segment: u64, value: u64, length: usize },
}

/// Errors that can occur while writing segment data
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// Attempted to build a writer without declaring the total sequence length
    #[error("Missing total sequence length in writer builder")]
    MissingTotalLength,

    /// More symbols were written than declared in the header
    #[error("Writing {got} symbols would exceed the declared total of {expected}")]
    LengthExceeded { expected: u64, got: u64 },

    /// The writer was closed before the declared number of symbols was written
    #[error("Stream closed after {got} symbols, but the header declares {expected}")]
    IncompleteSequence { expected: u64, got: u64 },
}

/// Errors raised while pulling records out of a FASTQ file
#[derive(thiserror::Error, Debug)]
pub enum FastqError {
    /// The underlying parser rejected a record
    #[error("Malformed FASTQ record: {0}")]
    Parse(#[from] seq_io::fastq::Error),

    /// A record's sequence and quality lines have different lengths
    #[error("Sequence and quality lengths differ ({sequence} vs {quality})")]
    LengthMismatch { sequence: usize, quality: usize },
}
