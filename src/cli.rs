use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use nucpack::{BitWidth, Strand};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack the sequences of a FASTQ file into a single stream
    Compress {
        /// Input FASTQ file path (may be gzip/bzip2/xz compressed)
        #[clap(value_parser)]
        input: PathBuf,

        /// Output file path
        #[clap(value_parser)]
        output: PathBuf,

        /// Integer width of one segment (16, 32 or 64)
        #[clap(short, long, default_value_t = BitWidth::U64, value_parser = parse_bit_width)]
        bit_width: BitWidth,

        /// Use the RNA alphabet (ACGU) instead of DNA (ACGT)
        #[clap(long, value_parser)]
        rna: bool,
    },
    /// Unpack a stream and print its sequence
    Decompress {
        /// Input stream path
        #[clap(value_parser)]
        input: PathBuf,

        /// Decode with the RNA alphabet (ACGU) instead of DNA (ACGT)
        #[clap(long, value_parser)]
        rna: bool,

        /// Decode incrementally, this many symbols at a time
        #[clap(short, long, value_parser)]
        chunk: Option<usize>,
    },
    /// Print the header of a stream
    Inspect {
        /// Input stream path
        #[clap(value_parser)]
        input: PathBuf,
    },
}

fn parse_bit_width(value: &str) -> Result<BitWidth, String> {
    let bits: u8 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    BitWidth::from_bits(bits).map_err(|e| e.to_string())
}

#[must_use]
pub fn strand(rna: bool) -> Strand {
    if rna {
        Strand::Rna
    } else {
        Strand::Dna
    }
}
