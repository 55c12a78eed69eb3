use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use nucpack::{
    alphabet, fastq::FastqSource, BitWidth, FastqError, SegmentReader, SegmentWriter, Strand,
};

use crate::cli::{strand, Cli, Commands};
use crate::logging::init_logging;

mod cli;
mod logging;

/// Calls `f` with the sequence of every usable record in the FASTQ file at `path`
///
/// Records whose sequence holds symbols outside the alphabet, or whose quality line
/// length differs from the sequence, are logged and skipped. Parsing ends at a length
/// mismatch, so the records after it are not read. Returns the number of skipped
/// records.
fn for_each_sequence<F>(path: &Path, strand: Strand, mut f: F) -> Result<usize>
where
    F: FnMut(&[u8]) -> Result<()>,
{
    let (handle, _format) = niffler::from_path(path)?;
    let mut source = FastqSource::new(handle);
    let mut skipped = 0;
    while let Some(record) = source.next_record() {
        let pair = match record {
            Ok(pair) => pair,
            Err(nucpack::Error::FastqError(e @ FastqError::LengthMismatch { .. })) => {
                warn!("Skipping record {}: {e}", source.n_processed());
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = alphabet::validate(&pair.sequence, strand) {
            warn!("Skipping record {}: {e}", source.n_processed());
            skipped += 1;
            continue;
        }
        f(&pair.sequence)?;
    }
    if source.halted() {
        warn!(
            "Stopped reading {} after record {}; the records following it were not read",
            path.display(),
            source.n_processed()
        );
    }
    Ok(skipped)
}

fn compress(input: &Path, output: &Path, bit_width: BitWidth, strand: Strand) -> Result<()> {
    // First pass: the header needs the total length before any segment is written
    let mut total_length = 0u64;
    let mut num_records = 0usize;
    let skipped = for_each_sequence(input, strand, |sequence| {
        total_length += sequence.len() as u64;
        num_records += 1;
        Ok(())
    })?;
    info!("Found {num_records} records ({total_length} symbols), skipped {skipped}");

    let mut writer = SegmentWriter::create(output, bit_width, total_length, strand)?;
    for_each_sequence(input, strand, |sequence| Ok(writer.write(sequence)?))?;
    writer.close()?;

    info!("Finished writing {total_length} symbols to {}", output.display());
    Ok(())
}

fn decompress(input: &Path, strand: Strand, chunk: Option<usize>) -> Result<()> {
    let mut reader = SegmentReader::open(input, strand)?;
    let mut out = BufWriter::new(io::stdout().lock());
    match chunk {
        Some(k) => {
            let mut buffer = Vec::with_capacity(k);
            while reader.read_into(k, &mut buffer)?.is_some() {
                out.write_all(&buffer)?;
                buffer.clear();
            }
        }
        None => out.write_all(&reader.read_all()?)?,
    }
    writeln!(out)?;
    out.flush()?;

    info!("Finished reading {} symbols", reader.symbols_delivered());
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let reader = SegmentReader::open(input, Strand::Dna)?;
    let header = reader.header();
    println!("bit width:        {}", header.bit_width);
    println!("total length:     {}", header.total_length);
    println!("segment length:   {}", header.segment_length);
    println!("segments:         {}", header.segment_count());
    println!("last segment:     {}", header.last_segment_length());
    match header.stream_size() {
        Some(size) => println!("expected size:    {size} bytes"),
        None => println!("expected size:    exceeds u64::MAX bytes"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Compress {
            input,
            output,
            bit_width,
            rna,
        } => compress(input, output, *bit_width, strand(*rna))
            .with_context(|| format!("Failed to compress {}", input.display()))?,
        Commands::Decompress { input, rna, chunk } => decompress(input, strand(*rna), *chunk)
            .with_context(|| format!("Failed to decompress {}", input.display()))?,
        Commands::Inspect { input } => {
            inspect(input).with_context(|| format!("Failed to inspect {}", input.display()))?;
        }
    }

    Ok(())
}
