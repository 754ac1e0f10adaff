//! atlas CLI
//!
//! Command-line interface for extracting and rewriting locus segments from
//! multi-record FASTA files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{ArgGroup, Parser};

use atlas_writer::cli::{
    build_output_record, format_segment_list, output_error, output_record, OutputFormat,
};
use atlas_writer::expr::TransformSpec;
use atlas_writer::fasta::read_fasta;
use atlas_writer::pipeline;
use atlas_writer::segment::SegmentTable;
use atlas_writer::select::parse_selection;
use atlas_writer::{AtlasError, Result};

#[derive(Parser)]
#[command(name = "atlas")]
#[command(author, version, about = "Extract and rewrite locus segments from FASTA files")]
#[command(
    long_about = "Combine selected locus segments from a FASTA file into a single sequence,
with optional alt-start trimming, truncation, and polyA-tail substitution.
All positions are 1-based inclusive; the slash marks the pivot of an operation.

Examples:
  # Select segments 1-3 and write FASTA to stdout
  atlas --input segments.fasta --include_locus_segment 1-3

  # Keep the sequence between base 10 of segment 2 and base 20 of segment 4
  atlas --input segments.fasta --include_locus_segment 1-5 --truncate 2:10-4:20

  # Cut after base 150 in segment 3 (keeps upstream bases)
  atlas --input segments.fasta --include_locus_segment 1-5 --truncate 3:150/

  # Start the combined sequence at base 290 and add a 20-base polyA tail
  atlas --input segments.fasta --include_locus_segment 1-5 --alt_start /290 --polyA 3:150/20

  # Add 50 A's after global position 5000 in the combined sequence
  atlas --input segments.fasta --include_locus_segment 1-10 --polyA 5000/50

  # List available segments
  atlas --input segments.fasta --list"
)]
#[command(group = ArgGroup::new("action").required(true).args(["include_locus_segment", "list"]))]
struct Cli {
    /// Input FASTA file containing locus segments (.gz accepted)
    #[arg(long)]
    input: PathBuf,

    /// Comma-separated segment indices or ranges (e.g., '1,2,3' or '1-3,5,7-9')
    #[arg(long = "include_locus_segment")]
    include_locus_segment: Option<String>,

    /// Trim the combined sequence to start at this position ('/N' or 'SEGMENT:/N')
    #[arg(long)]
    alt_start: Option<String>,

    /// Truncate at 'SEGMENT:POSITION/' (cut after the position) or keep
    /// 'UP_SEGMENT:UP_BASE-DOWN_SEGMENT:DOWN_BASE'
    #[arg(long)]
    truncate: Option<String>,

    /// Add a polyA tail: 'SEGMENT:POSITION/N' or 'POSITION/N' where N is the
    /// number of A's to append
    #[arg(long = "polyA")]
    poly_a: Option<String>,

    /// Output file path (stdout if not given)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// List available segments and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let format = OutputFormat::from_str(&cli.format).unwrap_or_default();

    match run(&cli, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            let _ = output_error(&mut stderr, &err, format);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, format: OutputFormat) -> Result<()> {
    let records = read_fasta(&cli.input)?;
    let table = SegmentTable::from_records(records)?;
    log::info!(
        "Loaded {} locus segments from {}",
        table.len(),
        cli.input.display()
    );

    if cli.list {
        print!("{}", format_segment_list(&table));
        return Ok(());
    }

    let Some(selection_raw) = cli.include_locus_segment.as_deref() else {
        return Err(AtlasError::syntax(
            "--include_locus_segment",
            "no segment selection provided; use --include_locus_segment or --list",
        ));
    };

    let selection = parse_selection(selection_raw, &table)?;
    let spec = TransformSpec::from_options(
        cli.alt_start.as_deref(),
        cli.truncate.as_deref(),
        cli.poly_a.as_deref(),
    )?;

    let output = pipeline::run(&table, &selection, &spec)?;
    let record = build_output_record(&table, &output)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| AtlasError::Io {
                msg: format!("Failed to create {}: {}", path.display(), e),
            })?;
            let mut writer = BufWriter::new(file);
            output_record(&mut writer, &record, format)?;
            writer.flush()?;
            log::info!("Output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            output_record(&mut stdout, &record, format)?;
        }
    }

    Ok(())
}
