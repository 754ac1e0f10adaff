//! Output formatting utilities for CLI operations

use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;

use crate::error::AtlasError;
use crate::pipeline::PipelineOutput;
use crate::segment::SegmentTable;
use crate::select::SegmentSet;
use crate::Result;

/// Line width for FASTA sequence output
pub const FASTA_LINE_WIDTH: usize = 70;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// FASTA text output (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas_writer::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// The record handed to the serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    /// Accession of the first combined segment
    pub accession: String,
    /// Table-span coordinate of the first surviving base
    pub global_start: u64,
    /// Table-span coordinate of the last surviving base (polyA tail excluded)
    pub global_end: u64,
    /// Human-readable provenance line
    pub description: String,
    /// Final transformed sequence
    pub sequence: String,
}

/// Build the output record from a pipeline result
///
/// `global_start`/`global_end` are expressed in the table's cumulative spans:
/// the positions the first and last surviving bases occupied before any
/// selection or trimming. The polyA tail, not being part of any segment, does
/// not move `global_end`.
pub fn build_output_record(table: &SegmentTable, output: &PipelineOutput) -> Result<OutputRecord> {
    let prov = &output.provenance;
    let set = SegmentSet::from_table(table, &prov.indices)?;

    let (start_seg, start_base) = set
        .member_at(prov.kept_start)
        .expect("kept_start lies within the assembled selection");
    let (end_seg, end_base) = set
        .member_at(prov.kept_end)
        .expect("kept_end lies within the assembled selection");

    let global_start = start_seg.start + (prov.kept_start - start_base);
    let global_end = end_seg.start + (prov.kept_end - end_base);

    let indices: Vec<String> = prov.indices.iter().map(|i| i.to_string()).collect();
    let mut description = format!("Combined locus segments {}", indices.join(","));
    if prov.truncated {
        description.push_str(" truncated");
    }
    if prov.poly_a_count.is_some() {
        description.push_str(" with polyA tail");
    }

    Ok(OutputRecord {
        accession: start_seg.accession.clone(),
        global_start,
        global_end,
        description,
        sequence: output.sequence.clone(),
    })
}

/// Write a record to the output in the requested format
///
/// Text output is FASTA with the sequence wrapped at [`FASTA_LINE_WIDTH`]
/// columns; JSON output is a single object per line.
pub fn output_record<W: Write>(
    writer: &mut W,
    record: &OutputRecord,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(record).map_err(io::Error::other)?;
            writeln!(writer, "{}", json)
        }
        OutputFormat::Text => {
            writeln!(
                writer,
                ">{}:{}-{} {}",
                record.accession, record.global_start, record.global_end, record.description
            )?;
            for chunk in record.sequence.as_bytes().chunks(FASTA_LINE_WIDTH) {
                writer.write_all(chunk)?;
                writeln!(writer)?;
            }
            Ok(())
        }
    }
}

/// Write an error to the output in the requested format
pub fn output_error<W: Write>(
    writer: &mut W,
    error: &AtlasError,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "error": error.to_string(),
                "code": error.code().as_str(),
            });
            writeln!(writer, "{}", json)
        }
        OutputFormat::Text => writeln!(writer, "Error: {}", error.detailed_message()),
    }
}

/// Render the `--list` table of available segments
///
/// # Examples
///
/// ```
/// use atlas_writer::cli::format_segment_list;
/// use atlas_writer::fasta::FastaRecord;
/// use atlas_writer::segment::SegmentTable;
///
/// let table = SegmentTable::from_records(vec![FastaRecord {
///     accession: "MZ242719.1".to_string(),
///     description: "5' LTR".to_string(),
///     sequence: "ACGT".to_string(),
/// }])
/// .unwrap();
/// let listing = format_segment_list(&table);
/// assert!(listing.contains("MZ242719.1"));
/// assert!(listing.contains("5' LTR"));
/// ```
pub fn format_segment_list(table: &SegmentTable) -> String {
    let mut out = String::new();
    out.push_str("Available Locus Segments:\n");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    out.push_str(&format!(
        "{:^5} | {:^12} | {:^15} | {:^8} | Description\n",
        "Index", "Accession", "Range", "Length"
    ));
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for seg in table.all_segments() {
        let range = format!("{}-{}", seg.start, seg.end);
        let description = if seg.description.is_empty() {
            "No description"
        } else {
            &seg.description
        };
        out.push_str(&format!(
            "{:^5} | {:^12} | {:^15} | {:^8} | {}\n",
            seg.index, seg.accession, range, seg.length, description
        ));
    }

    out
}
