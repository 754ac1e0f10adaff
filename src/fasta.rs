//! FASTA input collaborator
//!
//! Reads multi-record FASTA files into `(accession, description, sequence)`
//! triples for the segment table. Supports plain and gzip-compressed input.
//! Sequence content is taken verbatim; no alphabet validation is performed.
//!
//! Header convention: the first whitespace-delimited token is the accession,
//! optionally carrying a `:start-end` coordinate suffix (e.g.
//! `MZ242719.1:1-290`) which is stripped; the remainder of the line is the
//! free-text description.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::warn;

use crate::error::AtlasError;
use crate::Result;

/// One raw FASTA record, header already split into accession and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Accession from the header, coordinate suffix stripped
    pub accession: String,
    /// Free text after the accession token (may be empty)
    pub description: String,
    /// Sequence with line breaks removed
    pub sequence: String,
}

/// Read all records from a FASTA file
///
/// Files ending in `.gz` are transparently decompressed. Fails with
/// [`AtlasError::Io`] if the file cannot be opened and
/// [`AtlasError::MalformedInput`] if the content is not valid FASTA.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AtlasError::Io {
        msg: format!("Failed to open {}: {}", path.display(), e),
    })?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        parse_records(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        parse_records(BufReader::new(file))
    }
}

/// Parse FASTA records from any buffered reader
///
/// Exposed for testing against in-memory input.
pub fn parse_records<R: Read>(reader: BufReader<R>) -> Result<Vec<FastaRecord>> {
    let mut records: Vec<FastaRecord> = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut record_no = 0usize;

    for line in reader.lines() {
        let line = line.map_err(|e| AtlasError::Io {
            msg: format!("Failed to read input: {}", e),
        })?;
        let line = line.trim_end();

        if let Some(header) = line.strip_prefix('>') {
            if let Some((h, seq)) = current.take() {
                records.push(finish_record(record_no, &h, seq)?);
            }
            record_no += 1;
            current = Some((header.to_string(), String::new()));
        } else if let Some((_, seq)) = current.as_mut() {
            seq.push_str(line.trim());
        } else if !line.trim().is_empty() {
            warn!("Ignoring content before first FASTA header: {}", line);
        }
    }

    if let Some((h, seq)) = current.take() {
        records.push(finish_record(record_no, &h, seq)?);
    }

    if records.is_empty() {
        return Err(AtlasError::MalformedInput {
            record: 0,
            msg: "no FASTA records found".to_string(),
        });
    }

    Ok(records)
}

fn finish_record(record_no: usize, header: &str, sequence: String) -> Result<FastaRecord> {
    let header = header.trim();
    if header.is_empty() {
        return Err(AtlasError::MalformedInput {
            record: record_no,
            msg: "empty header".to_string(),
        });
    }
    if sequence.is_empty() {
        return Err(AtlasError::MalformedInput {
            record: record_no,
            msg: format!("record '{}' has an empty sequence", header),
        });
    }

    let (token, description) = match header.split_once(char::is_whitespace) {
        Some((t, d)) => (t, d.trim().to_string()),
        None => (header, String::new()),
    };

    Ok(FastaRecord {
        accession: strip_coordinate_suffix(token).to_string(),
        description,
        sequence,
    })
}

/// Strip a trailing `:start-end` coordinate suffix from an accession token
///
/// `MZ242719.1:1-290` becomes `MZ242719.1`; tokens without a parsable suffix
/// are returned unchanged (a colon alone is not enough, the suffix must look
/// like two dash-separated numbers).
fn strip_coordinate_suffix(token: &str) -> &str {
    match token.rsplit_once(':') {
        Some((acc, suffix)) if is_coordinate_pair(suffix) && !acc.is_empty() => acc,
        _ => token,
    }
}

fn is_coordinate_pair(s: &str) -> bool {
    match s.split_once('-') {
        Some((a, b)) => {
            !a.is_empty()
                && !b.is_empty()
                && a.bytes().all(|c| c.is_ascii_digit())
                && b.bytes().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
