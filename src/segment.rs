//! Segment table
//!
//! A segment is one FASTA record with a 1-based sequential index assigned by
//! input order. The table computes each segment's `start`/`end` as cumulative
//! 1-based spans across all loaded segments; those spans are used for listing
//! and for output-record coordinates, independent of any later selection.

use serde::Serialize;

use crate::error::AtlasError;
use crate::fasta::FastaRecord;
use crate::Result;

/// One locus segment, immutable after load
///
/// # Invariants
///
/// `length == end - start + 1 == sequence.len()`; indices are contiguous
/// starting at 1 in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// 1-based index assigned by input order
    pub index: u32,
    /// Accession from the record header
    pub accession: String,
    /// 1-based cumulative start across all loaded segments
    pub start: u64,
    /// 1-based cumulative end across all loaded segments (inclusive)
    pub end: u64,
    /// Sequence length
    pub length: u64,
    /// Free-text description from the record header
    pub description: String,
    /// Raw sequence
    pub sequence: String,
}

/// Ordered table of all loaded segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTable {
    segments: Vec<Segment>,
}

impl SegmentTable {
    /// Build the table from parsed FASTA records
    ///
    /// Indices are assigned sequentially from 1 in record order; `start`/`end`
    /// spans accumulate across the whole file. Header validation happens in
    /// the FASTA collaborator; the empty-sequence check is repeated here so a
    /// table built from records of any origin holds its invariants.
    pub fn from_records(records: Vec<FastaRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(AtlasError::MalformedInput {
                record: 0,
                msg: "no segments loaded".to_string(),
            });
        }

        let mut segments = Vec::with_capacity(records.len());
        let mut cursor: u64 = 1;
        for (i, record) in records.into_iter().enumerate() {
            if record.sequence.is_empty() {
                return Err(AtlasError::MalformedInput {
                    record: i + 1,
                    msg: format!("record '{}' has an empty sequence", record.accession),
                });
            }
            let length = record.sequence.len() as u64;
            segments.push(Segment {
                index: (i + 1) as u32,
                accession: record.accession,
                start: cursor,
                end: cursor + length - 1,
                length,
                description: record.description,
                sequence: record.sequence,
            });
            cursor += length;
        }

        Ok(Self { segments })
    }

    /// Look up a segment by its 1-based index
    pub fn segment_by_index(&self, index: u32) -> Option<&Segment> {
        if index == 0 {
            return None;
        }
        self.segments.get(index as usize - 1)
    }

    /// All segments in input order
    pub fn all_segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total length of all loaded segments
    pub fn total_length(&self) -> u64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Number of segments in the table
    pub fn len(&self) -> u32 {
        self.segments.len() as u32
    }

    /// Whether the table is empty (never true for a constructed table)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
