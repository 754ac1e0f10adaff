//! Segment selection
//!
//! Parses inclusion lists (`1,3,5`, `1-5`, `1-3,5,7-9`) and derives the
//! working [`SegmentSet`]: the ordered subset of the table the pipeline
//! operates on, together with its cumulative offset table. Duplicate and
//! overlapping inclusions collapse to a single membership per index; the set
//! always preserves the table's original segment order.

use crate::error::{AtlasError, SourceSpan};
use crate::segment::{Segment, SegmentTable};
use crate::Result;

/// Parse an inclusion list into ascending, deduplicated segment indices
///
/// Fails with [`AtlasError::ExpressionSyntax`] on malformed parts and
/// [`AtlasError::SegmentOutOfRange`] when an index has no matching segment.
///
/// # Examples
///
/// ```
/// use atlas_writer::fasta::FastaRecord;
/// use atlas_writer::segment::SegmentTable;
/// use atlas_writer::select::parse_selection;
///
/// let records = ["A", "B", "C", "D", "E"]
///     .iter()
///     .map(|acc| FastaRecord {
///         accession: acc.to_string(),
///         description: String::new(),
///         sequence: "ACGT".to_string(),
///     })
///     .collect();
/// let table = SegmentTable::from_records(records).unwrap();
///
/// assert_eq!(parse_selection("1-3,5", &table).unwrap(), vec![1, 2, 3, 5]);
/// assert_eq!(parse_selection("2,1-2", &table).unwrap(), vec![1, 2]);
/// ```
pub fn parse_selection(raw: &str, table: &SegmentTable) -> Result<Vec<u32>> {
    let mut indices: Vec<u32> = Vec::new();
    let mut offset = 0usize;

    for part in raw.split(',') {
        let span = SourceSpan::new(offset, offset + part.len());
        offset += part.len() + 1;

        if let Some((a, b)) = part.split_once('-') {
            let start = parse_index(raw, a, &span)?;
            let end = parse_index(raw, b, &span)?;
            if start > end {
                return Err(AtlasError::syntax_at(
                    raw,
                    format!("range '{}' is reversed", part),
                    span,
                ));
            }
            for idx in start..=end {
                check_in_table(idx, table)?;
                if !indices.contains(&idx) {
                    indices.push(idx);
                }
            }
        } else {
            let idx = parse_index(raw, part, &span)?;
            check_in_table(idx, table)?;
            if !indices.contains(&idx) {
                indices.push(idx);
            }
        }
    }

    // The working set keeps the table's original segment order
    indices.sort_unstable();
    Ok(indices)
}

fn parse_index(raw: &str, part: &str, span: &SourceSpan) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(idx) if idx >= 1 => Ok(idx),
        Ok(_) => Err(AtlasError::syntax_at(
            raw,
            "segment indices are 1-based, 0 is not a valid index",
            span.clone(),
        )),
        Err(_) => Err(AtlasError::syntax_at(
            raw,
            format!("'{}' is not a valid segment index", part),
            span.clone(),
        )),
    }
}

fn check_in_table(index: u32, table: &SegmentTable) -> Result<()> {
    if table.segment_by_index(index).is_none() {
        return Err(AtlasError::SegmentOutOfRange {
            index,
            max: table.len(),
        });
    }
    Ok(())
}

/// The working set: selected segments plus their cumulative offset table
///
/// For member *i*, its global start within the set is
/// `1 + sum(length of members before i)`. The set is derived once per run and
/// never mutated; trims performed by later pipeline stages are tracked in the
/// resolution context, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
    cumulative_starts: Vec<u64>,
}

impl SegmentSet {
    /// Build the working set from ascending, validated indices
    pub fn from_table(table: &SegmentTable, indices: &[u32]) -> Result<Self> {
        let mut segments = Vec::with_capacity(indices.len());
        for &idx in indices {
            let seg = table
                .segment_by_index(idx)
                .ok_or(AtlasError::SegmentOutOfRange {
                    index: idx,
                    max: table.len(),
                })?;
            segments.push(seg.clone());
        }

        let mut cumulative_starts = Vec::with_capacity(segments.len());
        let mut cursor: u64 = 1;
        for seg in &segments {
            cumulative_starts.push(cursor);
            cursor += seg.length;
        }

        Ok(Self {
            segments,
            cumulative_starts,
        })
    }

    /// Members of the set, in table order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Table indices of the members, ascending
    pub fn indices(&self) -> Vec<u32> {
        self.segments.iter().map(|s| s.index).collect()
    }

    /// Look up a member by its table index
    pub fn segment(&self, index: u32) -> Option<&Segment> {
        self.segments.iter().find(|s| s.index == index)
    }

    /// Global start of a member within the assembled set, 1-based
    pub fn cumulative_start(&self, index: u32) -> Option<u64> {
        self.segments
            .iter()
            .position(|s| s.index == index)
            .map(|i| self.cumulative_starts[i])
    }

    /// Sum of member lengths
    pub fn total_length(&self) -> u64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// The member containing assembled position `pos`, with its global start
    ///
    /// `pos` is 1-based into the assembled (untrimmed) set sequence.
    pub fn member_at(&self, pos: u64) -> Option<(&Segment, u64)> {
        for (seg, &start) in self.segments.iter().zip(&self.cumulative_starts) {
            if pos >= start && pos < start + seg.length {
                return Some((seg, start));
            }
        }
        None
    }

    /// Concatenate member sequences into the assembled sequence
    pub fn assemble(&self) -> String {
        let mut out = String::with_capacity(self.total_length() as usize);
        for seg in &self.segments {
            out.push_str(&seg.sequence);
        }
        out
    }
}
