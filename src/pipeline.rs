//! Pipeline transform engine
//!
//! Applies the requested operations to the assembled sequence in a strict
//! fixed order: selection, alt-start trimming, truncation, polyA
//! substitution. Each stage is a pure step from the current sequence to the
//! next; a failing stage aborts the whole run with the first error and no
//! output is produced.
//!
//! Later stages see the sequence as earlier stages left it: global positions
//! are interpreted against the post-trim sequence, while segment-relative
//! positions keep their original per-segment numbering (the resolution
//! context re-bases them, see [`crate::resolve`]).

use crate::coords::ResolvedOffset;
use crate::error::AtlasError;
use crate::expr::{PolyA, TransformSpec, Truncation};
use crate::resolve::{resolve, ResolutionContext};
use crate::segment::SegmentTable;
use crate::select::SegmentSet;
use crate::Result;

/// What the pipeline did, for output-record construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Table indices of the combined segments, ascending
    pub indices: Vec<u32>,
    /// Whether a truncation stage ran
    pub truncated: bool,
    /// Number of appended A's, if a polyA stage ran
    pub poly_a_count: Option<u64>,
    /// Position in the originally assembled selection of the first base that
    /// survived alt-start and truncation (1-based)
    pub kept_start: u64,
    /// Position in the originally assembled selection of the last base that
    /// survived alt-start and truncation (1-based, polyA tail excluded)
    pub kept_end: u64,
}

/// Final sequence plus provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub sequence: String,
    pub provenance: Provenance,
}

/// Run the full pipeline over a selection of the table
///
/// `selection` must already be parsed (see [`crate::select::parse_selection`])
/// and is validated again when the working set is built.
pub fn run(table: &SegmentTable, selection: &[u32], spec: &TransformSpec) -> Result<PipelineOutput> {
    if selection.is_empty() {
        return Err(AtlasError::MalformedInput {
            record: 0,
            msg: "no segments selected".to_string(),
        });
    }

    let set = SegmentSet::from_table(table, selection)?;
    let mut sequence = set.assemble();
    let mut ctx = ResolutionContext::new(&set);

    apply_alt_start(&mut sequence, spec, &set, &mut ctx)?;
    let truncated = apply_truncation(&mut sequence, spec, &mut ctx)?;
    let kept_start = ctx.trimmed() + 1;
    let kept_end = ctx.trimmed() + ctx.current_len();
    let poly_a_count = apply_poly_a(&mut sequence, spec, &mut ctx)?;

    Ok(PipelineOutput {
        sequence,
        provenance: Provenance {
            indices: set.indices(),
            truncated,
            poly_a_count,
            kept_start,
            kept_end,
        },
    })
}

/// Drop all bases before the resolved alternative start site
fn apply_alt_start(
    sequence: &mut String,
    spec: &TransformSpec,
    set: &SegmentSet,
    ctx: &mut ResolutionContext<'_>,
) -> Result<()> {
    let Some(expr) = &spec.alt_start else {
        return Ok(());
    };

    let raw = resolve(expr, ctx)?;
    // No trim has happened yet, so the resolved offset is already in bounds
    let off = ResolvedOffset::in_bounds(raw, ctx.current_len()).ok_or_else(|| {
        AtlasError::PositionOutOfRange {
            scope: crate::error::PositionScope::Global,
            requested: raw.unsigned_abs(),
            max: set.total_length(),
        }
    })?;

    sequence.drain(..off.as_index());
    ctx.note_leading_trim(off.value() - 1);
    ctx.note_length(sequence.len() as u64);
    Ok(())
}

/// Apply single-cut or range truncation; returns whether a cut was made
fn apply_truncation(
    sequence: &mut String,
    spec: &TransformSpec,
    ctx: &mut ResolutionContext<'_>,
) -> Result<bool> {
    match &spec.truncate {
        None => Ok(false),
        Some(Truncation::SingleCut(expr)) => {
            let raw = resolve(expr, ctx)?;
            let off = ResolvedOffset::in_bounds(raw, ctx.current_len()).ok_or(
                AtlasError::TruncationRange {
                    requested: raw,
                    len: ctx.current_len(),
                },
            )?;

            sequence.truncate(off.value() as usize);
            ctx.note_length(sequence.len() as u64);
            Ok(true)
        }
        Some(Truncation::Range(start_expr, end_expr)) => {
            let raw_start = resolve(start_expr, ctx)?;
            let raw_end = resolve(end_expr, ctx)?;
            let len = ctx.current_len();

            let bounds_err = AtlasError::InvalidRange {
                start: raw_start,
                end: raw_end,
                len,
            };
            let start = ResolvedOffset::in_bounds(raw_start, len).ok_or_else(|| bounds_err.clone())?;
            let end = ResolvedOffset::in_bounds(raw_end, len).ok_or_else(|| bounds_err.clone())?;
            if start > end {
                return Err(bounds_err);
            }

            sequence.truncate(end.value() as usize);
            sequence.drain(..start.as_index());
            ctx.note_leading_trim(start.value() - 1);
            ctx.note_length(sequence.len() as u64);
            Ok(true)
        }
    }
}

/// Cut after the resolved position and append the polyA tail
fn apply_poly_a(
    sequence: &mut String,
    spec: &TransformSpec,
    ctx: &mut ResolutionContext<'_>,
) -> Result<Option<u64>> {
    let Some(PolyA { position, count }) = &spec.poly_a else {
        return Ok(None);
    };

    let raw = resolve(position, ctx)?;
    let off =
        ResolvedOffset::in_bounds(raw, ctx.current_len()).ok_or(AtlasError::PolyAPosition {
            requested: raw,
            len: ctx.current_len(),
        })?;

    sequence.truncate(off.value() as usize);
    for _ in 0..*count {
        sequence.push('A');
    }
    ctx.note_length(sequence.len() as u64);
    Ok(Some(*count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::PositionExpression;
    use crate::fasta::FastaRecord;

    fn table(seqs: &[&str]) -> SegmentTable {
        let records = seqs
            .iter()
            .enumerate()
            .map(|(i, seq)| FastaRecord {
                accession: format!("SEG{}", i + 1),
                description: String::new(),
                sequence: seq.to_string(),
            })
            .collect();
        SegmentTable::from_records(records).unwrap()
    }

    #[test]
    fn test_selection_only() {
        let t = table(&["ACGT", "TTTT"]);
        let out = run(&t, &[1, 2], &TransformSpec::default()).unwrap();
        assert_eq!(out.sequence, "ACGTTTTT");
        assert_eq!(out.provenance.indices, vec![1, 2]);
        assert!(!out.provenance.truncated);
        assert_eq!(out.provenance.kept_start, 1);
        assert_eq!(out.provenance.kept_end, 8);
    }

    #[test]
    fn test_alt_start_then_poly_a() {
        let t = table(&["ACGT", "TTTT"]);
        let spec = TransformSpec {
            alt_start: Some(PositionExpression::Global(3)),
            truncate: None,
            poly_a: Some(PolyA {
                position: PositionExpression::Global(2),
                count: 5,
            }),
        };
        let out = run(&t, &[1, 2], &spec).unwrap();
        assert_eq!(out.sequence, "GTAAAAA");
        assert_eq!(out.provenance.poly_a_count, Some(5));
    }

    #[test]
    fn test_range_truncation() {
        let t = table(&["ACGT", "TTTT"]);
        let spec = TransformSpec {
            truncate: Some(Truncation::Range(
                PositionExpression::SegmentRelative { segment: 1, pos: 2 },
                PositionExpression::SegmentRelative { segment: 2, pos: 3 },
            )),
            ..Default::default()
        };
        let out = run(&t, &[1, 2], &spec).unwrap();
        // Segment 2 base 3 sits at global offset 7 of "ACGTTTTT"
        assert_eq!(out.sequence, "CGTTTT");
        assert!(out.provenance.truncated);
        assert_eq!(out.provenance.kept_start, 2);
        assert_eq!(out.provenance.kept_end, 7);
    }

    #[test]
    fn test_reversed_range_fails() {
        let t = table(&["ACGT", "TTTT"]);
        let spec = TransformSpec {
            truncate: Some(Truncation::Range(
                PositionExpression::Global(6),
                PositionExpression::Global(2),
            )),
            ..Default::default()
        };
        let err = run(&t, &[1, 2], &spec).unwrap_err();
        assert_eq!(
            err,
            AtlasError::InvalidRange {
                start: 6,
                end: 2,
                len: 8,
            }
        );
    }

    #[test]
    fn test_truncation_at_last_base_is_noop() {
        let t = table(&["ACGT", "TTTT", "GG"]);
        let plain = run(&t, &[1, 2, 3], &TransformSpec::default()).unwrap();
        let spec = TransformSpec {
            truncate: Some(Truncation::SingleCut(PositionExpression::SegmentRelative {
                segment: 3,
                pos: 2,
            })),
            ..Default::default()
        };
        let cut = run(&t, &[1, 2, 3], &spec).unwrap();
        assert_eq!(plain.sequence, cut.sequence);
    }

    #[test]
    fn test_poly_a_zero_count_equals_single_cut() {
        let t = table(&["ACGT", "TTTT"]);
        let poly = TransformSpec {
            poly_a: Some(PolyA {
                position: PositionExpression::Global(5),
                count: 0,
            }),
            ..Default::default()
        };
        let cut = TransformSpec {
            truncate: Some(Truncation::SingleCut(PositionExpression::Global(5))),
            ..Default::default()
        };
        let a = run(&t, &[1, 2], &poly).unwrap();
        let b = run(&t, &[1, 2], &cut).unwrap();
        assert_eq!(a.sequence, b.sequence);
        assert_eq!(a.sequence, "ACGTT");
    }

    #[test]
    fn test_single_cut_out_of_bounds() {
        let t = table(&["ACGT"]);
        let spec = TransformSpec {
            truncate: Some(Truncation::SingleCut(PositionExpression::SegmentRelative {
                segment: 1,
                pos: 3,
            })),
            alt_start: Some(PositionExpression::Global(4)),
            ..Default::default()
        };
        // After alt-start at 4 only "T" remains; segment base 3 now resolves to 0
        let err = run(&t, &[1], &spec).unwrap_err();
        assert_eq!(err, AtlasError::TruncationRange { requested: 0, len: 1 });
    }

    #[test]
    fn test_alt_start_removing_whole_segment_blocks_relative_refs() {
        let t = table(&["ACGT", "TTTT"]);
        let spec = TransformSpec {
            alt_start: Some(PositionExpression::Global(5)),
            poly_a: Some(PolyA {
                position: PositionExpression::SegmentRelative { segment: 1, pos: 2 },
                count: 3,
            }),
            ..Default::default()
        };
        let err = run(&t, &[1, 2], &spec).unwrap_err();
        assert_eq!(err, AtlasError::SegmentNotSelected { index: 1 });
    }

    #[test]
    fn test_empty_selection_rejected() {
        let t = table(&["ACGT"]);
        assert!(run(&t, &[], &TransformSpec::default()).is_err());
    }

    #[test]
    fn test_range_start_trim_rebases_poly_a_global() {
        let t = table(&["ACGT", "TTTT"]);
        let spec = TransformSpec {
            truncate: Some(Truncation::Range(
                PositionExpression::Global(3),
                PositionExpression::Global(8),
            )),
            poly_a: Some(PolyA {
                position: PositionExpression::Global(2),
                count: 2,
            }),
            ..Default::default()
        };
        // Range keeps "GTTTTT"; polyA global 2 then keeps "GT" and appends
        let out = run(&t, &[1, 2], &spec).unwrap();
        assert_eq!(out.sequence, "GTAA");
    }
}
