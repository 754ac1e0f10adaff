//! Position resolution
//!
//! Turns a [`PositionExpression`] into a raw offset into the *current*
//! assembled sequence. Resolution is a single pure function matching on the
//! expression tag, parameterized by a [`ResolutionContext`] that tracks what
//! earlier pipeline stages did to the sequence.
//!
//! # Coordinate rules
//!
//! - Global positions are interpreted against the current sequence (that is,
//!   after any leading trim) and must fall within `[1, current_len]`.
//! - Segment-relative positions always use the segment's own original
//!   numbering; trimming never renumbers surviving segments. The resolved
//!   offset is the segment's global start within the working set, plus the
//!   in-segment position, shifted left by the bases trimmed so far. That
//!   shift can push the result to zero or below; the consuming stage
//!   validates the raw offset against the sequence it is about to edit.
//! - A segment wholly removed by an earlier trim is no longer addressable and
//!   resolves to [`AtlasError::SegmentNotSelected`].

use crate::error::{AtlasError, PositionScope};
use crate::expr::PositionExpression;
use crate::select::SegmentSet;
use crate::Result;

/// What the resolver needs to know about the pipeline state
#[derive(Debug, Clone)]
pub struct ResolutionContext<'a> {
    set: &'a SegmentSet,
    /// Leading bases removed from the assembled sequence by earlier stages
    trimmed: u64,
    /// Length of the current sequence
    current_len: u64,
}

impl<'a> ResolutionContext<'a> {
    /// Context for a freshly assembled working set
    pub fn new(set: &'a SegmentSet) -> Self {
        Self {
            set,
            trimmed: 0,
            current_len: set.total_length(),
        }
    }

    /// Record that `n` more leading bases were removed
    pub fn note_leading_trim(&mut self, n: u64) {
        self.trimmed += n;
    }

    /// Record the sequence length after a stage
    pub fn note_length(&mut self, len: u64) {
        self.current_len = len;
    }

    /// The working set this context resolves against
    pub fn set(&self) -> &SegmentSet {
        self.set
    }

    /// Leading bases removed so far
    pub fn trimmed(&self) -> u64 {
        self.trimmed
    }

    /// Current sequence length
    pub fn current_len(&self) -> u64 {
        self.current_len
    }
}

/// Resolve a position expression to a raw offset into the current sequence
///
/// The returned offset is 1-based. For global expressions it is always within
/// `[1, current_len]`; for segment-relative expressions it can land outside
/// the current sequence (ahead of a truncation point, or left of the origin
/// after a trim), which the consuming stage reports with its own error kind.
pub fn resolve(expr: &PositionExpression, ctx: &ResolutionContext<'_>) -> Result<i64> {
    match *expr {
        PositionExpression::Global(pos) => {
            if pos < 1 || pos > ctx.current_len {
                return Err(AtlasError::PositionOutOfRange {
                    scope: PositionScope::Global,
                    requested: pos,
                    max: ctx.current_len,
                });
            }
            Ok(pos as i64)
        }
        PositionExpression::SegmentRelative { segment, pos } => {
            let seg = ctx
                .set
                .segment(segment)
                .ok_or(AtlasError::SegmentNotSelected { index: segment })?;
            let cumulative_start = ctx
                .set
                .cumulative_start(segment)
                .expect("selected segment has a cumulative start");

            // Wholly trimmed away: the segment is gone from the sequence
            if cumulative_start + seg.length - 1 <= ctx.trimmed {
                return Err(AtlasError::SegmentNotSelected { index: segment });
            }

            if pos < 1 || pos > seg.length {
                return Err(AtlasError::PositionOutOfRange {
                    scope: PositionScope::Segment(segment),
                    requested: pos,
                    max: seg.length,
                });
            }

            Ok((cumulative_start + pos - 1) as i64 - ctx.trimmed as i64)
        }
    }
}
