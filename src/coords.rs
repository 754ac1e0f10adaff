//! Type-safe coordinate wrapper for resolved positions
//!
//! All user-facing coordinates in atlas-writer are 1-based inclusive. The
//! resolver turns position expressions into signed raw offsets (they can fall
//! left of the current sequence after a leading trim); each pipeline stage
//! then validates the raw offset against the sequence it is about to edit and
//! obtains a [`ResolvedOffset`], which is guaranteed in-bounds.
//!
//! # Design Principles
//!
//! 1. **No implicit conversion**: converting to an array index is an explicit call
//! 2. **Validation at construction**: an offset outside `[1, len]` never exists
//! 3. **Zero-cost abstraction**: compiles to the same code as a raw integer
//!
//! # Examples
//!
//! ```
//! use atlas_writer::coords::ResolvedOffset;
//!
//! let off = ResolvedOffset::in_bounds(3, 8).unwrap();
//! assert_eq!(off.value(), 3);
//! assert_eq!(off.as_index(), 2);
//!
//! // Out of bounds after a trim shifted the position left
//! assert!(ResolvedOffset::in_bounds(0, 8).is_none());
//! assert!(ResolvedOffset::in_bounds(9, 8).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated 1-based position into the current assembled sequence
///
/// # Invariant
///
/// `1 <= value <= len` for the sequence length it was validated against.
/// Construction goes through [`ResolvedOffset::in_bounds`]; there is no way
/// to hold an out-of-bounds offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedOffset(u64);

impl ResolvedOffset {
    /// Validate a raw resolver output against a sequence length
    ///
    /// Returns `None` if `raw` is outside `[1, len]`. Raw offsets are signed
    /// because a segment-relative position can resolve to a point left of the
    /// current sequence once leading bases have been trimmed.
    #[inline]
    pub fn in_bounds(raw: i64, len: u64) -> Option<Self> {
        if raw >= 1 && (raw as u64) <= len {
            Some(Self(raw as u64))
        } else {
            None
        }
    }

    /// Get the 1-based position value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Use as a 0-based array index
    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for ResolvedOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
