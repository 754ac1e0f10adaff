//! atlas-writer: locus segment extraction and rewriting
//!
//! Assembles a nucleotide sequence from an ordered list of named locus
//! segments, then applies coordinate-addressed transformations: alternative
//! start-site trimming, range truncation, and polyA-tail substitution.
//! Positions are addressable globally (against the assembled selection) or
//! per segment, always 1-based inclusive.
//!
//! # Example
//!
//! ```
//! use atlas_writer::expr::TransformSpec;
//! use atlas_writer::fasta::FastaRecord;
//! use atlas_writer::segment::SegmentTable;
//! use atlas_writer::select::parse_selection;
//! use atlas_writer::pipeline;
//!
//! # fn main() -> atlas_writer::Result<()> {
//! let records = vec![
//!     FastaRecord {
//!         accession: "A".to_string(),
//!         description: String::new(),
//!         sequence: "ACGT".to_string(),
//!     },
//!     FastaRecord {
//!         accession: "B".to_string(),
//!         description: String::new(),
//!         sequence: "TTTT".to_string(),
//!     },
//! ];
//! let table = SegmentTable::from_records(records)?;
//!
//! let selection = parse_selection("1-2", &table)?;
//! let spec = TransformSpec::from_options(Some("/3"), None, Some("2/5"))?;
//! let output = pipeline::run(&table, &selection, &spec)?;
//!
//! assert_eq!(output.sequence, "GTAAAAA");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod coords;
pub mod error;
pub mod expr;
pub mod fasta;
pub mod pipeline;
pub mod resolve;
pub mod segment;
pub mod select;

// Re-export commonly used types
pub use coords::ResolvedOffset;
pub use error::{AtlasError, ErrorCode};
pub use expr::{PolyA, PositionExpression, TransformSpec, Truncation};
pub use pipeline::{PipelineOutput, Provenance};
pub use segment::{Segment, SegmentTable};
pub use select::{parse_selection, SegmentSet};

/// Result type alias for atlas-writer operations
pub type Result<T> = std::result::Result<T, AtlasError>;
