//! CLI utilities for atlas-writer
//!
//! Testable functions used by the `atlas` binary. Output construction and
//! formatting live in the library so they can be unit tested against
//! in-memory writers without end-to-end CLI runs.

pub mod format;

pub use format::{
    build_output_record, format_segment_list, output_error, output_record, OutputFormat,
    OutputRecord,
};
