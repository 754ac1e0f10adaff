//! Error types for atlas-writer
//!
//! This module provides structured error handling with:
//! - Error codes for categorization
//! - Source span tracking for expression syntax errors
//! - The bounds that were violated, carried on the error value

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Parse errors (E1xxx)
    /// Unparsable position expression
    InvalidExpression = 1001,
    /// Invalid polyA repeat count
    InvalidCount = 1002,
    /// Malformed input record
    MalformedRecord = 1003,

    // Selection errors (E2xxx)
    /// Selection references an index with no matching segment
    SegmentOutOfRange = 2001,
    /// Segment-relative expression references a segment outside the working set
    SegmentNotSelected = 2002,

    // Bounds errors (E3xxx)
    /// Position out of bounds
    PositionOutOfBounds = 3001,
    /// Truncation cut point out of bounds
    TruncationOutOfBounds = 3002,
    /// Invalid truncation range
    InvalidRange = 3003,
    /// PolyA position out of bounds
    PolyAOutOfBounds = 3004,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidExpression => "unparsable position expression",
            ErrorCode::InvalidCount => "invalid polyA repeat count",
            ErrorCode::MalformedRecord => "malformed input record",
            ErrorCode::SegmentOutOfRange => "segment index out of range",
            ErrorCode::SegmentNotSelected => "segment not in working set",
            ErrorCode::PositionOutOfBounds => "position out of bounds",
            ErrorCode::TruncationOutOfBounds => "truncation cut point out of bounds",
            ErrorCode::InvalidRange => "invalid truncation range",
            ErrorCode::PolyAOutOfBounds => "polyA position out of bounds",
            ErrorCode::IoError => "file I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span in the raw user expression indicating error location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Starting byte offset (0-indexed)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span for a single position
    pub fn point(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Format the source with the error highlighted
    ///
    /// Returns a string like:
    /// ```text
    /// 2:x10
    ///   ^~~
    /// ```
    pub fn highlight(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }

        let safe_start = self.start.min(source.len());
        let safe_end = self.end.min(source.len()).max(safe_start);

        let mut pointer = String::with_capacity(source.len() + 4);
        for _ in 0..safe_start {
            pointer.push(' ');
        }
        pointer.push('^');
        if safe_start < safe_end {
            for _ in (safe_start + 1)..safe_end {
                pointer.push('~');
            }
        }

        format!("{}\n{}", source, pointer)
    }
}

/// Which coordinate space a position was validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionScope {
    /// Position into the assembled working-set sequence
    Global,
    /// Position into one segment's own sequence
    Segment(u32),
}

impl fmt::Display for PositionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionScope::Global => write!(f, "combined sequence"),
            PositionScope::Segment(idx) => write!(f, "segment {}", idx),
        }
    }
}

/// Main error type for atlas-writer operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtlasError {
    /// Input record could not be turned into a segment
    #[error("Malformed input record {record}: {msg}")]
    MalformedInput { record: usize, msg: String },

    /// Selection references an index with no matching segment
    #[error("Segment index {index} out of range (table has {max} segments)")]
    SegmentOutOfRange { index: u32, max: u32 },

    /// Unparsable position or selection expression
    #[error("Invalid expression '{raw}': {msg}")]
    ExpressionSyntax {
        raw: String,
        msg: String,
        /// Offending span within `raw`, when known
        span: Option<SourceSpan>,
    },

    /// Segment-relative expression references a segment outside the working set
    #[error("Segment {index} is not part of the working set")]
    SegmentNotSelected { index: u32 },

    /// Position exceeds the bounds of its coordinate space
    #[error("Position {requested} out of range for {scope} (valid range 1-{max})")]
    PositionOutOfRange {
        scope: PositionScope,
        requested: u64,
        max: u64,
    },

    /// Truncation cut point falls outside the current sequence
    #[error("Truncation point {requested} outside current sequence (length {len})")]
    TruncationRange { requested: i64, len: u64 },

    /// Truncation range is reversed or out of bounds
    #[error("Invalid truncation range {start}-{end} (current sequence length {len})")]
    InvalidRange { start: i64, end: i64, len: u64 },

    /// PolyA position falls outside the current sequence
    #[error("PolyA position {requested} outside current sequence (length {len})")]
    PolyAPosition { requested: i64, len: u64 },

    /// PolyA repeat count is not a non-negative integer
    #[error("Invalid polyA count '{raw}': count must be a non-negative integer")]
    InvalidCount { raw: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl AtlasError {
    /// Create an expression syntax error without span information
    pub fn syntax(raw: impl Into<String>, msg: impl Into<String>) -> Self {
        AtlasError::ExpressionSyntax {
            raw: raw.into(),
            msg: msg.into(),
            span: None,
        }
    }

    /// Create an expression syntax error highlighting a span of the input
    pub fn syntax_at(raw: impl Into<String>, msg: impl Into<String>, span: SourceSpan) -> Self {
        AtlasError::ExpressionSyntax {
            raw: raw.into(),
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AtlasError::MalformedInput { .. } => ErrorCode::MalformedRecord,
            AtlasError::SegmentOutOfRange { .. } => ErrorCode::SegmentOutOfRange,
            AtlasError::ExpressionSyntax { .. } => ErrorCode::InvalidExpression,
            AtlasError::SegmentNotSelected { .. } => ErrorCode::SegmentNotSelected,
            AtlasError::PositionOutOfRange { .. } => ErrorCode::PositionOutOfBounds,
            AtlasError::TruncationRange { .. } => ErrorCode::TruncationOutOfBounds,
            AtlasError::InvalidRange { .. } => ErrorCode::InvalidRange,
            AtlasError::PolyAPosition { .. } => ErrorCode::PolyAOutOfBounds,
            AtlasError::InvalidCount { .. } => ErrorCode::InvalidCount,
            AtlasError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Get a formatted error with code prefix and span highlighting
    pub fn detailed_message(&self) -> String {
        let mut result = format!("[{}] {}", self.code(), self);
        if let AtlasError::ExpressionSyntax {
            raw,
            span: Some(span),
            ..
        } = self
        {
            result.push_str("\n\n");
            result.push_str(&span.highlight(raw));
        }
        result
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        AtlasError::Io { msg: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::InvalidExpression.as_str(), "E1001");
        assert_eq!(ErrorCode::SegmentOutOfRange.as_str(), "E2001");
        assert_eq!(ErrorCode::PositionOutOfBounds.as_str(), "E3001");
        assert_eq!(ErrorCode::IoError.as_str(), "E9001");
    }

    #[test]
    fn test_span_highlight() {
        let span = SourceSpan::new(2, 5);
        let highlighted = span.highlight("2:x10");
        assert_eq!(highlighted, "2:x10\n  ^~~");
    }

    #[test]
    fn test_span_highlight_point() {
        let span = SourceSpan::point(0);
        assert_eq!(span.highlight("x"), "x\n^");
    }

    #[test]
    fn test_span_highlight_clamps_to_source() {
        let span = SourceSpan::new(10, 20);
        // Span beyond the source must not panic
        let highlighted = span.highlight("abc");
        assert!(highlighted.starts_with("abc\n"));
    }

    #[test]
    fn test_error_codes_map() {
        let err = AtlasError::SegmentNotSelected { index: 4 };
        assert_eq!(err.code(), ErrorCode::SegmentNotSelected);

        let err = AtlasError::InvalidCount {
            raw: "-5".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::InvalidCount);
    }

    #[test]
    fn test_detailed_message_includes_highlight() {
        let err = AtlasError::syntax_at("2:x10", "expected a position", SourceSpan::new(2, 5));
        let msg = err.detailed_message();
        assert!(msg.starts_with("[E1001]"));
        assert!(msg.contains("2:x10\n  ^~~"));
    }

    #[test]
    fn test_position_scope_display() {
        assert_eq!(PositionScope::Global.to_string(), "combined sequence");
        assert_eq!(PositionScope::Segment(3).to_string(), "segment 3");
    }
}
