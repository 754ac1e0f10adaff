//! Position expression grammar
//!
//! Parses the user-facing position grammar into [`PositionExpression`] values
//! and option strings into the [`TransformSpec`]. All positions are 1-based
//! inclusive; the slash marks the pivot of an operation.
//!
//! Grammar (no whitespace tolerance):
//!
//! | Form | Meaning | Used by |
//! |------|---------|---------|
//! | `/N` | global position `N` | `--alt_start`, truncation range ends |
//! | `S:/N` or `S:N` | position `N` within segment `S` | all operations |
//! | `N` | global position `N` | `--polyA`, bare single-cut |
//! | `S:N/` or `N/` | single cut after the position | `--truncate` |
//! | `A-B` | keep between two positions | `--truncate` |
//! | `POS/COUNT` | polyA tail of `COUNT` A's after `POS` | `--polyA` |
//!
//! Zero, negative numbers, and non-integers are rejected at parse time with
//! an [`AtlasError::ExpressionSyntax`] carrying a span into the raw input.

use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::opt,
    IResult, Parser,
};

use crate::error::{AtlasError, SourceSpan};
use crate::Result;

/// A parsed position expression, global or segment-relative
///
/// Modeled as a tagged variant so that resolution is a single pure function
/// matching on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionExpression {
    /// 1-based position into the assembled working-set sequence
    Global(u64),
    /// 1-based position into one segment's own sequence
    SegmentRelative { segment: u32, pos: u64 },
}

/// A parsed truncation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// Keep `[1, pos]` of the current sequence
    SingleCut(PositionExpression),
    /// Keep `[start, end]` inclusive of the current sequence
    Range(PositionExpression, PositionExpression),
}

/// A parsed polyA request: cut after `position`, then append `count` A's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyA {
    pub position: PositionExpression,
    pub count: u64,
}

/// The validated set of requested operations, immutable after construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSpec {
    pub alt_start: Option<PositionExpression>,
    pub truncate: Option<Truncation>,
    pub poly_a: Option<PolyA>,
}

impl TransformSpec {
    /// Parse the raw option strings into a spec
    ///
    /// Fails on the first malformed option; a `TransformSpec` therefore never
    /// holds a partially parsed operation.
    pub fn from_options(
        alt_start: Option<&str>,
        truncate: Option<&str>,
        poly_a: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            alt_start: alt_start.map(parse_position).transpose()?,
            truncate: truncate.map(parse_truncation).transpose()?,
            poly_a: poly_a.map(parse_poly_a).transpose()?,
        })
    }
}

// --- nom building blocks ---

fn nonzero_u64(input: &str) -> IResult<&str, u64> {
    let (remaining, s) = digit1.parse(input)?;
    // Checked parsing so overflow is an error instead of a silent wrap
    let value: u64 = s.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    // Positions are 1-based, 0 is invalid
    if value == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((remaining, value))
}

fn nonzero_u32(input: &str) -> IResult<&str, u32> {
    let (remaining, s) = digit1.parse(input)?;
    let value: u32 = s.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    if value == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((remaining, value))
}

/// `S:/N` or `S:N`
fn segment_relative(input: &str) -> IResult<&str, PositionExpression> {
    let (remaining, segment) = nonzero_u32(input)?;
    let (remaining, _) = char(':').parse(remaining)?;
    let (remaining, _) = opt(char('/')).parse(remaining)?;
    let (remaining, pos) = nonzero_u64(remaining)?;
    Ok((remaining, PositionExpression::SegmentRelative { segment, pos }))
}

/// `/N`
fn global_slash(input: &str) -> IResult<&str, PositionExpression> {
    let (remaining, _) = char('/').parse(input)?;
    let (remaining, pos) = nonzero_u64(remaining)?;
    Ok((remaining, PositionExpression::Global(pos)))
}

/// `N`
fn bare_global(input: &str) -> IResult<&str, PositionExpression> {
    let (remaining, pos) = nonzero_u64(input)?;
    Ok((remaining, PositionExpression::Global(pos)))
}

/// Run `parser` over `part` (located at `offset` within `raw`), requiring it
/// to consume the whole part.
fn parse_part<'a, P>(
    raw: &str,
    part: &'a str,
    offset: usize,
    mut parser: P,
    expected: &str,
) -> Result<PositionExpression>
where
    P: Parser<&'a str, Output = PositionExpression, Error = nom::error::Error<&'a str>>,
{
    match parser.parse(part) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => {
            let bad_from = offset + (part.len() - rest.len());
            Err(AtlasError::syntax_at(
                raw,
                format!("unexpected trailing characters, expected {}", expected),
                SourceSpan::new(bad_from, offset + part.len()),
            ))
        }
        Err(_) => Err(AtlasError::syntax_at(
            raw,
            format!("expected {}", expected),
            SourceSpan::new(offset, offset + part.len().max(1)),
        )),
    }
}

// --- public parse entry points ---

/// Parse a standalone position expression: `/N`, `S:/N`, or `S:N`
///
/// This is the `--alt_start` grammar.
///
/// # Examples
///
/// ```
/// use atlas_writer::expr::{parse_position, PositionExpression};
///
/// assert_eq!(parse_position("/3").unwrap(), PositionExpression::Global(3));
/// assert_eq!(
///     parse_position("2:/10").unwrap(),
///     PositionExpression::SegmentRelative { segment: 2, pos: 10 }
/// );
/// assert!(parse_position("/0").is_err());
/// assert!(parse_position("-4").is_err());
/// ```
pub fn parse_position(raw: &str) -> Result<PositionExpression> {
    parse_part(
        raw,
        raw,
        0,
        alt((segment_relative, global_slash)),
        "'/N' or 'SEGMENT:/N'",
    )
}

/// Parse a truncation option: single cut `S:N/` / `N/`, or range `A-B`
///
/// Range ends are `S:N` or `/N`, each resolved independently.
///
/// # Examples
///
/// ```
/// use atlas_writer::expr::{parse_truncation, PositionExpression, Truncation};
///
/// assert_eq!(
///     parse_truncation("3:150/").unwrap(),
///     Truncation::SingleCut(PositionExpression::SegmentRelative { segment: 3, pos: 150 })
/// );
/// assert_eq!(
///     parse_truncation("2:10-4:20").unwrap(),
///     Truncation::Range(
///         PositionExpression::SegmentRelative { segment: 2, pos: 10 },
///         PositionExpression::SegmentRelative { segment: 4, pos: 20 }
///     )
/// );
/// assert!(parse_truncation("2:10").is_err());
/// ```
pub fn parse_truncation(raw: &str) -> Result<Truncation> {
    if let Some((up, down)) = raw.split_once('-') {
        let endpoint = || alt((segment_relative, global_slash));
        let start = parse_part(raw, up, 0, endpoint(), "'SEGMENT:BASE' or '/N'")?;
        let end = parse_part(
            raw,
            down,
            up.len() + 1,
            endpoint(),
            "'SEGMENT:BASE' or '/N'",
        )?;
        return Ok(Truncation::Range(start, end));
    }

    if let Some(stripped) = raw.strip_suffix('/') {
        let cut = parse_part(
            raw,
            stripped,
            0,
            alt((segment_relative, global_slash, bare_global)),
            "'SEGMENT:POSITION/' or 'POSITION/'",
        )?;
        return Ok(Truncation::SingleCut(cut));
    }

    Err(AtlasError::syntax(
        raw,
        "use 'SEGMENT:POSITION/' to cut after a position, or \
         'UP_SEGMENT:UP_BASE-DOWN_SEGMENT:DOWN_BASE' to keep a range",
    ))
}

/// Parse a polyA option: `POS/COUNT` where `POS` is `S:N`, `S:/N`, or bare `N`
///
/// The count must be a non-negative integer; zero is valid and equivalent to
/// a single cut at the position.
///
/// # Examples
///
/// ```
/// use atlas_writer::expr::{parse_poly_a, PolyA, PositionExpression};
///
/// assert_eq!(
///     parse_poly_a("3:150/20").unwrap(),
///     PolyA {
///         position: PositionExpression::SegmentRelative { segment: 3, pos: 150 },
///         count: 20
///     }
/// );
/// assert_eq!(
///     parse_poly_a("5000/50").unwrap(),
///     PolyA { position: PositionExpression::Global(5000), count: 50 }
/// );
/// assert!(parse_poly_a("3:150").is_err());
/// ```
pub fn parse_poly_a(raw: &str) -> Result<PolyA> {
    let Some((pos_part, count_part)) = raw.rsplit_once('/') else {
        return Err(AtlasError::syntax(
            raw,
            "use 'SEGMENT:POSITION/COUNT' or 'POSITION/COUNT'",
        ));
    };

    let position = parse_part(
        raw,
        pos_part,
        0,
        alt((segment_relative, bare_global)),
        "'SEGMENT:POSITION' or a global position",
    )?;

    let count = match count_part.parse::<i64>() {
        Ok(n) if n >= 0 => n as u64,
        Ok(_) => {
            return Err(AtlasError::InvalidCount {
                raw: count_part.to_string(),
            })
        }
        Err(_) => {
            let from = pos_part.len() + 1;
            return Err(AtlasError::syntax_at(
                raw,
                format!("'{}' is not a valid repeat count", count_part),
                SourceSpan::new(from, raw.len().max(from + 1)),
            ));
        }
    };

    Ok(PolyA { position, count })
}
