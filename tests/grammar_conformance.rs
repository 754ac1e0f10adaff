//! Expression grammar conformance tests
//!
//! The option grammar (1-based, inclusive, slash-marks-pivot) is a
//! compatibility surface and must not drift: these tests pin down the exact
//! accepted and rejected forms for every option.

use atlas_writer::expr::{
    parse_poly_a, parse_position, parse_truncation, PositionExpression, Truncation,
};
use atlas_writer::fasta::FastaRecord;
use atlas_writer::segment::SegmentTable;
use atlas_writer::select::parse_selection;
use atlas_writer::AtlasError;
use rstest::rstest;

fn table(n: usize) -> SegmentTable {
    let records = (1..=n)
        .map(|i| FastaRecord {
            accession: format!("SEG{}", i),
            description: String::new(),
            sequence: "ACGT".to_string(),
        })
        .collect();
    SegmentTable::from_records(records).unwrap()
}

mod position_grammar {
    use super::*;

    #[rstest]
    #[case("/1", PositionExpression::Global(1))]
    #[case("/290", PositionExpression::Global(290))]
    #[case("2:/10", PositionExpression::SegmentRelative { segment: 2, pos: 10 })]
    #[case("12:/1", PositionExpression::SegmentRelative { segment: 12, pos: 1 })]
    fn accepts(#[case] raw: &str, #[case] expected: PositionExpression) {
        assert_eq!(parse_position(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("/0")]
    #[case("0:/5")]
    #[case("/abc")]
    #[case("/-3")]
    #[case("2: /3")]
    #[case("/3 ")]
    #[case("2:3:4")]
    fn rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_position(raw),
            Err(AtlasError::ExpressionSyntax { .. })
        ));
    }
}

mod truncation_grammar {
    use super::*;

    #[rstest]
    #[case("3:150/", Truncation::SingleCut(PositionExpression::SegmentRelative { segment: 3, pos: 150 }))]
    #[case("150/", Truncation::SingleCut(PositionExpression::Global(150)))]
    #[case("2:10-4:20", Truncation::Range(
        PositionExpression::SegmentRelative { segment: 2, pos: 10 },
        PositionExpression::SegmentRelative { segment: 4, pos: 20 },
    ))]
    #[case("/2-/6", Truncation::Range(
        PositionExpression::Global(2),
        PositionExpression::Global(6),
    ))]
    #[case("1:5-/7", Truncation::Range(
        PositionExpression::SegmentRelative { segment: 1, pos: 5 },
        PositionExpression::Global(7),
    ))]
    fn accepts(#[case] raw: &str, #[case] expected: Truncation) {
        assert_eq!(parse_truncation(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("3:150")]
    #[case("3:0/")]
    #[case("0:5/")]
    #[case("2:10-")]
    #[case("-4:20")]
    #[case("2:10-4:20-6:30")]
    #[case("a:b/")]
    #[case("")]
    fn rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_truncation(raw),
            Err(AtlasError::ExpressionSyntax { .. })
        ));
    }
}

mod poly_a_grammar {
    use super::*;

    #[rstest]
    #[case("3:150/20", 3, 150, 20)]
    #[case("2:/5/5", 2, 5, 5)]
    fn accepts_segment_relative(
        #[case] raw: &str,
        #[case] segment: u32,
        #[case] pos: u64,
        #[case] count: u64,
    ) {
        let parsed = parse_poly_a(raw).unwrap();
        assert_eq!(
            parsed.position,
            PositionExpression::SegmentRelative { segment, pos }
        );
        assert_eq!(parsed.count, count);
    }

    #[rstest]
    #[case("5000/50", 5000, 50)]
    #[case("2/0", 2, 0)]
    fn accepts_global(#[case] raw: &str, #[case] pos: u64, #[case] count: u64) {
        let parsed = parse_poly_a(raw).unwrap();
        assert_eq!(parsed.position, PositionExpression::Global(pos));
        assert_eq!(parsed.count, count);
    }

    #[test]
    fn rejects_negative_count_with_invalid_count() {
        assert_eq!(
            parse_poly_a("3:150/-20").unwrap_err(),
            AtlasError::InvalidCount {
                raw: "-20".to_string()
            }
        );
    }

    #[rstest]
    #[case("3:150")]
    #[case("/x/5")]
    #[case("3:150/5.5")]
    #[case("0/5")]
    fn rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_poly_a(raw),
            Err(AtlasError::ExpressionSyntax { .. })
        ));
    }
}

mod selection_grammar {
    use super::*;

    #[rstest]
    #[case("1,2,3", vec![1, 2, 3])]
    #[case("1-5", vec![1, 2, 3, 4, 5])]
    #[case("1-3,5,7-9", vec![1, 2, 3, 5, 7, 8, 9])]
    #[case("5,1", vec![1, 5])]
    #[case("2,1-3", vec![1, 2, 3])]
    fn accepts(#[case] raw: &str, #[case] expected: Vec<u32>) {
        let t = table(9);
        assert_eq!(parse_selection(raw, &t).unwrap(), expected);
    }

    #[test]
    fn unknown_index_reports_table_size() {
        let t = table(2);
        assert_eq!(
            parse_selection("3", &t).unwrap_err(),
            AtlasError::SegmentOutOfRange { index: 3, max: 2 }
        );
    }

    #[rstest]
    #[case("")]
    #[case("1,,3")]
    #[case("1-")]
    #[case("4-2")]
    #[case("0-2")]
    #[case("one")]
    fn rejects(#[case] raw: &str) {
        let t = table(9);
        assert!(matches!(
            parse_selection(raw, &t),
            Err(AtlasError::ExpressionSyntax { .. })
        ));
    }
}

mod diagnostics {
    use super::*;

    #[test]
    fn syntax_errors_highlight_the_offending_span() {
        let err = parse_position("2:x10").unwrap_err();
        let AtlasError::ExpressionSyntax { span, raw, .. } = &err else {
            panic!("expected syntax error, got {:?}", err);
        };
        assert_eq!(raw, "2:x10");
        assert!(span.is_some());
        assert!(err.detailed_message().contains("^"));
    }
}
