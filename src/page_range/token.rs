use log::debug;

/// One comma-separated unit of a range expression, with 1-based page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    Single(u32),
    /// Inclusive; `start > end` is allowed and left to the resolver.
    Span { start: u32, end: u32 },
}

impl RangeToken {
    /// Parse a single part like "5" or "3 - 7". Returns `None` for anything
    /// that is not a number or a pair of numbers.
    pub fn parse(part: &str) -> Option<Self> {
        let part = part.trim();

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page_number(start)?;
            let end = parse_page_number(end)?;
            Some(RangeToken::Span { start, end })
        } else {
            parse_page_number(part).map(RangeToken::Single)
        }
    }
}

fn parse_page_number(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

/// Parse a range expression like "1-3, 8, 10-11" into tokens, in the order
/// they appear.
///
/// Parsing is lenient: empty parts are skipped and malformed parts are
/// dropped, so this never fails. An empty or fully malformed expression
/// yields no tokens.
pub fn parse_range_expression(expr: &str) -> Vec<RangeToken> {
    let mut tokens = Vec::new();

    for part in expr.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match RangeToken::parse(part) {
            Some(token) => tokens.push(token),
            None => debug!("Ignoring malformed page range token {:?}", part),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_page() {
        assert_eq!(RangeToken::parse("5"), Some(RangeToken::Single(5)));
    }

    #[test]
    fn test_span() {
        assert_eq!(
            RangeToken::parse("1-5"),
            Some(RangeToken::Span { start: 1, end: 5 })
        );
    }

    #[test]
    fn test_whitespace_around_hyphen() {
        assert_eq!(
            RangeToken::parse("  3 -  7 "),
            Some(RangeToken::Span { start: 3, end: 7 })
        );
    }

    #[test]
    fn test_backward_span_is_kept() {
        assert_eq!(
            RangeToken::parse("5-3"),
            Some(RangeToken::Span { start: 5, end: 3 })
        );
    }

    #[test]
    fn test_malformed_parts() {
        assert_eq!(RangeToken::parse("abc"), None);
        assert_eq!(RangeToken::parse("xyz-3"), None);
        assert_eq!(RangeToken::parse("3-"), None);
        assert_eq!(RangeToken::parse("-3"), None);
        assert_eq!(RangeToken::parse("1-2-3"), None);
        assert_eq!(RangeToken::parse("2.5"), None);
    }

    #[test]
    fn test_overflow_is_malformed() {
        assert_eq!(RangeToken::parse("99999999999"), None);
    }

    #[test]
    fn test_expression_keeps_textual_order() {
        assert_eq!(
            parse_range_expression("1-3, 8, 10-11"),
            vec![
                RangeToken::Span { start: 1, end: 3 },
                RangeToken::Single(8),
                RangeToken::Span { start: 10, end: 11 },
            ]
        );
    }

    #[test]
    fn test_expression_skips_empty_and_malformed() {
        assert_eq!(
            parse_range_expression(" , abc,2,,xyz-3 ,"),
            vec![RangeToken::Single(2)]
        );
    }

    #[test]
    fn test_empty_expression() {
        assert!(parse_range_expression("").is_empty());
        assert!(parse_range_expression("   ").is_empty());
    }

    #[test]
    fn test_zero_is_a_token() {
        // Out-of-range numbers are the resolver's concern.
        assert_eq!(parse_range_expression("0"), vec![RangeToken::Single(0)]);
    }

    proptest! {
        #[test]
        fn prop_parse_is_deterministic(expr in "[0-9 ,a-z-]{0,40}") {
            prop_assert_eq!(parse_range_expression(&expr), parse_range_expression(&expr));
        }

        #[test]
        fn prop_parse_never_panics(expr in "\\PC{0,64}") {
            let _ = parse_range_expression(&expr);
        }
    }
}
