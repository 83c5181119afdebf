//! Extraction of exact monetary amounts from revenue lines.
//!
//! Expected line format: `<company name> <type> R$ <amount> <year>`, e.g.
//! `Aliança Esportes ME R$ 4.485.320.049,16 2002`. Amounts use `.` as the
//! thousands separator and `,` before exactly two fraction digits.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Marker that distinguishes monetary lines from anything else.
pub const CURRENCY_MARKER: &str = "R$";

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\$\s*([\d.,]+,\d{2})").expect("amount pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("monetary value not found in line: {line:?}")]
    NotFound { line: String },

    #[error("invalid monetary amount {amount:?} in line: {line:?}")]
    InvalidAmount { amount: String, line: String },

    #[error("non-positive monetary amount {amount} in line: {line:?}")]
    NonPositive { amount: Decimal, line: String },
}

/// Parse the monetary value out of one line of text.
///
/// Uses [`Decimal`] rather than floats so large currency amounts keep exact
/// cents through sorting and comparison.
///
/// # Errors
///
/// Returns [`ParseError`] when no amount pattern is present, the matched
/// text is not a valid decimal, or the amount is zero or negative.
pub fn parse_revenue(line: &str) -> Result<Decimal, ParseError> {
    let captures = AMOUNT_RE
        .captures(line)
        .ok_or_else(|| ParseError::NotFound {
            line: line.to_owned(),
        })?;
    let raw = &captures[1];

    // "4.485.320.049,16" -> "4485320049.16"
    let canonical = raw.replace('.', "").replace(',', ".");
    let amount: Decimal = canonical.parse().map_err(|_| ParseError::InvalidAmount {
        amount: raw.to_owned(),
        line: line.to_owned(),
    })?;

    if amount <= Decimal::ZERO {
        return Err(ParseError::NonPositive {
            amount,
            line: line.to_owned(),
        });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parses_grouped_amount_exactly() {
        let value = parse_revenue("Aliança Esportes ME R$ 4.485.320.049,16 2002").unwrap();
        assert_eq!(value, dec("4485320049.16"));
    }

    #[test]
    fn parses_small_amount_without_grouping() {
        assert_eq!(parse_revenue("B R$ 500,00").unwrap(), dec("500.00"));
    }

    #[test]
    fn keeps_cents_exact_for_large_amounts() {
        // f64 would already drift at this magnitude; Decimal must not.
        let value = parse_revenue("X SA R$ 92.233.720.368.547.758,07 1999").unwrap();
        assert_eq!(value, dec("92233720368547758.07"));
    }

    #[test]
    fn missing_marker_is_not_found() {
        let err = parse_revenue("Empresa sem faturamento 2001").unwrap_err();
        assert!(matches!(err, ParseError::NotFound { .. }));
    }

    #[test]
    fn non_numeric_amount_is_not_found() {
        // "abc" never matches the amount pattern, so the marker alone fails.
        let err = parse_revenue("C R$ abc").unwrap_err();
        assert!(matches!(err, ParseError::NotFound { .. }));
    }

    #[test]
    fn malformed_fraction_is_rejected() {
        // one fraction digit
        assert!(parse_revenue("D R$ 1.000,1").is_err());
        // no fraction at all
        assert!(parse_revenue("E R$ 1000").is_err());
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = parse_revenue("F R$ 0,00").unwrap_err();
        assert!(matches!(err, ParseError::NonPositive { .. }));
    }

    #[test]
    fn misplaced_separators_are_invalid() {
        // extra comma survives canonicalization and breaks decimal parsing
        let err = parse_revenue("G R$ 1,000,00").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount { .. }));
    }

    #[test]
    fn whitespace_after_marker_is_tolerated() {
        assert_eq!(parse_revenue("H R$    12,34").unwrap(), dec("12.34"));
    }

    #[test]
    fn error_carries_line_context() {
        let err = parse_revenue("I R$ zero").unwrap_err();
        assert!(err.to_string().contains("I R$ zero"));
    }

    mod proptest_money {
        use super::*;
        use proptest::prelude::*;

        fn group_thousands(int_part: u64) -> String {
            let digits = int_part.to_string();
            let bytes = digits.as_bytes();
            let mut grouped = String::new();
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 && (bytes.len() - i).is_multiple_of(3) {
                    grouped.push('.');
                }
                grouped.push(*b as char);
            }
            grouped
        }

        proptest! {
            #[test]
            fn grouped_amounts_round_trip(int_part in 0u64..1_000_000_000_000, cents in 0u8..100) {
                let line = format!("Empresa LTDA R$ {},{cents:02} 2010", group_thousands(int_part));
                let expected = Decimal::from(int_part) + Decimal::new(i64::from(cents), 2);
                let result = parse_revenue(&line);
                if expected > Decimal::ZERO {
                    prop_assert_eq!(result.unwrap(), expected);
                } else {
                    let rejected = matches!(result, Err(ParseError::NonPositive { .. }));
                    prop_assert!(rejected, "zero amount must be rejected as non-positive");
                }
            }

            #[test]
            fn never_panics(line in "\\PC{0,200}") {
                let _ = parse_revenue(&line);
            }

            #[test]
            fn parsed_amounts_are_positive(line in "\\PC{0,200}") {
                if let Ok(value) = parse_revenue(&line) {
                    prop_assert!(value > Decimal::ZERO);
                }
            }
        }
    }
}
