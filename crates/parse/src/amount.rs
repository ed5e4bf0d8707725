use std::str::FromStr;

use rust_decimal::Decimal;
use tally_core::Money;

// Optional currency symbol, integer part, optional one or two decimals.
re!(re_amount, r"[€$]?(\d+(?:\.\d{1,2})?)");

/// The largest number mentioned in `text`, or zero.
///
/// Messages can carry several numbers (quantities, dates, phone fragments);
/// the expense is taken to be the biggest one. That heuristic misfires on
/// text like "2 coffees for €3" when the quantity is larger, which callers
/// have to live with. Digit runs too long for a `Decimal` (29 digits and
/// up, e.g. reference numbers) are skipped rather than winning.
pub fn extract_amount(text: &str) -> Money {
    re_amount()
        .captures_iter(text)
        .filter_map(|c| Decimal::from_str(c.get(1)?.as_str()).ok())
        .max()
        .map(Money::from_decimal)
        .unwrap_or_else(Money::zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn no_digits_means_zero() {
        assert!(extract_amount("blah blah nothing useful").is_zero());
        assert!(extract_amount("").is_zero());
        assert!(extract_amount("€ for lunch").is_zero());
    }

    #[test]
    fn euro_prefixed_integer() {
        assert_eq!(extract_amount("Had kimchi stew for lunch today for €8"), money("8"));
    }

    #[test]
    fn single_decimal_digit() {
        assert_eq!(extract_amount("Paid €1.5 for subway"), money("1.5"));
    }

    #[test]
    fn dollar_with_cents() {
        assert_eq!(extract_amount("book $12.99"), money("12.99"));
    }

    #[test]
    fn bare_number_without_symbol() {
        assert_eq!(extract_amount("taxi 23"), money("23"));
    }

    #[test]
    fn largest_of_several_numbers_wins() {
        assert_eq!(extract_amount("3 coffees for €4.50 and a cake for €12"), money("12"));
        assert_eq!(extract_amount("€5 €50 €0.5"), money("50"));
    }

    #[test]
    fn extra_decimals_are_cut_at_two() {
        // "1.234" matches "1.23" and then "4".
        assert_eq!(extract_amount("paid 1.234"), money("1.23"));
    }

    #[test]
    fn oversized_digit_runs_are_skipped() {
        assert_eq!(extract_amount("ref 123456789012345678901234567890 paid €5"), money("5"));
    }

    #[test]
    fn numbers_inside_dates_are_known_false_positives() {
        assert_eq!(extract_amount("lunch on 5/10 for €8"), money("10"));
    }
}
