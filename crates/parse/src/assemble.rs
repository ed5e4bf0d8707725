use tally_core::{ExpenseDate, ParsedExpense};

use crate::classify::Attributes;

/// Combine the independently computed parts into the output record.
pub fn assemble(date: ExpenseDate, attributes: Attributes, text: &str) -> ParsedExpense {
    ParsedExpense {
        date,
        category: attributes.category,
        purpose: attributes.purpose,
        place: attributes.place,
        amount: attributes.amount,
        description: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tally_core::Money;

    #[test]
    fn fields_land_where_they_belong() {
        let attrs = Attributes {
            category: "Food".into(),
            place: "Cafe".into(),
            purpose: "Snack".into(),
            amount: Money::from_decimal(Decimal::new(450, 2)),
        };
        let record = assemble(ExpenseDate::new(2024, 5, 10), attrs, "  Coffee €4.50 ");
        assert_eq!(record.date.to_string(), "2024-05-10");
        assert_eq!(record.category, "Food");
        assert_eq!(record.place, "Cafe");
        assert_eq!(record.purpose, "Snack");
        assert_eq!(record.amount.to_string(), "€4.50");
        assert_eq!(record.description, "  Coffee €4.50 ");
        assert!(!record.is_deletion());
    }
}
