use tally_core::{DeletionScope, ParsedExpense};

pub const AMOUNT_NOT_FOUND: &str = "Amount not found. Please include amount like \"€8\".";

/// Human-readable reply for one parsed message.
pub fn summary(record: &ParsedExpense) -> String {
    if let Some(directive) = record.as_deletion() {
        return match &directive.scope {
            DeletionScope::Today => {
                format!("Delete request: today's ({}) expenses.", directive.date)
            }
            DeletionScope::Yesterday => {
                format!("Delete request: yesterday's ({}) expenses.", directive.date)
            }
            DeletionScope::Category(label) => {
                format!("Delete request: \"{label}\" category expenses.")
            }
            DeletionScope::All => "Delete request: all expense data.".to_string(),
        };
    }

    if !record.is_recordable() {
        return AMOUNT_NOT_FOUND.to_string();
    }

    format!(
        "Expense recorded.\n  Date:     {}\n  Amount:   {}\n  Category: {}\n  Place:    {}\n  Purpose:  {}",
        record.date, record.amount, record.category, record.place, record.purpose
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_parse::ExpenseParser;

    fn parse(text: &str) -> ParsedExpense {
        let instant = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        ExpenseParser::builtin().parse_at(text, instant)
    }

    #[test]
    fn recorded_expense_lists_fields() {
        let out = summary(&parse("Had kimchi stew for lunch today for €8"));
        assert!(out.starts_with("Expense recorded."));
        assert!(out.contains("Date:     2024-05-10"));
        assert!(out.contains("Amount:   €8"));
        assert!(out.contains("Category: Food"));
    }

    #[test]
    fn missing_amount_asks_for_one() {
        assert_eq!(summary(&parse("blah blah nothing useful")), AMOUNT_NOT_FOUND);
    }

    #[test]
    fn deletion_scopes() {
        assert_eq!(
            summary(&parse("delete today's data")),
            "Delete request: today's (2024-05-10) expenses."
        );
        assert_eq!(
            summary(&parse("delete yesterday's data")),
            "Delete request: yesterday's (2024-05-09) expenses."
        );
        assert_eq!(
            summary(&parse("delete food expenses")),
            "Delete request: \"Food\" category expenses."
        );
        assert_eq!(summary(&parse("delete all data")), "Delete request: all expense data.");
    }
}
