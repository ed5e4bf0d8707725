use chrono::{Days, NaiveDate};
use tally_core::{DeletionDirective, DeletionScope, ExpenseDate, FALLBACK_LABEL};
use tracing::debug;

re!(re_delete_trigger, r"(?i)\b(?:delete|remove|clear|erase)\b");

/// Category labels a deletion can name, in match order. Dataset labels not
/// listed here are tried after these.
pub const DEFAULT_DELETABLE_CATEGORIES: [&str; 8] = [
    "Food",
    "Transportation",
    "Shopping",
    "Medical",
    "Communication",
    "Education",
    "Culture",
    FALLBACK_LABEL,
];

/// Recognises "delete …" commands before any expense parsing happens.
///
/// Trigger words must stand alone: unlike a plain substring test,
/// "deleted scenes dvd €5" is an expense, not a command.
#[derive(Debug, Clone)]
pub struct DeletionGate {
    categories: Vec<String>,
}

impl Default for DeletionGate {
    fn default() -> Self {
        Self::new(DEFAULT_DELETABLE_CATEGORIES.iter().map(|c| c.to_string()).collect())
    }
}

impl DeletionGate {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_delete_command(text: &str) -> bool {
        re_delete_trigger().is_match(text)
    }

    /// `None` means the text is not a deletion command; parsing continues.
    ///
    /// Scope precedence: today, yesterday, a named category, everything.
    pub fn inspect(&self, text: &str, today: NaiveDate) -> Option<DeletionDirective> {
        if !Self::is_delete_command(text) {
            return None;
        }
        let lower = text.to_lowercase();

        let (scope, date) = if lower.contains("today") {
            (DeletionScope::Today, today)
        } else if lower.contains("yesterday") {
            let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
            (DeletionScope::Yesterday, yesterday)
        } else if let Some(category) =
            self.categories.iter().find(|c| lower.contains(&c.to_lowercase()))
        {
            (DeletionScope::Category(category.clone()), today)
        } else {
            (DeletionScope::All, today)
        };

        debug!(scope = %scope, "deletion command recognised");
        Some(DeletionDirective {
            scope,
            date: ExpenseDate::from_naive(date),
            description: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn scope_of(text: &str) -> Option<String> {
        DeletionGate::default().inspect(text, today()).map(|d| d.scope.sentinel())
    }

    #[test]
    fn non_commands_pass_through() {
        assert_eq!(scope_of("Had kimchi stew for lunch today for €8"), None);
        assert_eq!(scope_of("deleted scenes dvd €5"), None);
        assert_eq!(scope_of("nuclear museum ticket"), None);
    }

    #[test]
    fn delete_today() {
        let d = DeletionGate::default().inspect("delete today's data", today()).unwrap();
        assert_eq!(d.scope, DeletionScope::Today);
        assert_eq!(d.date.to_string(), "2024-05-10");
        assert_eq!(d.description, "delete today's data");
    }

    #[test]
    fn delete_yesterday() {
        let d = DeletionGate::default().inspect("delete yesterday's data", today()).unwrap();
        assert_eq!(d.scope, DeletionScope::Yesterday);
        assert_eq!(d.date.to_string(), "2024-05-09");
    }

    #[test]
    fn today_takes_precedence() {
        assert_eq!(scope_of("delete all of today"), Some("DELETE_TODAY".into()));
        assert_eq!(scope_of("remove food from today and yesterday"), Some("DELETE_TODAY".into()));
        assert_eq!(scope_of("erase yesterday's food"), Some("DELETE_YESTERDAY".into()));
    }

    #[test]
    fn delete_category() {
        assert_eq!(scope_of("delete food expenses"), Some("DELETE_Food".into()));
        assert_eq!(scope_of("Remove Transportation"), Some("DELETE_Transportation".into()));
        assert_eq!(scope_of("clear other stuff"), Some("DELETE_Other".into()));
    }

    #[test]
    fn delete_all_is_the_catch_all() {
        assert_eq!(scope_of("delete all data"), Some("DELETE_ALL".into()));
        assert_eq!(scope_of("please erase everything"), Some("DELETE_ALL".into()));
    }

    #[test]
    fn custom_categories_are_used() {
        let gate = DeletionGate::new(vec!["Groceries".into()]);
        let d = gate.inspect("delete groceries", today()).unwrap();
        assert_eq!(d.scope, DeletionScope::Category("Groceries".into()));
        assert_eq!(gate.inspect("delete food", today()).unwrap().scope, DeletionScope::All);
    }
}
