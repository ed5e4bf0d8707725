use chrono::{DateTime, Utc};
use tally_core::ParsedExpense;
use tally_parse::ExpenseParser;

use crate::backend::CompletionBackend;
use crate::overlay::Augmenter;

/// The deterministic parser with an optional completion overlay on top.
///
/// [`AugmentedParser::parse`] never touches the network; only
/// [`AugmentedParser::parse_augmented`] awaits the service.
pub struct AugmentedParser<B: CompletionBackend> {
    parser: ExpenseParser,
    augmenter: Option<Augmenter<B>>,
}

impl<B: CompletionBackend> AugmentedParser<B> {
    pub fn new(parser: ExpenseParser, augmenter: Option<Augmenter<B>>) -> Self {
        Self { parser, augmenter }
    }

    pub fn parser(&self) -> &ExpenseParser {
        &self.parser
    }

    pub fn is_augmenting(&self) -> bool {
        self.augmenter.is_some()
    }

    pub fn parse(&self, text: &str) -> ParsedExpense {
        self.parser.parse(text)
    }

    pub async fn parse_augmented(&self, text: &str) -> ParsedExpense {
        let base = self.parser.parse(text);
        self.overlay(text, base).await
    }

    pub async fn parse_augmented_at(&self, text: &str, instant: DateTime<Utc>) -> ParsedExpense {
        let base = self.parser.parse_at(text, instant);
        self.overlay(text, base).await
    }

    async fn overlay(&self, text: &str, base: ParsedExpense) -> ParsedExpense {
        match &self.augmenter {
            Some(augmenter) => augmenter.augment(text, base).await,
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockCompletion;
    use chrono::TimeZone;
    use std::time::Duration;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn with_backend(backend: MockCompletion) -> AugmentedParser<MockCompletion> {
        AugmentedParser::new(ExpenseParser::builtin(), Some(Augmenter::new(backend)))
    }

    const INPUTS: [&str; 4] = [
        "Had kimchi stew for lunch today for €8",
        "Paid €1.5 for subway",
        "blah blah nothing useful",
        "delete food expenses",
    ];

    #[tokio::test]
    async fn forced_failure_matches_unaugmented_result() {
        let failing = with_backend(MockCompletion::Fail);
        let plain = ExpenseParser::builtin();
        for text in INPUTS {
            assert_eq!(
                failing.parse_augmented_at(text, instant()).await,
                plain.parse_at(text, instant()),
                "{text}"
            );
        }
    }

    #[tokio::test]
    async fn timeout_matches_unaugmented_result() {
        let parser = AugmentedParser::new(
            ExpenseParser::builtin(),
            Some(
                Augmenter::new(MockCompletion::Stall(Duration::from_secs(5), "{}".into()))
                    .with_timeout(Duration::from_millis(20)),
            ),
        );
        let text = INPUTS[0];
        assert_eq!(
            parser.parse_augmented_at(text, instant()).await,
            ExpenseParser::builtin().parse_at(text, instant())
        );
    }

    #[tokio::test]
    async fn successful_overlay_refines_place() {
        let parser = with_backend(MockCompletion::reply(r#"{"place": "Restaurant"}"#));
        let r = parser.parse_augmented_at(INPUTS[0], instant()).await;
        assert_eq!(r.place, "Restaurant");
        assert_eq!(r.category, "Food");
        assert_eq!(r.date.to_string(), "2024-05-10");
    }

    #[tokio::test]
    async fn deletion_is_not_augmented() {
        let parser = with_backend(MockCompletion::reply(r#"{"category": "Food"}"#));
        let r = parser.parse_augmented_at("delete food expenses", instant()).await;
        assert_eq!(r.category, "DELETE_Food");
    }

    #[tokio::test]
    async fn without_augmenter_returns_base() {
        let parser: AugmentedParser<MockCompletion> =
            AugmentedParser::new(ExpenseParser::builtin(), None);
        assert!(!parser.is_augmenting());
        let r = parser.parse_augmented_at(INPUTS[1], instant()).await;
        assert_eq!(r, ExpenseParser::builtin().parse_at(INPUTS[1], instant()));
    }
}
