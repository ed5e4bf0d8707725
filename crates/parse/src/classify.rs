use std::sync::Arc;

use tally_core::Money;
use tracing::debug;

use crate::amount::extract_amount;
use crate::rules::RuleChain;
use crate::taxonomy::TaxonomySet;

/// Everything about an expense except its date and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub category: String,
    pub place: String,
    pub purpose: String,
    pub amount: Money,
}

/// A strategy for labelling an expense message.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Attributes;
}

/// Scores the message against keyword tables loaded from data.
#[derive(Debug, Clone)]
pub struct DatasetClassifier {
    taxonomies: Arc<TaxonomySet>,
}

impl DatasetClassifier {
    pub fn new(taxonomies: Arc<TaxonomySet>) -> Self {
        Self { taxonomies }
    }

    pub fn taxonomies(&self) -> &TaxonomySet {
        &self.taxonomies
    }
}

impl Classifier for DatasetClassifier {
    fn classify(&self, text: &str) -> Attributes {
        let category = self.taxonomies.categories.classify(text);
        let place = self.taxonomies.places.classify(text);
        let purpose = self.taxonomies.purposes.classify(text);
        debug!(
            category = category.label,
            category_score = category.score,
            place = place.label,
            place_score = place.score,
            purpose = purpose.label,
            purpose_score = purpose.score,
            "dataset classification"
        );
        Attributes {
            category: category.label.to_string(),
            place: place.label.to_string(),
            purpose: purpose.label.to_string(),
            amount: extract_amount(text),
        }
    }
}

/// Fixed priority chains, used when no dataset is available.
#[derive(Debug, Clone)]
pub struct RuleChainClassifier {
    categories: RuleChain,
    places: RuleChain,
    purposes: RuleChain,
}

impl Default for RuleChainClassifier {
    fn default() -> Self {
        Self {
            categories: RuleChain::categories(),
            places: RuleChain::places(),
            purposes: RuleChain::purposes(),
        }
    }
}

impl Classifier for RuleChainClassifier {
    fn classify(&self, text: &str) -> Attributes {
        let attrs = Attributes {
            category: self.categories.classify(text).to_string(),
            place: self.places.classify(text).to_string(),
            purpose: self.purposes.classify(text).to_string(),
            amount: extract_amount(text),
        };
        debug!(
            category = %attrs.category,
            place = %attrs.place,
            purpose = %attrs.purpose,
            "rule-chain classification"
        );
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dataset() -> DatasetClassifier {
        DatasetClassifier::new(Arc::new(TaxonomySet::builtin().unwrap()))
    }

    const SCENARIOS: [(&str, &str, &str, &str); 4] = [
        ("Had kimchi stew for lunch today for €8", "Food", "Other", "Meal"),
        ("Paid €1.5 for subway commute", "Transportation", "Other", "Transportation"),
        ("coffee at starbucks €4", "Food", "Cafe", "Snack"),
        ("blah blah nothing useful", "Other", "Other", "Other"),
    ];

    #[test]
    fn both_strategies_agree_on_common_messages() {
        let strategies: [(&str, Box<dyn Classifier>); 2] = [
            ("dataset", Box::new(dataset())),
            ("rule-chain", Box::new(RuleChainClassifier::default())),
        ];
        for (name, classifier) in &strategies {
            for (text, category, place, purpose) in SCENARIOS {
                let attrs = classifier.classify(text);
                assert_eq!(attrs.category, category, "{name}: {text}");
                assert_eq!(attrs.place, place, "{name}: {text}");
                assert_eq!(attrs.purpose, purpose, "{name}: {text}");
            }
        }
    }

    #[test]
    fn rule_chain_purpose_for_subway_is_other() {
        // The dataset table knows "subway" as a commute word, the chain does not.
        let attrs = RuleChainClassifier::default().classify("Paid €1.5 for subway");
        assert_eq!(attrs.purpose, "Other");
    }

    #[test]
    fn dataset_prefers_more_keyword_hits_over_priority() {
        // One Food hit ("drink") against three Communication hits.
        let text = "drink while on a phone call about my mobile plan";
        assert_eq!(dataset().classify(text).category, "Communication");
        assert_eq!(RuleChainClassifier::default().classify(text).category, "Food");
    }

    #[test]
    fn amount_is_extracted_by_both() {
        let expected = Money::from_decimal(Decimal::new(15, 1));
        assert_eq!(dataset().classify("Paid €1.5 for subway").amount, expected);
        let chain = RuleChainClassifier::default();
        assert_eq!(chain.classify("Paid €1.5 for subway").amount, expected);
    }
}
