use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tally_core::{logical_today, Clock, DeletionDirective, ParsedExpense, SystemClock};
use tracing::{info, warn};

use crate::assemble::assemble;
use crate::classify::{Classifier, DatasetClassifier, RuleChainClassifier};
use crate::dates::resolve_date;
use crate::deletion::DeletionGate;
use crate::taxonomy::{TaxonomyError, TaxonomySet};

/// Turns one message into a [`ParsedExpense`].
///
/// Order: deletion gate → date resolver → classifier → assembler. The
/// primary classifier is normally dataset-driven; if it is missing, or
/// panics on some input, the rule chain answers instead. Parsing itself
/// never fails.
#[derive(Clone)]
pub struct ExpenseParser {
    primary: Option<Arc<dyn Classifier>>,
    fallback: RuleChainClassifier,
    gate: DeletionGate,
    clock: Arc<dyn Clock>,
}

impl ExpenseParser {
    pub fn with_dataset(taxonomies: Arc<TaxonomySet>) -> Self {
        let gate = DeletionGate::new(taxonomies.deletable_categories());
        Self::with_classifier(Arc::new(DatasetClassifier::new(taxonomies)), gate)
    }

    pub fn with_classifier(classifier: Arc<dyn Classifier>, gate: DeletionGate) -> Self {
        Self {
            primary: Some(classifier),
            fallback: RuleChainClassifier::default(),
            gate,
            clock: Arc::new(SystemClock),
        }
    }

    /// Rule chain only.
    pub fn rule_chain() -> Self {
        Self {
            primary: None,
            fallback: RuleChainClassifier::default(),
            gate: DeletionGate::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use the dataset if it loaded, the rule chain otherwise.
    pub fn from_loaded(taxonomies: Result<TaxonomySet, TaxonomyError>) -> Self {
        match taxonomies {
            Ok(set) => {
                info!(
                    categories = set.categories.entries().len(),
                    places = set.places.entries().len(),
                    purposes = set.purposes.entries().len(),
                    "taxonomy loaded"
                );
                Self::with_dataset(Arc::new(set))
            }
            Err(e) => {
                warn!("taxonomy unavailable, using rule chain: {e}");
                Self::rule_chain()
            }
        }
    }

    pub fn builtin() -> Self {
        Self::from_loaded(TaxonomySet::builtin())
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_loaded(TaxonomySet::from_path(path))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn uses_dataset(&self) -> bool {
        self.primary.is_some()
    }

    pub fn parse(&self, text: &str) -> ParsedExpense {
        self.parse_at(text, self.clock.now())
    }

    pub fn parse_at(&self, text: &str, instant: DateTime<Utc>) -> ParsedExpense {
        if let Some(directive) = self.inspect_deletion_at(text, instant) {
            return directive.to_record();
        }
        self.parse_expense_at(text, instant)
    }

    pub fn inspect_deletion_at(
        &self,
        text: &str,
        instant: DateTime<Utc>,
    ) -> Option<DeletionDirective> {
        self.gate.inspect(text, logical_today(instant))
    }

    /// The expense path alone, without the deletion gate.
    pub fn parse_expense_at(&self, text: &str, instant: DateTime<Utc>) -> ParsedExpense {
        let date = resolve_date(text, logical_today(instant));
        let attributes = match &self.primary {
            Some(classifier) => match catch_unwind(AssertUnwindSafe(|| classifier.classify(text))) {
                Ok(attributes) => attributes,
                Err(_) => {
                    warn!("primary classifier panicked, falling back to rule chain");
                    self.fallback.classify(text)
                }
            },
            None => self.fallback.classify(text),
        };
        assemble(date, attributes, text)
    }
}

impl Default for ExpenseParser {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ExpenseParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseParser")
            .field("uses_dataset", &self.uses_dataset())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
