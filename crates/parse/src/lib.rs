// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod amount;
pub mod assemble;
pub mod classify;
pub mod dates;
pub mod deletion;
pub mod pipeline;
pub mod rules;
pub mod taxonomy;

pub use amount::extract_amount;
pub use assemble::assemble;
pub use classify::{Attributes, Classifier, DatasetClassifier, RuleChainClassifier};
pub use dates::resolve_date;
pub use deletion::{DeletionGate, DEFAULT_DELETABLE_CATEGORIES};
pub use pipeline::ExpenseParser;
pub use rules::{ChainRule, RuleChain};
pub use taxonomy::{Classification, Taxonomy, TaxonomyEntry, TaxonomyError, TaxonomySet};
