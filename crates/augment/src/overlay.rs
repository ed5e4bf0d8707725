use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tally_core::{ExpenseDate, Money, ParsedExpense, DELETE_PREFIX, FALLBACK_LABEL};
use tally_parse::TaxonomySet;
use tracing::{debug, warn};

use crate::backend::CompletionBackend;
use crate::error::{truncate, AugmentError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Labels offered to the service in the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLabels {
    pub categories: Vec<String>,
    pub purposes: Vec<String>,
    pub places: Vec<String>,
}

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn with_other(mut labels: Vec<String>) -> Vec<String> {
    if !labels.iter().any(|l| l == FALLBACK_LABEL) {
        labels.push(FALLBACK_LABEL.to_string());
    }
    labels
}

impl Default for PromptLabels {
    fn default() -> Self {
        Self {
            categories: owned(&[
                "Food", "Transportation", "Shopping", "Medical", "Communication", "Education",
                "Culture", "Other",
            ]),
            purposes: owned(&[
                "Meal", "Snack", "Party", "Personal Items", "Household Items", "Clothing",
                "Transport", "Medical", "Education", "Culture", "Other",
            ]),
            places: owned(&[
                "Home", "Office", "Cafe", "Restaurant", "Mart", "Online", "Hospital", "School",
                "Other",
            ]),
        }
    }
}

impl PromptLabels {
    pub fn from_taxonomies(set: &TaxonomySet) -> Self {
        Self {
            categories: with_other(set.categories.labels().map(str::to_string).collect()),
            purposes: with_other(set.purposes.labels().map(str::to_string).collect()),
            places: with_other(set.places.labels().map(str::to_string).collect()),
        }
    }
}

pub fn build_prompt(text: &str, labels: &PromptLabels) -> String {
    format!(
        r#"Extract expense information from the following English text:
"{text}"

Please respond in the following JSON format:
{{
  "date": "YYYY-MM-DD",
  "category": "{categories}",
  "purpose": "{purposes}",
  "place": "{places}",
  "amount": number,
  "description": "original text"
}}"#,
        categories = labels.categories.join("|"),
        purposes = labels.purposes.join("|"),
        places = labels.places.join("|"),
    )
}

/// Fields the service filled in. Anything absent, null, or unusable is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionFields {
    pub date: Option<ExpenseDate>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub place: Option<String>,
    pub amount: Option<Money>,
}

impl CompletionFields {
    pub fn is_empty(&self) -> bool {
        *self == CompletionFields::default()
    }
}

/// Find the first `{` … last `}` span in `raw` and read the fields from it.
///
/// The service is untrusted: each field is checked on its own, so one bad
/// value does not discard the others.
pub fn parse_completion(raw: &str) -> Result<CompletionFields> {
    let raw = raw.trim();
    let json_str = match (raw.find('{'), raw.rfind('}')) {
        (Some(s), Some(e)) if s < e => &raw[s..=e],
        _ => return Err(AugmentError::NoJson(truncate(raw))),
    };
    let map: Map<String, Value> = serde_json::from_str(json_str)?;

    Ok(CompletionFields {
        date: map.get("date").and_then(Value::as_str).and_then(calendar_date),
        category: map.get("category").and_then(label),
        purpose: map.get("purpose").and_then(label),
        place: map.get("place").and_then(label),
        amount: map.get("amount").and_then(positive_amount),
    })
}

fn calendar_date(s: &str) -> Option<ExpenseDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(ExpenseDate::from_naive)
}

/// A usable label: non-empty and not a deletion sentinel.
fn label(value: &Value) -> Option<String> {
    let s = value.as_str()?.trim();
    if s.is_empty() || s.starts_with(DELETE_PREFIX) {
        return None;
    }
    Some(s.to_string())
}

/// Zero, after rounding to cents, never replaces the base amount.
fn positive_amount(value: &Value) -> Option<Money> {
    let decimal = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok()?,
        Value::String(s) => Decimal::from_str(s.trim().trim_start_matches(&['€', '$'][..])).ok()?,
        _ => return None,
    };
    let money = Money::from_decimal(decimal);
    (!money.is_zero()).then_some(money)
}

/// Overwrite `base` with whatever the service supplied. `description` always
/// stays the user's text.
pub fn apply_overlay(base: ParsedExpense, fields: &CompletionFields) -> ParsedExpense {
    ParsedExpense {
        date: fields.date.unwrap_or(base.date),
        category: fields.category.clone().unwrap_or(base.category),
        purpose: fields.purpose.clone().unwrap_or(base.purpose),
        place: fields.place.clone().unwrap_or(base.place),
        amount: fields.amount.unwrap_or(base.amount),
        description: base.description,
    }
}

/// Best-effort refinement of a parsed expense by a completion service.
pub struct Augmenter<B: CompletionBackend> {
    backend: B,
    timeout: Duration,
    labels: PromptLabels,
}

impl<B: CompletionBackend> Augmenter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, timeout: DEFAULT_TIMEOUT, labels: PromptLabels::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_labels(mut self, labels: PromptLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &PromptLabels {
        &self.labels
    }

    /// Ask the service once, bounded by the timeout. No retries.
    pub async fn request_fields(&self, text: &str) -> Result<CompletionFields> {
        let prompt = build_prompt(text, &self.labels);
        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_| AugmentError::Timeout)??;
        parse_completion(&raw)
    }

    /// Never fails: on any error the base record comes back unchanged.
    /// Deletion directives are returned without contacting the service.
    pub async fn augment(&self, text: &str, base: ParsedExpense) -> ParsedExpense {
        if base.is_deletion() {
            return base;
        }
        match self.request_fields(text).await {
            Ok(fields) => {
                debug!(?fields, "applying completion overlay");
                apply_overlay(base, &fields)
            }
            Err(e) => {
                warn!("augmentation failed, keeping parsed result: {e}");
                base
            }
        }
    }
}
