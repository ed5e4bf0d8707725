use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_core::FALLBACK_LABEL;
use thiserror::Error;

use crate::deletion::DEFAULT_DELETABLE_CATEGORIES;

const BUILTIN_TAXONOMY: &str = include_str!("../data/taxonomy.toml");

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse taxonomy TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Taxonomy section '{0}' has no labels")]
    EmptySection(&'static str),
    #[error("Taxonomy section '{section}' has an entry with an empty label")]
    EmptyLabel { section: &'static str },
    #[error("Taxonomy section '{section}' lists '{label}' more than once")]
    DuplicateLabel { section: &'static str, label: String },
    #[error("Label '{label}' in section '{section}' has a blank keyword")]
    BlankKeyword { section: &'static str, label: String },
}

/// One label and the keywords that vote for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub label: String,
    pub keywords: Vec<String>,
}

/// Best label for a text and how many of its keywords occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub label: &'a str,
    pub score: usize,
}

/// An ordered list of labels. Entry order breaks ties.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    pub fn new(entries: Vec<TaxonomyEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| TaxonomyEntry {
                label: e.label.trim().to_string(),
                keywords: e.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Score every label by the number of its keywords found in `text`
    /// (case-insensitive substring) and keep the strictly highest. Labels
    /// that only tie an earlier one lose. Nothing matched gives `Other`.
    pub fn classify(&self, text: &str) -> Classification<'_> {
        let lower = text.to_lowercase();
        let mut best = Classification { label: FALLBACK_LABEL, score: 0 };
        for entry in &self.entries {
            let score = entry.keywords.iter().filter(|k| lower.contains(k.as_str())).count();
            if score > best.score {
                best = Classification { label: &entry.label, score };
            }
        }
        best
    }

    fn validate(&self, section: &'static str) -> Result<(), TaxonomyError> {
        if self.entries.is_empty() {
            return Err(TaxonomyError::EmptySection(section));
        }
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.label.is_empty() {
                return Err(TaxonomyError::EmptyLabel { section });
            }
            if !seen.insert(entry.label.as_str()) {
                return Err(TaxonomyError::DuplicateLabel { section, label: entry.label.clone() });
            }
            if entry.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(TaxonomyError::BlankKeyword { section, label: entry.label.clone() });
            }
        }
        Ok(())
    }
}

/// The three keyword tables the classifier scores against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomySet {
    pub categories: Taxonomy,
    pub places: Taxonomy,
    pub purposes: Taxonomy,
}

impl TaxonomySet {
    /// The table compiled into the crate.
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::from_toml(BUILTIN_TAXONOMY)
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, TaxonomyError> {
        let raw: TaxonomySet = toml::from_str(toml_content)?;
        let set = TaxonomySet {
            categories: Taxonomy::new(raw.categories.entries),
            places: Taxonomy::new(raw.places.entries),
            purposes: Taxonomy::new(raw.purposes.entries),
        };
        set.categories.validate("categories")?;
        set.places.validate("places")?;
        set.purposes.validate("purposes")?;
        Ok(set)
    }

    pub fn from_path(path: &Path) -> Result<Self, TaxonomyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Category labels a deletion can target: the fixed deletable list in
    /// its own order, then any dataset labels it does not already name.
    pub fn deletable_categories(&self) -> Vec<String> {
        let mut labels: Vec<String> =
            DEFAULT_DELETABLE_CATEGORIES.iter().map(|c| c.to_string()).collect();
        for label in self.categories.labels() {
            if !labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
                labels.push(label.to_string());
            }
        }
        labels
    }
}
