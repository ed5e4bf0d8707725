use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::ExpenseDate;
use crate::error::RecordError;
use crate::money::Money;

/// Label used when no keyword of a taxonomy matched.
pub const FALLBACK_LABEL: &str = "Other";

/// Prefix that marks a record as a deletion directive rather than an expense.
pub const DELETE_PREFIX: &str = "DELETE_";

/// The structured result of parsing one message.
///
/// Expenses and deletion directives share this shape; callers branch on
/// [`ParsedExpense::is_deletion`] (a `DELETE_` prefix on `category`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedExpense {
    pub date: ExpenseDate,
    pub category: String,
    pub purpose: String,
    pub place: String,
    pub amount: Money,
    /// The input message, verbatim.
    pub description: String,
}

impl ParsedExpense {
    pub fn is_deletion(&self) -> bool {
        self.category.starts_with(DELETE_PREFIX)
    }

    /// Worth storing: an expense with an amount. Deletions never are.
    pub fn is_recordable(&self) -> bool {
        !self.is_deletion() && !self.amount.is_zero()
    }

    /// Recover the directive from a record whose category carries a sentinel.
    pub fn as_deletion(&self) -> Option<DeletionDirective> {
        let scope = self.category.parse::<DeletionScope>().ok()?;
        Some(DeletionDirective {
            scope,
            date: self.date,
            description: self.description.clone(),
        })
    }
}

/// What a deletion command targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeletionScope {
    Today,
    Yesterday,
    /// Every expense with this category label.
    Category(String),
    All,
}

impl DeletionScope {
    pub fn sentinel(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeletionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionScope::Today => write!(f, "{DELETE_PREFIX}TODAY"),
            DeletionScope::Yesterday => write!(f, "{DELETE_PREFIX}YESTERDAY"),
            DeletionScope::Category(label) => write!(f, "{DELETE_PREFIX}{label}"),
            DeletionScope::All => write!(f, "{DELETE_PREFIX}ALL"),
        }
    }
}

impl FromStr for DeletionScope {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(DELETE_PREFIX) {
            Some("TODAY") => Ok(DeletionScope::Today),
            Some("YESTERDAY") => Ok(DeletionScope::Yesterday),
            Some("ALL") => Ok(DeletionScope::All),
            Some(label) if !label.is_empty() => Ok(DeletionScope::Category(label.to_string())),
            _ => Err(RecordError::UnknownSentinel(s.to_string())),
        }
    }
}

/// A bulk delete request recognised in place of an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionDirective {
    pub scope: DeletionScope,
    /// The day targeted by `Today`/`Yesterday`; logical-today otherwise.
    pub date: ExpenseDate,
    pub description: String,
}

impl DeletionDirective {
    /// The sentinel goes into all three label fields and the amount is zero.
    pub fn to_record(&self) -> ParsedExpense {
        let sentinel = self.scope.sentinel();
        ParsedExpense {
            date: self.date,
            category: sentinel.clone(),
            purpose: sentinel.clone(),
            place: sentinel,
            amount: Money::zero(),
            description: self.description.clone(),
        }
    }
}

impl From<DeletionDirective> for ParsedExpense {
    fn from(directive: DeletionDirective) -> Self {
        directive.to_record()
    }
}
