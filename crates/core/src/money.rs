use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative expense amount. Zero means "no amount found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "WireAmount")]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

// Deserialized values go through `from_decimal` like every other amount.
#[derive(Deserialize)]
struct WireAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl From<WireAmount> for Money {
    fn from(wire: WireAmount) -> Self {
        Money::from_decimal(wire.0)
    }
}

impl Money {
    /// Negative inputs clamp to zero.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2).max(Decimal::ZERO).normalize())
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(decimal: Decimal) -> Self {
        Money::from_decimal(decimal)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract().is_zero() {
            write!(f, "€{}", self.0.trunc())
        } else {
            write!(f, "€{:.2}", self.0)
        }
    }
}
