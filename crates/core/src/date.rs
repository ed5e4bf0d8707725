use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

/// A calendar date carried literally as year/month/day.
///
/// Values come straight from user text (`2/30`, `this year 13`), so they are
/// not checked against the calendar. Use [`ExpenseDate::to_naive`] when a real
/// date is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ExpenseDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        ExpenseDate { year, month, day }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        ExpenseDate { year: date.year(), month: date.month(), day: date.day() }
    }

    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn is_calendar_valid(self) -> bool {
        self.to_naive().is_some()
    }
}

impl From<NaiveDate> for ExpenseDate {
    fn from(date: NaiveDate) -> Self {
        ExpenseDate::from_naive(date)
    }
}

impl fmt::Display for ExpenseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for ExpenseDate {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || RecordError::InvalidDate(s.to_string());
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next().and_then(|p| p.parse::<i32>().ok()).ok_or_else(bad)?;
        let month = parts.next().and_then(|p| p.parse::<u32>().ok()).ok_or_else(bad)?;
        let day = parts.next().and_then(|p| p.parse::<u32>().ok()).ok_or_else(bad)?;
        Ok(ExpenseDate { year, month, day })
    }
}

impl Serialize for ExpenseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpenseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Logical clock ─────────────────────────────────────────────────────────────

/// Hours added to UTC to approximate Central European time.
///
/// Months 4–9 count as summer time (+2), everything else as winter time (+1).
/// The real transition Sundays in late March and October are not modelled.
pub fn seasonal_offset_hours(month: u32) -> i64 {
    if (4..=9).contains(&month) {
        2
    } else {
        1
    }
}

/// The wall-clock time expenses are booked against. The offset is chosen
/// from the UTC month of `instant`.
pub fn logical_now(instant: DateTime<Utc>) -> NaiveDateTime {
    let offset = Duration::hours(seasonal_offset_hours(instant.month()));
    instant.naive_utc() + offset
}

pub fn logical_today(instant: DateTime<Utc>) -> NaiveDate {
    logical_now(instant).date()
}

/// Source of the real-world instant. Injected so tests can pin "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
