use chrono::{Datelike, Days, NaiveDate};
use regex::Captures;
use tally_core::ExpenseDate;
use tracing::debug;

re!(re_last_year, r"last year\s*(\d{1,2})(?:/(\d{1,2}))?");
re!(re_this_year, r"(?:this year|current year)\s*(\d{1,2})(?:/(\d{1,2}))?");
// A slash pair that is not part of a longer slash-separated run.
re!(re_month_day, r"(?:^|[^\d/])(\d{1,2})/(\d{1,2})(?:[^\d/]|$)");
re!(re_full_date, r"(\d{4})/(\d{1,2})/(\d{1,2})");

/// Resolve the date an expense message refers to, relative to `today`.
///
/// Checks run in a fixed order and the first hit wins: yesterday, tomorrow,
/// today, "last year", "this year", `M/D`, `YYYY/M/D`. Without any hit the
/// result is `today`. Month and day numbers are copied as written, so
/// `2/30` stays `…-02-30`.
pub fn resolve_date(text: &str, today: NaiveDate) -> ExpenseDate {
    let lower = text.to_lowercase();
    let year = today.year();

    if lower.contains("yesterday") || lower.contains("last day") {
        debug!("date: yesterday");
        return shift(today, -1);
    }
    if lower.contains("tomorrow") || lower.contains("next day") {
        debug!("date: tomorrow");
        return shift(today, 1);
    }
    if lower.contains("today") || lower.contains("this day") {
        debug!("date: today");
        return today.into();
    }

    if lower.contains("last year") {
        debug!("date: last year");
        return try_year_relative(re_last_year().captures(&lower), year - 1)
            .unwrap_or_else(|| ExpenseDate::new(year - 1, 1, 1));
    }
    if lower.contains("this year") || lower.contains("current year") {
        if let Some(date) = try_year_relative(re_this_year().captures(&lower), year) {
            debug!("date: this year with month");
            return date;
        }
    }

    if let Some(date) = try_month_day(&lower, year) {
        debug!("date: month/day");
        return date;
    }
    if let Some(date) = try_full_date(&lower) {
        debug!("date: year/month/day");
        return date;
    }

    debug!("date: default today");
    today.into()
}

fn shift(today: NaiveDate, days: i64) -> ExpenseDate {
    let moved = if days < 0 {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    } else {
        today.checked_add_days(Days::new(days.unsigned_abs()))
    };
    moved.unwrap_or(today).into()
}

fn number(c: &Captures<'_>, idx: usize) -> Option<u32> {
    c.get(idx)?.as_str().parse().ok()
}

/// Month after the year phrase; day defaults to the 1st.
fn try_year_relative(c: Option<Captures<'_>>, year: i32) -> Option<ExpenseDate> {
    let c = c?;
    let month = number(&c, 1)?;
    let day = number(&c, 2).unwrap_or(1);
    Some(ExpenseDate::new(year, month, day))
}

fn try_month_day(text: &str, year: i32) -> Option<ExpenseDate> {
    let c = re_month_day().captures(text)?;
    Some(ExpenseDate::new(year, number(&c, 1)?, number(&c, 2)?))
}

fn try_full_date(text: &str) -> Option<ExpenseDate> {
    let c = re_full_date().captures(text)?;
    let year: i32 = c.get(1)?.as_str().parse().ok()?;
    Some(ExpenseDate::new(year, number(&c, 2)?, number(&c, 3)?))
}
