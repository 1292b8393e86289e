//! Calendar expansion: one [`CalendarDay`] per date in an inclusive range.

use chrono::{Datelike, NaiveDate};

use crate::model::CalendarDay;

/// Derive every calendar attribute for `date`.
pub fn calendar_day(date: NaiveDate) -> CalendarDay {
  let day_of_week = date.weekday().number_from_monday();
  let month = date.month();

  CalendarDay {
    full_date: date,
    date_key: i64::from(date.year()) * 10_000
      + i64::from(month) * 100
      + i64::from(date.day()),
    day_of_week,
    day_name: date.format("%A").to_string(),
    day_of_month: date.day(),
    day_of_year: date.ordinal(),
    week_of_year: date.iso_week().week(),
    month,
    month_name: date.format("%B").to_string(),
    quarter: quarter_of(month),
    year: date.year(),
    is_weekend: day_of_week >= 6,
  }
}

/// Quarter (1-4) of a month number (1-12).
pub fn quarter_of(month: u32) -> u32 { (month - 1) / 3 + 1 }

/// Expand `start..=end` into calendar days, ascending.
///
/// A reversed range yields nothing.
pub fn expand(start: NaiveDate, end: NaiveDate) -> Vec<CalendarDay> {
  if start > end {
    return Vec::new();
  }
  start
    .iter_days()
    .take_while(|date| *date <= end)
    .map(calendar_day)
    .collect()
}
