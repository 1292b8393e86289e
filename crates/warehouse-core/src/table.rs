//! Table identities and the storage-neutral row representation.
//!
//! Loaders describe what to write as a [`Row`] of named [`Value`]s against a
//! [`Table`]. Backends translate those into their own parameter types; nothing
//! in here knows about SQL.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Every table of the star schema this system writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
  Calendar,
  Organization,
  Topic,
  RoundType,
  Question,
  InterviewEvent,
}

impl Table {
  /// Dimensions first, then the fact table.
  pub const ALL: [Table; 6] = [
    Self::Calendar,
    Self::Organization,
    Self::Topic,
    Self::RoundType,
    Self::Question,
    Self::InterviewEvent,
  ];

  /// Physical table name.
  pub fn name(self) -> &'static str {
    match self {
      Self::Calendar => "dim_time",
      Self::Organization => "dim_companies",
      Self::Topic => "dim_topics",
      Self::RoundType => "dim_round_types",
      Self::Question => "dim_questions",
      Self::InterviewEvent => "fact_interview_events",
    }
  }

  /// Column holding the caller-supplied business key. `None` for the fact
  /// table, which has no single-column natural key.
  pub fn natural_key_column(self) -> Option<&'static str> {
    match self {
      Self::Calendar => Some("full_date"),
      Self::Organization => Some("company_id"),
      Self::Topic => Some("topic_id"),
      Self::RoundType => Some("round_type_id"),
      Self::Question => Some("question_id"),
      Self::InterviewEvent => None,
    }
  }

  /// Column holding the store-side identifier.
  pub fn surrogate_key_column(self) -> &'static str {
    match self {
      Self::Calendar => "date_key",
      Self::Organization => "company_key",
      Self::Topic => "topic_key",
      Self::RoundType => "round_type_key",
      Self::Question => "question_key",
      Self::InterviewEvent => "event_key",
    }
  }

  pub fn is_dimension(self) -> bool { !matches!(self, Self::InterviewEvent) }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// An identifier assigned by the store (or, for the calendar, derived from
/// the date). Never fabricated by a loader.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SurrogateKey(pub i64);

impl fmt::Display for SurrogateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Restricts which rows a bulk key lookup returns.
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
  /// Only topics at this hierarchy level. Topic table only.
  pub topic_level: Option<u8>,
  /// Only calendar days on or after this date. Calendar table only.
  pub date_from:   Option<NaiveDate>,
  /// Only calendar days on or before this date. Calendar table only.
  pub date_to:     Option<NaiveDate>,
  /// At most this many rows, lowest surrogate keys first.
  pub limit:       Option<usize>,
}

impl KeyFilter {
  pub fn all() -> Self { Self::default() }

  pub fn topic_level(level: u8) -> Self {
    Self { topic_level: Some(level), ..Self::default() }
  }

  /// Check that every set field applies to `table`.
  pub fn check(&self, table: Table) -> crate::Result<()> {
    if self.topic_level.is_some() && table != Table::Topic {
      return Err(crate::Error::UnsupportedFilter { table, filter: "topic_level" });
    }
    if (self.date_from.is_some() || self.date_to.is_some())
      && table != Table::Calendar
    {
      return Err(crate::Error::UnsupportedFilter { table, filter: "date window" });
    }
    Ok(())
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A single column value, independent of any backend's type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  Null,
  Integer(i64),
  Text(String),
  Bool(bool),
  Date(NaiveDate),
}

impl From<i64> for Value {
  fn from(v: i64) -> Self { Self::Integer(v) }
}

impl From<u32> for Value {
  fn from(v: u32) -> Self { Self::Integer(v.into()) }
}

impl From<u8> for Value {
  fn from(v: u8) -> Self { Self::Integer(v.into()) }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<String> for Value {
  fn from(v: String) -> Self { Self::Text(v) }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self { Self::Text(v.to_owned()) }
}

impl From<NaiveDate> for Value {
  fn from(v: NaiveDate) -> Self { Self::Date(v) }
}

impl From<SurrogateKey> for Value {
  fn from(v: SurrogateKey) -> Self { Self::Integer(v.0) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

/// An ordered list of `(column, value)` pairs destined for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
  columns: Vec<(&'static str, Value)>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
    self.columns.push((column, value.into()));
    self
  }

  pub fn columns(&self) -> &[(&'static str, Value)] { &self.columns }

  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .columns
      .iter()
      .find(|(name, _)| *name == column)
      .map(|(_, value)| value)
  }

  pub fn into_columns(self) -> Vec<(&'static str, Value)> { self.columns }
}

// ─── Load outcomes ───────────────────────────────────────────────────────────

/// Result of an insert-or-skip write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  Inserted,
  /// A row with the same natural key already exists; nothing was written.
  Skipped,
}

/// Tally of upsert outcomes for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
  pub inserted: usize,
  pub skipped:  usize,
}

impl LoadReport {
  pub fn record(&mut self, outcome: UpsertOutcome) {
    match outcome {
      UpsertOutcome::Inserted => self.inserted += 1,
      UpsertOutcome::Skipped => self.skipped += 1,
    }
  }

  pub fn merge(&mut self, other: LoadReport) {
    self.inserted += other.inserted;
    self.skipped += other.skipped;
  }

  pub fn total(&self) -> usize { self.inserted + self.skipped }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fact_table_has_no_natural_key() {
    assert!(Table::InterviewEvent.natural_key_column().is_none());
    assert!(!Table::InterviewEvent.is_dimension());
    assert_eq!(Table::Topic.natural_key_column(), Some("topic_id"));
  }

  #[test]
  fn key_filter_rejects_misapplied_fields() {
    assert!(KeyFilter::topic_level(2).check(Table::Topic).is_ok());
    assert!(matches!(
      KeyFilter::topic_level(2).check(Table::Question),
      Err(crate::Error::UnsupportedFilter { table: Table::Question, .. })
    ));

    let window = KeyFilter {
      date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
      ..KeyFilter::default()
    };
    assert!(window.check(Table::Calendar).is_ok());
    assert!(window.check(Table::Organization).is_err());
  }

  #[test]
  fn optional_values_become_null() {
    let row = Row::new()
      .with("parent", None::<SurrogateKey>)
      .with("level", 1u8);
    assert_eq!(row.get("parent"), Some(&Value::Null));
    assert_eq!(row.get("level"), Some(&Value::Integer(1)));
    assert_eq!(row.get("missing"), None);
  }

  #[test]
  fn load_report_tallies_outcomes() {
    let mut report = LoadReport::default();
    report.record(UpsertOutcome::Inserted);
    report.record(UpsertOutcome::Skipped);
    report.record(UpsertOutcome::Skipped);
    assert_eq!(report, LoadReport { inserted: 1, skipped: 2 });
    assert_eq!(report.total(), 3);
  }
}
