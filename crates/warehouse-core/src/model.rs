//! Star-schema records.
//!
//! Dimension records are what loaders write; each knows its table, its
//! natural key, and how to flatten itself into a [`Row`]. Surrogate keys are
//! never part of a dimension record except as references to rows that already
//! exist (a topic's parent, a question's topic).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::{Row, SurrogateKey, Table};

/// A record that belongs to a dimension table and is reconciled by natural
/// key.
pub trait DimensionRecord {
  const TABLE: Table;

  fn natural_key(&self) -> String;

  /// All columns to insert, natural key included.
  fn to_row(&self) -> Row;
}

// ─── Calendar ────────────────────────────────────────────────────────────────

/// One calendar day with its derived attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
  pub full_date:    NaiveDate,
  /// `YYYYMMDD` as an integer; doubles as the surrogate key.
  pub date_key:     i64,
  /// ISO weekday, 1 = Monday through 7 = Sunday.
  pub day_of_week:  u32,
  pub day_name:     String,
  pub day_of_month: u32,
  pub day_of_year:  u32,
  /// ISO 8601 week number.
  pub week_of_year: u32,
  pub month:        u32,
  pub month_name:   String,
  pub quarter:      u32,
  pub year:         i32,
  pub is_weekend:   bool,
}

impl DimensionRecord for CalendarDay {
  const TABLE: Table = Table::Calendar;

  fn natural_key(&self) -> String { self.full_date.format("%Y-%m-%d").to_string() }

  fn to_row(&self) -> Row {
    Row::new()
      .with("date_key", self.date_key)
      .with("full_date", self.full_date)
      .with("day_of_week", self.day_of_week)
      .with("day_name", self.day_name.as_str())
      .with("day_of_month", self.day_of_month)
      .with("day_of_year", self.day_of_year)
      .with("week_of_year", self.week_of_year)
      .with("month", self.month)
      .with("month_name", self.month_name.as_str())
      .with("quarter", self.quarter)
      .with("year", i64::from(self.year))
      .with("is_weekend", self.is_weekend)
  }
}

// ─── Organization ────────────────────────────────────────────────────────────

/// A hiring organisation. Flat dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
  pub code:             String,
  pub name:             String,
  pub industry:         String,
  pub size_tier:        String,
  pub location:         String,
  pub is_product_based: bool,
}

impl DimensionRecord for Organization {
  const TABLE: Table = Table::Organization;

  fn natural_key(&self) -> String { self.code.clone() }

  fn to_row(&self) -> Row {
    Row::new()
      .with("company_id", self.code.as_str())
      .with("company_name", self.name.as_str())
      .with("industry", self.industry.as_str())
      .with("company_size", self.size_tier.as_str())
      .with("location", self.location.as_str())
      .with("is_product_based", self.is_product_based)
  }
}

// ─── Topic ───────────────────────────────────────────────────────────────────

/// A node of the topic hierarchy. Roots have no parent and level 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
  pub code:   String,
  pub name:   String,
  pub parent: Option<SurrogateKey>,
  pub level:  u8,
}

impl Topic {
  pub fn root(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into(), parent: None, level: 1 }
  }

  pub fn child_of(
    parent: SurrogateKey,
    parent_level: u8,
    code: impl Into<String>,
    name: impl Into<String>,
  ) -> Self {
    Self {
      code:   code.into(),
      name:   name.into(),
      parent: Some(parent),
      level:  parent_level + 1,
    }
  }
}

impl DimensionRecord for Topic {
  const TABLE: Table = Table::Topic;

  fn natural_key(&self) -> String { self.code.clone() }

  fn to_row(&self) -> Row {
    Row::new()
      .with("topic_id", self.code.as_str())
      .with("topic_name", self.name.as_str())
      .with("parent_topic_key", self.parent)
      .with("topic_level", self.level)
  }
}

/// A topic as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTopic {
  pub key:    SurrogateKey,
  pub code:   String,
  pub name:   String,
  pub parent: Option<SurrogateKey>,
  pub level:  u8,
}

// ─── Interview round type ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRoundType {
  pub code:        String,
  pub name:        String,
  /// Position of the round within a typical interview loop, starting at 1.
  pub sequence:    u32,
  pub description: String,
}

impl DimensionRecord for InterviewRoundType {
  const TABLE: Table = Table::RoundType;

  fn natural_key(&self) -> String { self.code.clone() }

  fn to_row(&self) -> Row {
    Row::new()
      .with("round_type_id", self.code.as_str())
      .with("round_type_name", self.name.as_str())
      .with("round_sequence", self.sequence)
      .with("description", self.description.as_str())
  }
}

// ─── Question ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Easy => "Easy",
      Self::Medium => "Medium",
      Self::Hard => "Hard",
    }
  }
}

/// An interview question, owned by a level-2 topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub code:       String,
  pub text:       String,
  pub topic:      SurrogateKey,
  pub difficulty: Difficulty,
  pub source:     String,
}

impl DimensionRecord for Question {
  const TABLE: Table = Table::Question;

  fn natural_key(&self) -> String { self.code.clone() }

  fn to_row(&self) -> Row {
    Row::new()
      .with("question_id", self.code.as_str())
      .with("question_text", self.text.as_str())
      .with("topic_key", self.topic)
      .with("difficulty", self.difficulty.as_str())
      .with("source", self.source.as_str())
  }
}

// ─── Interview event (fact) ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
  Passed,
  Failed,
}

impl RoundResult {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Passed => "passed",
      Self::Failed => "failed",
    }
  }
}

/// One question asked during one interview round.
///
/// Rows sharing a `round_id` were asked in the same sitting; `position`
/// orders them within it, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewEvent {
  pub organization:          SurrogateKey,
  pub date:                  SurrogateKey,
  pub round_type:            SurrogateKey,
  pub question:              SurrogateKey,
  pub round_id:              String,
  pub position:              u32,
  pub duration_minutes:      u32,
  pub result:                RoundResult,
  pub difficulty_rating:     u8,
  pub answer_quality_rating: u8,
  pub was_prepared:          bool,
  pub needed_hint:           bool,
}

impl InterviewEvent {
  pub fn to_row(&self) -> Row {
    Row::new()
      .with("company_key", self.organization)
      .with("date_key", self.date)
      .with("round_type_key", self.round_type)
      .with("question_key", self.question)
      .with("interview_round_id", self.round_id.as_str())
      .with("round_position", self.position)
      .with("duration_minutes", self.duration_minutes)
      .with("result", self.result.as_str())
      .with("difficulty_rating", self.difficulty_rating)
      .with("answer_quality_rating", self.answer_quality_rating)
      .with("was_prepared", self.was_prepared)
      .with("needed_hint", self.needed_hint)
  }
}
