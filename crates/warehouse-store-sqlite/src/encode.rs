//! Encoding and decoding helpers between warehouse values and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings so they compare correctly as
//! text. Booleans are stored as 0/1 integers.

use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;
use warehouse_core::{
  model::StoredTopic,
  table::{SurrogateKey, Value},
};

use crate::{Error, Result};

// ─── Values ──────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn encode_value(v: Value) -> SqlValue {
  match v {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(i),
    Value::Text(s) => SqlValue::Text(s),
    Value::Bool(b) => SqlValue::Integer(i64::from(b)),
    Value::Date(d) => SqlValue::Text(encode_date(d)),
  }
}

/// Split a row into its column names and encoded parameters.
pub fn encode_columns(
  columns: Vec<(&'static str, Value)>,
) -> (Vec<&'static str>, Vec<SqlValue>) {
  columns
    .into_iter()
    .map(|(name, value)| (name, encode_value(value)))
    .unzip()
}

/// `?1, ?2, ..., ?n`
pub fn placeholders(n: usize) -> String {
  (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `dim_topics` row.
pub struct RawTopic {
  pub topic_key:        i64,
  pub topic_id:         String,
  pub topic_name:       String,
  pub parent_topic_key: Option<i64>,
  pub topic_level:      i64,
}

impl RawTopic {
  pub fn into_topic(self) -> Result<StoredTopic> {
    let level = u8::try_from(self.topic_level).map_err(|_| {
      Error::Decode(format!(
        "topic {:?} has out-of-range level {}",
        self.topic_id, self.topic_level
      ))
    })?;

    Ok(StoredTopic {
      key: SurrogateKey(self.topic_key),
      code: self.topic_id,
      name: self.topic_name,
      parent: self.parent_topic_key.map(SurrogateKey),
      level,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn booleans_and_dates_encode_as_sqlite_primitives() {
    assert_eq!(encode_value(Value::Bool(true)), SqlValue::Integer(1));
    assert_eq!(encode_value(Value::Bool(false)), SqlValue::Integer(0));
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(
      encode_value(Value::Date(date)),
      SqlValue::Text("2024-03-09".into())
    );
  }

  #[test]
  fn placeholder_list() {
    assert_eq!(placeholders(3), "?1, ?2, ?3");
    assert_eq!(placeholders(0), "");
  }

  #[test]
  fn negative_level_fails_to_decode() {
    let raw = RawTopic {
      topic_key:        1,
      topic_id:         "X".into(),
      topic_name:       "X".into(),
      parent_topic_key: None,
      topic_level:      -1,
    };
    assert!(matches!(raw.into_topic(), Err(Error::Decode(_))));
  }
}
