//! Runtime configuration, deserialised from `warehouse.toml` and the
//! environment.
//!
//! Every field has a default, so the seed runs with no file at all.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use warehouse_core::sampler::ValueRules;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
  pub store_path: PathBuf,
  pub calendar:   CalendarRange,
  pub facts:      FactSettings,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("warehouse.db"),
      calendar:   CalendarRange::default(),
      facts:      FactSettings::default(),
    }
  }
}

impl SeedConfig {
  /// Read `path` if it exists, then overlay `WAREHOUSE_*` environment
  /// variables (`__` separates nested keys, e.g. `WAREHOUSE_FACTS__COUNT`).
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("WAREHOUSE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }
}

/// Inclusive date range loaded into the calendar dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CalendarRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl Default for CalendarRange {
  fn default() -> Self {
    Self {
      start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
      end:   NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
    }
  }
}

/// Controls synthetic fact generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactSettings {
  /// Number of interview events to generate.
  pub count:              usize,
  /// Events per interview round.
  pub group_size:         usize,
  /// Fixed RNG seed; `None` seeds from the OS.
  pub seed:               Option<u64>,
  /// Restrict sampled dates to the trailing N days of the calendar range.
  /// `0` or `None` samples the whole range.
  pub recent_days:        Option<u32>,
  /// Restrict sampled organizations to the first N by surrogate key.
  /// `0` or `None` samples every organization.
  pub organization_limit: Option<usize>,
  pub rules:              ValueRules,
}

impl Default for FactSettings {
  fn default() -> Self {
    Self {
      count:              50,
      group_size:         3,
      seed:               None,
      recent_days:        Some(60),
      organization_limit: Some(5),
      rules:              ValueRules::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(toml: &str) -> SeedConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = SeedConfig::load(Path::new("/nonexistent/warehouse.toml")).unwrap();
    assert_eq!(cfg.calendar, CalendarRange::default());
    assert_eq!(cfg.facts.count, 50);
    assert_eq!(cfg.facts.group_size, 3);
  }

  #[test]
  fn partial_file_keeps_other_defaults() {
    let cfg = parse(
      r#"
      store_path = "/tmp/seed.db"

      [calendar]
      start = "2024-01-06"
      end = "2024-01-07"

      [facts]
      count = 9
      seed = 42
      "#,
    );
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/seed.db"));
    assert_eq!(cfg.calendar.start, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    assert_eq!(cfg.facts.count, 9);
    assert_eq!(cfg.facts.seed, Some(42));
    assert_eq!(cfg.facts.organization_limit, Some(5));
    assert_eq!(cfg.facts.recent_days, Some(60));
  }

  #[test]
  fn zero_pool_limits_parse() {
    let cfg = parse(
      r#"
      [facts]
      recent_days = 0
      organization_limit = 0
      "#,
    );
    assert_eq!(cfg.facts.recent_days, Some(0));
    assert_eq!(cfg.facts.organization_limit, Some(0));
    assert_eq!(cfg.facts.rules, ValueRules::default());
  }

  #[test]
  fn value_rules_are_configurable() {
    let cfg = parse(
      r#"
      [facts.rules]
      pass_weight = 1
      duration_minutes = { start = 10, end = 20 }
      "#,
    );
    assert_eq!(cfg.facts.rules.pass_weight, 1);
    assert_eq!(cfg.facts.rules.duration_minutes, 10..=20);
    assert_eq!(cfg.facts.rules.fail_weight, 1);
  }
}
