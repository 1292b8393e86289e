//! Synthetic fact generation.
//!
//! [`FactSampler`] draws every foreign key from a [`KeyPools`] snapshot and
//! generates measures independently according to [`ValueRules`]. It never
//! produces a key that is not in a pool, whatever the random source.

use std::ops::RangeInclusive;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  model::{InterviewEvent, RoundResult},
  table::{SurrogateKey, Table},
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Surrogate keys currently resolvable for each dimension a fact references.
#[derive(Debug, Clone, Default)]
pub struct KeyPools {
  pub organizations: Vec<SurrogateKey>,
  pub dates:         Vec<SurrogateKey>,
  pub round_types:   Vec<SurrogateKey>,
  pub questions:     Vec<SurrogateKey>,
}

impl KeyPools {
  fn check(&self) -> Result<()> {
    for (table, pool) in [
      (Table::Organization, &self.organizations),
      (Table::Calendar, &self.dates),
      (Table::RoundType, &self.round_types),
      (Table::Question, &self.questions),
    ] {
      if pool.is_empty() {
        return Err(Error::EmptyPool(table));
      }
    }
    Ok(())
  }
}

/// Governs the measure columns of generated facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRules {
  pub duration_minutes:     RangeInclusive<u32>,
  /// Relative weight of a passed result against `fail_weight`.
  pub pass_weight:          u32,
  pub fail_weight:          u32,
  pub difficulty_rating:    RangeInclusive<u8>,
  pub answer_quality:       RangeInclusive<u8>,
  pub prepared_probability: f64,
  pub hint_probability:     f64,
}

impl Default for ValueRules {
  fn default() -> Self {
    Self {
      duration_minutes:     30..=90,
      pass_weight:          2,
      fail_weight:          1,
      difficulty_rating:    2..=5,
      answer_quality:       2..=5,
      prepared_probability: 0.5,
      hint_probability:     0.5,
    }
  }
}

impl ValueRules {
  fn check(&self) -> Result<()> {
    if self.duration_minutes.is_empty() {
      return Err(Error::InvalidRule("duration range is empty".into()));
    }
    if self.difficulty_rating.is_empty() || self.answer_quality.is_empty() {
      return Err(Error::InvalidRule("rating range is empty".into()));
    }
    if self.pass_weight.checked_add(self.fail_weight).is_none_or(|w| w == 0) {
      return Err(Error::InvalidRule(
        "result weights must be positive and fit in u32".into(),
      ));
    }
    for (name, p) in [
      ("prepared", self.prepared_probability),
      ("hint", self.hint_probability),
    ] {
      if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidRule(format!(
          "{name} probability {p} is outside [0, 1]"
        )));
      }
    }
    Ok(())
  }
}

// ─── Sampler ─────────────────────────────────────────────────────────────────

/// Generates interview events in fixed-size rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct FactSampler {
  /// Number of consecutive rows sharing one round identifier.
  pub group_size: usize,
  pub rules:      ValueRules,
}

impl Default for FactSampler {
  fn default() -> Self { Self { group_size: 3, rules: ValueRules::default() } }
}

impl FactSampler {
  /// Identifier shared by every row of batch `batch` (zero-based).
  pub fn round_id(batch: usize) -> String { format!("ROUND-{:03}", batch + 1) }

  /// Generate `n` events referencing only keys from `pools`.
  ///
  /// Every pool must be non-empty, even when `n` is zero.
  pub fn generate<R: Rng + ?Sized>(
    &self,
    n: usize,
    pools: &KeyPools,
    rng: &mut R,
  ) -> Result<Vec<InterviewEvent>> {
    if self.group_size == 0 {
      return Err(Error::InvalidRule("group size must be at least 1".into()));
    }
    self.rules.check()?;
    pools.check()?;

    let rules = &self.rules;
    let mut events = Vec::with_capacity(n);
    for i in 0..n {
      let batch = i / self.group_size;
      let result = if rng
        .gen_ratio(rules.pass_weight, rules.pass_weight + rules.fail_weight)
      {
        RoundResult::Passed
      } else {
        RoundResult::Failed
      };

      events.push(InterviewEvent {
        organization:          pick(&pools.organizations, Table::Organization, rng)?,
        date:                  pick(&pools.dates, Table::Calendar, rng)?,
        round_type:            pick(&pools.round_types, Table::RoundType, rng)?,
        question:              pick(&pools.questions, Table::Question, rng)?,
        round_id:              Self::round_id(batch),
        position:              (i % self.group_size) as u32 + 1,
        duration_minutes:      rng.gen_range(rules.duration_minutes.clone()),
        result,
        difficulty_rating:     rng.gen_range(rules.difficulty_rating.clone()),
        answer_quality_rating: rng.gen_range(rules.answer_quality.clone()),
        was_prepared:          rng.gen_bool(rules.prepared_probability),
        needed_hint:           rng.gen_bool(rules.hint_probability),
      });
    }
    Ok(events)
  }
}

fn pick<R: Rng + ?Sized>(
  pool: &[SurrogateKey],
  table: Table,
  rng: &mut R,
) -> Result<SurrogateKey> {
  pool.choose(rng).copied().ok_or(Error::EmptyPool(table))
}
