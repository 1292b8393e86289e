//! The `WarehouseStore` trait: the storage backend boundary.
//!
//! The trait is implemented by storage backends (e.g.
//! `warehouse-store-sqlite`). The seed pipeline depends on this abstraction,
//! not on any concrete backend. Backends only ever append rows; nothing here
//! updates or deletes.

use std::future::Future;

use crate::{
  model::{InterviewEvent, StoredTopic},
  table::{KeyFilter, LoadReport, Row, SurrogateKey, Table, UpsertOutcome},
};

/// Abstraction over a warehouse storage backend.
///
/// A store is a single session: unit-of-work calls (`begin`, `commit`,
/// `rollback`) apply to every write issued between them, and reads issued
/// inside a unit of work see its uncommitted writes.
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Unit of work ──────────────────────────────────────────────────────

  fn begin(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn commit(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Discard everything written since the last `begin`.
  fn rollback(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert `row` into dimension `table`, or do nothing if a row with the
  /// same natural key already exists.
  ///
  /// Only a collision on the natural key yields
  /// [`UpsertOutcome::Skipped`]; every other rejection is an error.
  fn upsert(
    &self,
    table: Table,
    row: Row,
  ) -> impl Future<Output = Result<UpsertOutcome, Self::Error>> + Send + '_;

  /// Append fact rows. A row whose `(round_id, position)` slot is already
  /// taken is skipped.
  fn insert_events(
    &self,
    events: Vec<InterviewEvent>,
  ) -> impl Future<Output = Result<LoadReport, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Surrogate key of the row in `table` whose natural key is
  /// `natural_key`, if any.
  fn surrogate_key(
    &self,
    table: Table,
    natural_key: String,
  ) -> impl Future<Output = Result<Option<SurrogateKey>, Self::Error>> + Send + '_;

  /// `(natural_key, surrogate_key)` for every row of `table` matching
  /// `filter`, ordered by surrogate key.
  fn surrogate_keys(
    &self,
    table: Table,
    filter: KeyFilter,
  ) -> impl Future<Output = Result<Vec<(String, SurrogateKey)>, Self::Error>>
  + Send
  + '_;

  fn count_rows(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Every topic, ordered by surrogate key.
  fn list_topics(
    &self,
  ) -> impl Future<Output = Result<Vec<StoredTopic>, Self::Error>> + Send + '_;
}
