//! Insert-or-skip loading of dimension records.

use tracing::debug;
use warehouse_core::{
  model::DimensionRecord,
  store::WarehouseStore,
  table::{LoadReport, UpsertOutcome},
};

use crate::{Error, Result};

/// Writes dimension records, skipping any whose natural key is already
/// present. Existing rows are never updated, so re-running a load is safe.
pub struct UpsertLoader<'a, S> {
  store: &'a S,
}

impl<'a, S: WarehouseStore> UpsertLoader<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  pub async fn upsert<R: DimensionRecord>(&self, record: &R) -> Result<UpsertOutcome> {
    let table = R::TABLE;
    let outcome = self
      .store
      .upsert(table, record.to_row())
      .await
      .map_err(Error::store)?;
    debug!(
      %table,
      natural_key = %record.natural_key(),
      ?outcome,
      "upsert"
    );
    Ok(outcome)
  }

  /// Upsert every record in order, stopping at the first failure.
  pub async fn load_all<R: DimensionRecord>(&self, records: &[R]) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    for record in records {
      report.record(self.upsert(record).await?);
    }
    Ok(report)
  }
}
