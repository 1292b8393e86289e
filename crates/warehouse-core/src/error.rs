//! Error types for `warehouse-core`.

use thiserror::Error;

use crate::table::Table;

#[derive(Debug, Error)]
pub enum Error {
  /// A key lookup that the load order guarantees should succeed found
  /// nothing.
  #[error("no {table} row with natural key {natural_key:?}")]
  NotFound { table: Table, natural_key: String },

  #[error("no {0} keys available to reference")]
  EmptyPool(Table),

  #[error("invalid value rule: {0}")]
  InvalidRule(String),

  #[error("filter {filter} does not apply to {table}")]
  UnsupportedFilter { table: Table, filter: &'static str },

  #[error("{0} is not a dimension table")]
  NotADimension(Table),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
