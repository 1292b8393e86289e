//! Error type for `warehouse-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] warehouse_core::Error),

  /// The store rejected a row for a reason other than a natural-key
  /// collision: a missing foreign key, a CHECK, or a different UNIQUE.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("database connection is closed")]
  Connectivity,

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("decode error: {0}")]
  Decode(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::ConnectionClosed => Self::Connectivity,
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        code,
        message,
      )) if code.code == rusqlite::ErrorCode::ConstraintViolation => {
        Self::ConstraintViolation(message.unwrap_or_else(|| code.to_string()))
      }
      other => Self::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
