//! Error type for the seed pipeline.

use thiserror::Error;

use crate::stage::Stage;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] warehouse_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A stage failed and was rolled back; later stages did not run.
  #[error("stage `{stage}` failed")]
  Stage {
    stage:  Stage,
    #[source]
    source: Box<Error>,
  },

  #[error("topic {0:?} cannot be its own ancestor")]
  Cycle(String),

  #[error("invalid stage plan: {0}")]
  StagePlan(String),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
