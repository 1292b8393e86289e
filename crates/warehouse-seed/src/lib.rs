//! Dependency-ordered population of the interview analytics warehouse.
//!
//! Loads the calendar and flat dimensions, then the topic hierarchy (roots
//! before children), then questions, and finally synthetic interview events
//! drawn only from keys that already exist. Works against any
//! [`warehouse_core::store::WarehouseStore`].
//!
//! ```rust,ignore
//! let report = Orchestrator::new(&store, &Catalog::interview_seed(), &config)
//!   .run()
//!   .await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod pipeline;
pub mod resolver;
pub mod stage;

pub use error::{Error, Result};
pub use pipeline::{Orchestrator, RunReport};

#[cfg(test)]
mod tests;
