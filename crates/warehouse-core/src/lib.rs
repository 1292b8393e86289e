//! Core types and trait definitions for the interview analytics warehouse.
//!
//! This crate is deliberately free of database dependencies. It holds the
//! star-schema records, the storage boundary trait, and the two pure
//! generators: calendar expansion and fact sampling.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod calendar;
pub mod error;
pub mod model;
pub mod sampler;
pub mod store;
pub mod table;

pub use error::{Error, Result};
