//! SQLite backend for the officer identity graph.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every write that touches a
//! `HAS_STATE_ID` edge runs in a single transaction together with its
//! ownership check.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
