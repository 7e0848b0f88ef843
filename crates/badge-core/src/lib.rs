//! Core types and trait definitions for the officer identity graph.
//!
//! Defines the `Officer` and `StateID` nodes, the closed enumerations their
//! attributes draw from, the edges an officer carries, and the
//! [`store::OfficerStore`] repository contract. This crate has no database
//! or I/O dependencies; backends live in their own crates.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cardinality;
pub mod citation;
pub mod enums;
pub mod error;
pub mod ids;
pub mod officer;
pub mod relation;
pub mod state_id;
pub mod store;
pub mod view;

pub use error::{Error, Result};
