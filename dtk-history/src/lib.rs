//! # dtk-history
//!
//! Durable translation history.
//!
//! The status cache holds the fast, ephemeral in-progress view; this crate
//! holds the slow, durable record that survives cache eviction and serves
//! the history listing. One row per task, created when a terminal task is
//! promoted and patched in place afterwards.
//!
//! - [`HistoryStore`] - Trait for history backends
//! - [`InMemoryHistoryStore`] - Process-local backend for tests
//! - `DatabaseHistoryStore` - SQLite backend (feature `database`)

pub mod inmemory;
pub mod service;

#[cfg(feature = "database")]
pub mod database;

pub use inmemory::InMemoryHistoryStore;
pub use service::{HistoryRecord, HistoryStore, InsertRequest, UpdateStatusRequest};

#[cfg(feature = "database")]
pub use database::DatabaseHistoryStore;
