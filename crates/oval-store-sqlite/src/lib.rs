//! SQLite backend for the OVAL advisory store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each refresh and each query runs in a
//! single SQLite transaction.

mod encode;
mod query;
mod refresh;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{FamilyStore, SqliteStore};
