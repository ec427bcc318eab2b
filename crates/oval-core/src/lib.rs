//! Core types and trait definitions for the OVAL advisory store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod family;
pub mod model;
pub mod store;
pub mod version;

pub use error::{Error, Result};
pub use family::Family;
