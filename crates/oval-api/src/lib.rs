//! JSON HTTP API for the OVAL advisory store.
//!
//! Exposes an axum [`Router`] backed by any [`oval_core::store::OvalDb`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", oval_api::api_router(Arc::new(store)))
//! ```

pub mod definitions;
pub mod error;
pub mod meta;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use oval_core::store::OvalDb;

pub use error::ApiError;

/// Build a fully-materialised API router for `db`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<D>(db: Arc<D>) -> Router<()>
where
  D: OvalDb + 'static,
{
  Router::new()
    .route("/health", get(|| async { StatusCode::OK }))
    .route("/packs/{family}/{release}/{pack}", get(definitions::by_package::<D>))
    .route("/cves/{family}/{release}/{id}", get(definitions::by_cve::<D>))
    .route("/fetch-meta", get(meta::list::<D>))
    .with_state(db)
}
