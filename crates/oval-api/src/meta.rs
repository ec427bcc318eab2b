//! Handler for `GET /fetch-meta`.

use std::sync::Arc;

use axum::{Json, extract::State};
use oval_core::{model::FetchMeta, store::OvalDb};

use crate::error::ApiError;

/// `GET /fetch-meta` — every stored source-file stamp.
pub async fn list<D>(
  State(db): State<Arc<D>>,
) -> Result<Json<Vec<FetchMeta>>, ApiError>
where
  D: OvalDb,
{
  let metas = db
    .list_fetch_meta()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(metas))
}
