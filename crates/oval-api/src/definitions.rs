//! Handlers for the definition lookups.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/packs/{family}/{release}/{pack}` | Definitions affecting a package |
//! | `GET`  | `/cves/{family}/{release}/{id}`    | Definitions listing a CVE |
//!
//! `family` is one of `redhat`, `debian`, `ubuntu`, `oracle` (any case);
//! `release` may be a full version, only its major part is used.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use oval_core::{
  Family,
  model::Definition,
  store::{OvalDb, OvalStore},
};

use crate::error::ApiError;

/// `GET /packs/:family/:release/:pack`
pub async fn by_package<D>(
  State(db): State<Arc<D>>,
  Path((family, release, pack)): Path<(String, String, String)>,
) -> Result<Json<Vec<Definition>>, ApiError>
where
  D: OvalDb,
{
  let family = Family::parse(&family)?;
  let defs = db
    .for_family(family)
    .get_by_package_name(&release, &pack)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(defs))
}

/// `GET /cves/:family/:release/:id`
pub async fn by_cve<D>(
  State(db): State<Arc<D>>,
  Path((family, release, id)): Path<(String, String, String)>,
) -> Result<Json<Vec<Definition>>, ApiError>
where
  D: OvalDb,
{
  let family = Family::parse(&family)?;
  let defs = db
    .for_family(family)
    .get_by_cve_id(&release, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(defs))
}
