//! [`SqliteStore`] and its family-scoped [`FamilyStore`] handle.

use std::path::Path;

use oval_core::{
  Family,
  model::{Definition, FetchMeta, Root},
  store::{OvalDb, OvalStore, RefreshOutcome},
  version::major_version,
};

use crate::{
  Result,
  encode::RawFetchMeta,
  query::{self, Lookup},
  refresh,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An OVAL advisory store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl OvalDb for SqliteStore {
  type Error = crate::Error;
  type Store = FamilyStore;

  fn for_family(&self, family: Family) -> FamilyStore {
    FamilyStore { conn: self.conn.clone(), family }
  }

  async fn list_fetch_meta(&self) -> Result<Vec<FetchMeta>> {
    let raws: Vec<RawFetchMeta> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT file_name, timestamp FROM fetch_meta ORDER BY file_name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawFetchMeta {
              file_name: row.get(0)?,
              timestamp: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFetchMeta::into_fetch_meta).collect()
  }
}

// ─── Family handle ───────────────────────────────────────────────────────────

/// A [`SqliteStore`] connection bound to one OS family.
#[derive(Clone)]
pub struct FamilyStore {
  conn:   tokio_rusqlite::Connection,
  family: Family,
}

impl FamilyStore {
  async fn lookup(
    &self,
    os_version: &str,
    lookup: Lookup,
  ) -> Result<Vec<Definition>> {
    let family = self.family;
    let major = major_version(os_version).to_owned();
    let walk_major = major.clone();

    let raws = self
      .conn
      .call(move |conn| {
        Ok(query::find_definitions(conn, family, &walk_major, &lookup))
      })
      .await??;

    tracing::debug!(%family, %major, matches = raws.len(), "lookup");

    raws
      .into_iter()
      .map(|raw| raw.into_definition(&major))
      .collect()
  }
}

impl OvalStore for FamilyStore {
  type Error = crate::Error;

  fn family(&self) -> Family { self.family }

  async fn refresh(&self, root: Root, meta: FetchMeta) -> Result<RefreshOutcome> {
    if root.family != self.family {
      return Err(
        oval_core::Error::FamilyMismatch {
          handle: self.family,
          root:   root.family,
        }
        .into(),
      );
    }

    self
      .conn
      .call(move |conn| Ok(refresh::refresh_root(conn, &root, &meta)))
      .await?
  }

  async fn get_by_package_name(
    &self,
    os_version: &str,
    package_name: &str,
  ) -> Result<Vec<Definition>> {
    self
      .lookup(os_version, Lookup::PackageName(package_name.to_owned()))
      .await
  }

  async fn get_by_cve_id(
    &self,
    os_version: &str,
    cve_id: &str,
  ) -> Result<Vec<Definition>> {
    self.lookup(os_version, Lookup::CveId(cve_id.to_owned())).await
  }
}
