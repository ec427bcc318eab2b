//! The `OvalStore` and `OvalDb` traits.
//!
//! The traits are implemented by storage backends (e.g. `oval-store-sqlite`).
//! Higher layers (`oval-api`, `oval-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Family,
  model::{Definition, FetchMeta, Root},
};

/// What a successful [`OvalStore::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
  /// The stored stamp for the source file has the same timestamp; nothing
  /// was written.
  Skipped,
  /// No dataset existed for the `(family, os_version)` pair.
  Inserted,
  /// An older dataset for the pair was deleted and the new one inserted.
  Replaced,
}

// ─── Family-scoped handle ────────────────────────────────────────────────────

/// A store handle bound to one OS family.
///
/// The family is fixed when the handle is created. Queries only ever return
/// definitions whose dataset belongs to that family.
pub trait OvalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn family(&self) -> Family;

  /// Atomically replace the dataset for `(root.family, root.os_version)`.
  ///
  /// Either the whole old dataset is gone and the whole new one present, or
  /// on error the store is unchanged. `root.family` must equal
  /// [`family`](Self::family).
  fn refresh(
    &self,
    root: Root,
    meta: FetchMeta,
  ) -> impl Future<Output = Result<RefreshOutcome, Self::Error>> + Send + '_;

  /// Fully hydrated definitions affecting `package_name` on the major
  /// release of `os_version`. Affected packages are narrowed to that major.
  fn get_by_package_name<'a>(
    &'a self,
    os_version: &'a str,
    package_name: &'a str,
  ) -> impl Future<Output = Result<Vec<Definition>, Self::Error>> + Send + 'a;

  /// Fully hydrated definitions whose advisory lists `cve_id`, on the major
  /// release of `os_version`.
  fn get_by_cve_id<'a>(
    &'a self,
    os_version: &'a str,
    cve_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Definition>, Self::Error>> + Send + 'a;
}

// ─── Database ────────────────────────────────────────────────────────────────

/// A backend that hands out family-scoped [`OvalStore`] handles.
pub trait OvalDb: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
  type Store: OvalStore<Error = Self::Error>;

  fn for_family(&self, family: Family) -> Self::Store;

  /// Every stored fetch stamp, ordered by file name.
  fn list_fetch_meta(
    &self,
  ) -> impl Future<Output = Result<Vec<FetchMeta>, Self::Error>> + Send + '_;
}
