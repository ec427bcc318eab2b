//! Error type for `oval-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] oval_core::Error),

  /// Any read, write or transaction failure from SQLite.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row that hydration relies on is missing. Only a partial write can
  /// cause this, so it is surfaced rather than defaulted.
  #[error("{entity} not found for row {row_id} during hydration")]
  NotFoundDuringHydration {
    entity: &'static str,
    row_id: i64,
  },
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Self::Database(e.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
