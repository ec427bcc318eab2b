//! Error types for `oval-core`.

use thiserror::Error;

use crate::Family;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown OS family: {0:?}")]
  UnknownFamily(String),

  /// A dataset was handed to a store handle bound to a different family.
  #[error("store handle is bound to {handle} but the dataset is for {root}")]
  FamilyMismatch { handle: Family, root: Family },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
