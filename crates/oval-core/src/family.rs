//! OS families an advisory dataset can belong to.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::Error;

/// The distribution family of a dataset.
///
/// Parses case-insensitively and displays in lowercase, which is also the
/// form stored in the database and used in API paths.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Family {
  RedHat,
  Debian,
  Ubuntu,
  Oracle,
}

impl Family {
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a family name, mapping failure to [`Error::UnknownFamily`].
  pub fn parse(s: &str) -> Result<Self, Error> {
    Self::from_str(s).map_err(|_| Error::UnknownFamily(s.to_owned()))
  }
}
