//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`
//! and families as their lowercase name.

use chrono::{DateTime, NaiveDate, Utc};
use oval_core::{
  Family,
  model::{
    Advisory, Bugzilla, Cpe, Cve, Definition, FetchMeta, Package, Reference,
  },
  version::filter_by_major,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Family ──────────────────────────────────────────────────────────────────

pub fn encode_family(f: Family) -> &'static str { f.as_str() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `fetch_meta` row as read from SQLite.
pub struct RawFetchMeta {
  pub file_name: String,
  pub timestamp: String,
}

impl RawFetchMeta {
  pub fn into_fetch_meta(self) -> Result<FetchMeta> {
    Ok(FetchMeta {
      file_name: self.file_name,
      timestamp: decode_dt(&self.timestamp)?,
    })
  }
}

/// An `advisories` row plus its child collections.
pub struct RawAdvisory {
  pub severity:  String,
  pub issued:    Option<String>,
  pub updated:   Option<String>,
  pub cves:      Vec<Cve>,
  pub bugzillas: Vec<Bugzilla>,
  pub cpes:      Vec<Cpe>,
}

impl RawAdvisory {
  pub fn into_advisory(self) -> Result<Advisory> {
    Ok(Advisory {
      severity:          self.severity,
      issued:            self.issued.as_deref().map(decode_date).transpose()?,
      updated:           self.updated.as_deref().map(decode_date).transpose()?,
      cves:              self.cves,
      bugzillas:         self.bugzillas,
      affected_cpe_list: self.cpes,
    })
  }
}

/// A `definitions` row with everything hydration loaded for it.
///
/// `advisory` is `None` only when the advisory row is missing.
pub struct RawDefinition {
  pub row_id:        i64,
  pub definition_id: String,
  pub title:         String,
  pub description:   String,
  pub advisory:      Option<RawAdvisory>,
  pub packages:      Vec<Package>,
  pub references:    Vec<Reference>,
}

impl RawDefinition {
  /// Finish hydration, narrowing affected packages to `major`.
  pub fn into_definition(self, major: &str) -> Result<Definition> {
    let advisory = self
      .advisory
      .ok_or(Error::NotFoundDuringHydration {
        entity: "advisory",
        row_id: self.row_id,
      })?
      .into_advisory()?;

    Ok(Definition {
      definition_id:  self.definition_id,
      title:          self.title,
      description:    self.description,
      advisory,
      affected_packs: filter_by_major(self.packages, major),
      references:     self.references,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_roundtrip() {
    let d = NaiveDate::from_ymd_opt(2020, 3, 31).unwrap();
    assert_eq!(encode_date(d), "2020-03-31");
    assert_eq!(decode_date("2020-03-31").unwrap(), d);
  }

  #[test]
  fn bad_date_is_an_error() {
    assert!(matches!(decode_date("31/03/2020"), Err(Error::DateParse(_))));
  }

  #[test]
  fn missing_advisory_fails_hydration() {
    let raw = RawDefinition {
      row_id:        42,
      definition_id: "oval:test:def:1".into(),
      title:         String::new(),
      description:   String::new(),
      advisory:      None,
      packages:      vec![],
      references:    vec![],
    };
    let err = raw.into_definition("7").unwrap_err();
    assert!(matches!(
      err,
      Error::NotFoundDuringHydration { entity: "advisory", row_id: 42 }
    ));
  }
}
