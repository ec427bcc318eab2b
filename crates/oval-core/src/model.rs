//! The advisory dataset aggregate.
//!
//! A [`Root`] is one ingested dataset for a `(family, os_version)` pair. It
//! owns its definitions, which in turn own an advisory, the affected
//! packages and the external references. Storage backends flatten this tree
//! into rows and rebuild it on read; none of these types carry row ids.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Family;

// ─── Freshness ───────────────────────────────────────────────────────────────

/// Identity and timestamp of the source file a dataset was built from.
///
/// A refresh carrying the same timestamp as the stored stamp for the same
/// file is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMeta {
  pub file_name: String,
  pub timestamp: DateTime<Utc>,
}

impl FetchMeta {
  pub fn new(file_name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
    Self { file_name: file_name.into(), timestamp }
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// One ingested advisory dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
  pub family:      Family,
  pub os_version:  String,
  pub definitions: Vec<Definition>,
}

impl Root {
  pub fn new(family: Family, os_version: impl Into<String>) -> Self {
    Self { family, os_version: os_version.into(), definitions: Vec::new() }
  }
}

/// One vulnerability entry within a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
  /// The OVAL definition id, e.g. `oval:com.redhat.rhsa:def:20201234`.
  pub definition_id:  String,
  pub title:          String,
  pub description:    String,
  pub advisory:       Advisory,
  pub affected_packs: Vec<Package>,
  pub references:     Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
  pub severity:          String,
  pub issued:            Option<NaiveDate>,
  pub updated:           Option<NaiveDate>,
  pub cves:              Vec<Cve>,
  pub bugzillas:         Vec<Bugzilla>,
  pub affected_cpe_list: Vec<Cpe>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cve {
  pub cve_id: String,
  pub cvss2:  String,
  pub cvss3:  String,
  pub cwe:    String,
  pub impact: String,
  pub href:   String,
  pub public: String,
}

impl Cve {
  pub fn new(cve_id: impl Into<String>) -> Self {
    Self { cve_id: cve_id.into(), ..Self::default() }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bugzilla {
  pub bugzilla_id: String,
  pub url:         String,
  pub title:       String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpe {
  pub cpe: String,
}

/// An affected package. `version` carries the distro tag, e.g. `1.2.3.el7`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
  pub name:          String,
  pub version:       String,
  pub not_fixed_yet: bool,
}

impl Package {
  pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
    Self { name: name.into(), version: version.into(), not_fixed_yet: false }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
  pub source:  String,
  pub ref_id:  String,
  pub ref_url: String,
}
