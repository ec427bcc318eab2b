//! Definition lookups and hydration.
//!
//! A lookup walks from the matching leaf rows (packages or CVEs) up to their
//! root, keeps the definitions whose root belongs to the requested family and
//! major release, then loads each kept definition's full subtree. The walk
//! and the hydration share one read transaction so they observe a single
//! committed generation.

use oval_core::{
  Family,
  model::{Bugzilla, Cpe, Cve, Package, Reference},
  version::major_version,
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use crate::{
  Error, Result,
  encode::{RawAdvisory, RawDefinition, encode_family},
};

/// The leaf a lookup starts from.
#[derive(Debug, Clone)]
pub enum Lookup {
  PackageName(String),
  CveId(String),
}

/// The SQL for one upward walk.
///
/// Columns are: the start row id, then one nullable id per entry of `hops`
/// (the last hop is always the definition), then the root's family and
/// os_version.
struct Walk {
  sql:  &'static str,
  hops: &'static [&'static str],
}

const PACKAGE_WALK: Walk = Walk {
  sql:  "SELECT p.id, d.id, r.family, r.os_version
         FROM packages p
         LEFT JOIN definitions d ON d.id = p.definition_id
         LEFT JOIN roots       r ON r.id = d.root_id
         WHERE p.name = ?1
         ORDER BY p.id",
  hops: &["definition"],
};

const CVE_WALK: Walk = Walk {
  sql:  "SELECT c.id, a.id, d.id, r.family, r.os_version
         FROM cves c
         LEFT JOIN advisories  a ON a.id = c.advisory_id
         LEFT JOIN definitions d ON d.id = a.definition_id
         LEFT JOIN roots       r ON r.id = d.root_id
         WHERE c.cve_id = ?1
         ORDER BY c.id",
  hops: &["advisory", "definition"],
};

impl Lookup {
  fn walk(&self) -> (&'static Walk, &str) {
    match self {
      Lookup::PackageName(name) => (&PACKAGE_WALK, name),
      Lookup::CveId(id) => (&CVE_WALK, id),
    }
  }
}

struct WalkRow {
  start_id:   i64,
  hops:       Vec<Option<i64>>,
  family:     Option<String>,
  os_version: Option<String>,
}

/// Find and hydrate every definition reachable from `lookup` whose root is
/// `family` at major release `major`, in discovery order.
///
/// Affected packages are returned unfiltered; narrowing to `major` happens in
/// [`RawDefinition::into_definition`].
pub fn find_definitions(
  conn: &mut Connection,
  family: Family,
  major: &str,
  lookup: &Lookup,
) -> Result<Vec<RawDefinition>> {
  let tx = conn.transaction()?;

  let def_rows = walk_to_definitions(&tx, family, major, lookup)?;
  let defs = def_rows
    .into_iter()
    .map(|row_id| hydrate(&tx, row_id))
    .collect::<Result<Vec<_>>>()?;

  tx.commit()?;
  Ok(defs)
}

/// Definition row ids matching `lookup`, one per matching leaf row, in
/// discovery order. A definition reached twice appears twice.
fn walk_to_definitions(
  tx: &Transaction<'_>,
  family: Family,
  major: &str,
  lookup: &Lookup,
) -> Result<Vec<i64>> {
  let (walk, key) = lookup.walk();
  let n = walk.hops.len();

  let rows: Vec<WalkRow> = {
    let mut stmt = tx.prepare_cached(walk.sql)?;
    stmt
      .query_map(params![key], |row| {
        Ok(WalkRow {
          start_id:   row.get(0)?,
          hops:       (1..=n)
            .map(|i| row.get(i))
            .collect::<rusqlite::Result<_>>()?,
          family:     row.get(n + 1)?,
          os_version: row.get(n + 2)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let family = encode_family(family);
  let mut kept = Vec::new();

  for row in rows {
    // Walk upwards; each missing hop is reported against the row that
    // referenced it.
    let mut referrer = row.start_id;
    for (entity, id) in walk.hops.iter().copied().zip(&row.hops) {
      referrer = id.ok_or(Error::NotFoundDuringHydration {
        entity,
        row_id: referrer,
      })?;
    }
    let def_row = referrer;

    let (Some(root_family), Some(os_version)) = (row.family, row.os_version)
    else {
      return Err(Error::NotFoundDuringHydration {
        entity: "root",
        row_id: def_row,
      });
    };

    if root_family == family && major_version(&os_version) == major {
      kept.push(def_row);
    }
  }

  Ok(kept)
}

/// Load one definition row with its advisory, CVEs, bugzillas, CPEs,
/// packages and references.
fn hydrate(tx: &Transaction<'_>, row_id: i64) -> Result<RawDefinition> {
  let (definition_id, title, description): (String, String, String) = tx
    .query_row(
      "SELECT definition_id, title, description FROM definitions WHERE id = ?1",
      params![row_id],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )
    .optional()?
    .ok_or(Error::NotFoundDuringHydration { entity: "definition", row_id })?;

  let advisory_row: Option<(i64, String, Option<String>, Option<String>)> = tx
    .query_row(
      "SELECT id, severity, issued, updated FROM advisories
       WHERE definition_id = ?1",
      params![row_id],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )
    .optional()?;

  let advisory = match advisory_row {
    Some((adv_id, severity, issued, updated)) => Some(RawAdvisory {
      severity,
      issued,
      updated,
      cves: load_cves(tx, adv_id)?,
      bugzillas: load_bugzillas(tx, adv_id)?,
      cpes: load_cpes(tx, adv_id)?,
    }),
    None => None,
  };

  Ok(RawDefinition {
    row_id,
    definition_id,
    title,
    description,
    advisory,
    packages: load_packages(tx, row_id)?,
    references: load_references(tx, row_id)?,
  })
}

fn load_cves(tx: &Transaction<'_>, advisory_id: i64) -> Result<Vec<Cve>> {
  let mut stmt = tx.prepare_cached(
    "SELECT cve_id, cvss2, cvss3, cwe, impact, href, public
     FROM cves WHERE advisory_id = ?1 ORDER BY id",
  )?;
  let rows = stmt
    .query_map(params![advisory_id], |r| {
      Ok(Cve {
        cve_id: r.get(0)?,
        cvss2:  r.get(1)?,
        cvss3:  r.get(2)?,
        cwe:    r.get(3)?,
        impact: r.get(4)?,
        href:   r.get(5)?,
        public: r.get(6)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_bugzillas(
  tx: &Transaction<'_>,
  advisory_id: i64,
) -> Result<Vec<Bugzilla>> {
  let mut stmt = tx.prepare_cached(
    "SELECT bugzilla_id, url, title FROM bugzillas
     WHERE advisory_id = ?1 ORDER BY id",
  )?;
  let rows = stmt
    .query_map(params![advisory_id], |r| {
      Ok(Bugzilla {
        bugzilla_id: r.get(0)?,
        url:         r.get(1)?,
        title:       r.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_cpes(tx: &Transaction<'_>, advisory_id: i64) -> Result<Vec<Cpe>> {
  let mut stmt = tx
    .prepare_cached("SELECT cpe FROM cpes WHERE advisory_id = ?1 ORDER BY id")?;
  let rows = stmt
    .query_map(params![advisory_id], |r| Ok(Cpe { cpe: r.get(0)? }))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_packages(
  tx: &Transaction<'_>,
  definition_id: i64,
) -> Result<Vec<Package>> {
  let mut stmt = tx.prepare_cached(
    "SELECT name, version, not_fixed_yet FROM packages
     WHERE definition_id = ?1 ORDER BY id",
  )?;
  let rows = stmt
    .query_map(params![definition_id], |r| {
      Ok(Package {
        name:          r.get(0)?,
        version:       r.get(1)?,
        not_fixed_yet: r.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_references(
  tx: &Transaction<'_>,
  definition_id: i64,
) -> Result<Vec<Reference>> {
  let mut stmt = tx.prepare_cached(
    "SELECT source, ref_id, ref_url FROM definition_refs
     WHERE definition_id = ?1 ORDER BY id",
  )?;
  let rows = stmt
    .query_map(params![definition_id], |r| {
      Ok(Reference {
        source:  r.get(0)?,
        ref_id:  r.get(1)?,
        ref_url: r.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
