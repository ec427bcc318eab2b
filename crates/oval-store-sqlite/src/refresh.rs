//! The dataset refresh protocol.
//!
//! A refresh supersedes whatever dataset is stored for a
//! `(family, os_version)` pair. It runs as one IMMEDIATE transaction: on any
//! error the transaction is dropped uncommitted and the previous dataset is
//! left exactly as it was.

use oval_core::{
  model::{Definition, FetchMeta, Root},
  store::RefreshOutcome,
};
use rusqlite::{
  Connection, OptionalExtension as _, Transaction, TransactionBehavior, params,
};

use crate::{
  Result,
  encode::{decode_dt, encode_date, encode_dt, encode_family},
};

/// Leaf-first deletion plan for one root. Every statement binds the root id
/// as `?1`; children are always removed before the rows they reference.
const DELETE_PLAN: [(&str, &str); 8] = [
  (
    "cves",
    "DELETE FROM cves WHERE advisory_id IN (
       SELECT a.id FROM advisories a
       JOIN definitions d ON d.id = a.definition_id
       WHERE d.root_id = ?1)",
  ),
  (
    "bugzillas",
    "DELETE FROM bugzillas WHERE advisory_id IN (
       SELECT a.id FROM advisories a
       JOIN definitions d ON d.id = a.definition_id
       WHERE d.root_id = ?1)",
  ),
  (
    "cpes",
    "DELETE FROM cpes WHERE advisory_id IN (
       SELECT a.id FROM advisories a
       JOIN definitions d ON d.id = a.definition_id
       WHERE d.root_id = ?1)",
  ),
  (
    "advisories",
    "DELETE FROM advisories WHERE definition_id IN (
       SELECT id FROM definitions WHERE root_id = ?1)",
  ),
  (
    "packages",
    "DELETE FROM packages WHERE definition_id IN (
       SELECT id FROM definitions WHERE root_id = ?1)",
  ),
  (
    "definition_refs",
    "DELETE FROM definition_refs WHERE definition_id IN (
       SELECT id FROM definitions WHERE root_id = ?1)",
  ),
  ("definitions", "DELETE FROM definitions WHERE root_id = ?1"),
  ("roots", "DELETE FROM roots WHERE id = ?1"),
];

/// Run the whole refresh protocol on `conn`.
pub fn refresh_root(
  conn: &mut Connection,
  root: &Root,
  meta: &FetchMeta,
) -> Result<RefreshOutcome> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let family = encode_family(root.family);

  let stored: Option<String> = tx
    .query_row(
      "SELECT timestamp FROM fetch_meta WHERE file_name = ?1",
      params![meta.file_name],
      |r| r.get(0),
    )
    .optional()?;

  if let Some(stored) = stored
    && decode_dt(&stored)? == meta.timestamp
  {
    tracing::info!(
      family,
      os_version = %root.os_version,
      file = %meta.file_name,
      "skip (same timestamp)"
    );
    return Ok(RefreshOutcome::Skipped);
  }

  tracing::info!(family, os_version = %root.os_version, "refreshing");

  let old_roots: Vec<i64> = {
    let mut stmt =
      tx.prepare("SELECT id FROM roots WHERE family = ?1 AND os_version = ?2")?;
    stmt
      .query_map(params![family, root.os_version], |r| r.get(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  for old_id in &old_roots {
    delete_root(&tx, *old_id)?;
  }

  insert_root(&tx, root)?;

  tx.execute(
    "INSERT INTO fetch_meta (file_name, timestamp) VALUES (?1, ?2)
     ON CONFLICT (file_name) DO UPDATE SET timestamp = excluded.timestamp",
    params![meta.file_name, encode_dt(meta.timestamp)],
  )?;

  tx.commit()?;

  tracing::info!(
    family,
    os_version = %root.os_version,
    definitions = root.definitions.len(),
    "refreshed"
  );

  Ok(if old_roots.is_empty() {
    RefreshOutcome::Inserted
  } else {
    RefreshOutcome::Replaced
  })
}

fn delete_root(tx: &Transaction<'_>, root_id: i64) -> Result<()> {
  for (table, sql) in DELETE_PLAN {
    let deleted = tx.execute(sql, params![root_id])?;
    tracing::debug!(root_id, table, deleted, "deleted");
  }
  Ok(())
}

fn insert_root(tx: &Transaction<'_>, root: &Root) -> Result<()> {
  tx.execute(
    "INSERT INTO roots (family, os_version) VALUES (?1, ?2)",
    params![encode_family(root.family), root.os_version],
  )?;
  let root_id = tx.last_insert_rowid();

  for def in &root.definitions {
    insert_definition(tx, root_id, def)?;
  }
  Ok(())
}

fn insert_definition(
  tx: &Transaction<'_>,
  root_id: i64,
  def: &Definition,
) -> Result<()> {
  let def_id = tx
    .prepare_cached(
      "INSERT INTO definitions (root_id, definition_id, title, description)
       VALUES (?1, ?2, ?3, ?4)",
    )?
    .insert(params![root_id, def.definition_id, def.title, def.description])?;

  let adv = &def.advisory;
  let adv_id = tx
    .prepare_cached(
      "INSERT INTO advisories (definition_id, severity, issued, updated)
       VALUES (?1, ?2, ?3, ?4)",
    )?
    .insert(params![
      def_id,
      adv.severity,
      adv.issued.map(encode_date),
      adv.updated.map(encode_date),
    ])?;

  let mut stmt = tx.prepare_cached(
    "INSERT INTO cves (advisory_id, cve_id, cvss2, cvss3, cwe, impact, href, public)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
  )?;
  for c in &adv.cves {
    stmt.execute(params![
      adv_id, c.cve_id, c.cvss2, c.cvss3, c.cwe, c.impact, c.href, c.public,
    ])?;
  }

  let mut stmt = tx.prepare_cached(
    "INSERT INTO bugzillas (advisory_id, bugzilla_id, url, title)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for b in &adv.bugzillas {
    stmt.execute(params![adv_id, b.bugzilla_id, b.url, b.title])?;
  }

  let mut stmt =
    tx.prepare_cached("INSERT INTO cpes (advisory_id, cpe) VALUES (?1, ?2)")?;
  for c in &adv.affected_cpe_list {
    stmt.execute(params![adv_id, c.cpe])?;
  }

  let mut stmt = tx.prepare_cached(
    "INSERT INTO packages (definition_id, name, version, not_fixed_yet)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for p in &def.affected_packs {
    stmt.execute(params![def_id, p.name, p.version, p.not_fixed_yet])?;
  }

  let mut stmt = tx.prepare_cached(
    "INSERT INTO definition_refs (definition_id, source, ref_id, ref_url)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for r in &def.references {
    stmt.execute(params![def_id, r.source, r.ref_id, r.ref_url])?;
  }

  Ok(())
}
