//! SQL schema for the OVAL SQLite store.
//!
//! Executed once at connection startup. Foreign keys are enforced but carry
//! no `ON DELETE CASCADE`: the refresh protocol deletes leaf tables first and
//! a wrong order fails the transaction instead of silently cascading.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS fetch_meta (
    id         INTEGER PRIMARY KEY,
    file_name  TEXT NOT NULL UNIQUE,
    timestamp  TEXT NOT NULL      -- RFC 3339 UTC
);

-- One live row per (family, os_version), maintained by refresh.
CREATE TABLE IF NOT EXISTS roots (
    id          INTEGER PRIMARY KEY,
    family      TEXT NOT NULL,    -- 'redhat' | 'debian' | 'ubuntu' | 'oracle'
    os_version  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS definitions (
    id             INTEGER PRIMARY KEY,
    root_id        INTEGER NOT NULL REFERENCES roots(id),
    definition_id  TEXT NOT NULL,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS advisories (
    id             INTEGER PRIMARY KEY,
    definition_id  INTEGER NOT NULL UNIQUE REFERENCES definitions(id),
    severity       TEXT NOT NULL,
    issued         TEXT,          -- YYYY-MM-DD or NULL
    updated        TEXT
);

CREATE TABLE IF NOT EXISTS cves (
    id           INTEGER PRIMARY KEY,
    advisory_id  INTEGER NOT NULL REFERENCES advisories(id),
    cve_id       TEXT NOT NULL,
    cvss2        TEXT NOT NULL,
    cvss3        TEXT NOT NULL,
    cwe          TEXT NOT NULL,
    impact       TEXT NOT NULL,
    href         TEXT NOT NULL,
    public       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bugzillas (
    id           INTEGER PRIMARY KEY,
    advisory_id  INTEGER NOT NULL REFERENCES advisories(id),
    bugzilla_id  TEXT NOT NULL,
    url          TEXT NOT NULL,
    title        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cpes (
    id           INTEGER PRIMARY KEY,
    advisory_id  INTEGER NOT NULL REFERENCES advisories(id),
    cpe          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS packages (
    id             INTEGER PRIMARY KEY,
    definition_id  INTEGER NOT NULL REFERENCES definitions(id),
    name           TEXT NOT NULL CHECK (length(name) > 0),
    version        TEXT NOT NULL,
    not_fixed_yet  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS definition_refs (
    id             INTEGER PRIMARY KEY,
    definition_id  INTEGER NOT NULL REFERENCES definitions(id),
    source         TEXT NOT NULL,
    ref_id         TEXT NOT NULL,
    ref_url        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS roots_family_version_idx ON roots(family, os_version);
CREATE INDEX IF NOT EXISTS definitions_root_idx     ON definitions(root_id);
CREATE INDEX IF NOT EXISTS cves_advisory_idx        ON cves(advisory_id);
CREATE INDEX IF NOT EXISTS cves_cve_id_idx          ON cves(cve_id);
CREATE INDEX IF NOT EXISTS bugzillas_advisory_idx   ON bugzillas(advisory_id);
CREATE INDEX IF NOT EXISTS cpes_advisory_idx        ON cpes(advisory_id);
CREATE INDEX IF NOT EXISTS packages_definition_idx  ON packages(definition_id);
CREATE INDEX IF NOT EXISTS packages_name_idx        ON packages(name);
CREATE INDEX IF NOT EXISTS refs_definition_idx      ON definition_refs(definition_id);

PRAGMA user_version = 1;
";
