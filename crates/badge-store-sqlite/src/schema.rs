//! SQL schema for the officer graph SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Node label: Officer
CREATE TABLE IF NOT EXISTS officers (
    uid           TEXT PRIMARY KEY,
    first_name    TEXT,
    middle_name   TEXT,
    last_name     TEXT,
    suffix        TEXT,
    ethnicity     TEXT,            -- Ethnicity code
    gender        TEXT,            -- Gender code
    date_of_birth TEXT,            -- YYYY-MM-DD
    year_of_birth TEXT,
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Node label: StateID
CREATE TABLE IF NOT EXISTS state_ids (
    state_id   TEXT PRIMARY KEY,
    id_name    TEXT,
    state      TEXT NOT NULL,      -- State code
    value      TEXT,
    created_at TEXT NOT NULL
);

-- Plain edges out of an officer, keyed by edge label.
-- Rows are never updated. The only delete is the swap of a HAS_STATE_ID edge
-- during reassignment, inside the same transaction as its replacement.
CREATE TABLE IF NOT EXISTS edges (
    edge_id     TEXT PRIMARY KEY,
    label       TEXT NOT NULL,
    from_id     TEXT NOT NULL REFERENCES officers(uid),
    to_id       TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

-- A StateID has at most one owner at the storage level; the store's
-- transaction guard supplies the at-least-one half.
CREATE UNIQUE INDEX IF NOT EXISTS edges_state_id_owner_idx
    ON edges(to_id) WHERE label = 'HAS_STATE_ID';

CREATE INDEX IF NOT EXISTS edges_from_idx ON edges(from_id, label);

-- Attributed UPDATED_BY edges.
CREATE TABLE IF NOT EXISTS citations (
    citation_id TEXT PRIMARY KEY,
    officer_uid TEXT NOT NULL REFERENCES officers(uid),
    source_id   TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    as_of       TEXT,              -- YYYY-MM-DD
    url         TEXT,
    diff        TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS citations_officer_idx ON citations(officer_uid);

PRAGMA user_version = 1;
";
