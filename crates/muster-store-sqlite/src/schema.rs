//! SQL schema for the Muster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The UNIQUE constraint on `index_number` is the sole uniqueness authority:
/// the store never pre-checks for duplicates, it inserts and maps the
/// constraint violation.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS registrations (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    index_number      TEXT NOT NULL UNIQUE,
    email             TEXT NOT NULL,
    combination       TEXT NOT NULL,
    mobile_number     TEXT,
    attendance_status INTEGER NOT NULL DEFAULT 0,  -- 0 = pending, 1 = attended
    created_at        TEXT NOT NULL,               -- RFC 3339 UTC; server-assigned
    updated_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS registrations_created_idx ON registrations(created_at);

PRAGMA user_version = 1;
";
