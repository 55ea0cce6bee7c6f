//! SQL schema for the docvault SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Documents are created once and mutated only by the archive transition.
-- No DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS documents (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    path        TEXT NOT NULL,     -- opaque blob-store locator
    owner_id    TEXT NOT NULL REFERENCES users(id),
    expires_at  TEXT NOT NULL,     -- ISO 8601 UTC
    archived_at TEXT,              -- NULL = live; set once, never cleared
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS documents_owner_idx   ON documents(owner_id);
CREATE INDEX IF NOT EXISTS documents_expires_idx ON documents(expires_at);

PRAGMA user_version = 1;
";
