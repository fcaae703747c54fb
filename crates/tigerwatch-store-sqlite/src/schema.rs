//! SQL schema for the tigerwatch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tigers (
    tiger_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,      -- YYYY-MM-DD
    last_seen_at  TEXT NOT NULL,
    last_seen_lat REAL NOT NULL,
    last_seen_lon REAL NOT NULL,
    created_at    TEXT NOT NULL
);

-- Sightings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS sightings (
    sighting_id         TEXT PRIMARY KEY,
    tiger_id            INTEGER NOT NULL REFERENCES tigers(tiger_id),
    reported_by_user_id TEXT NOT NULL REFERENCES users(user_id),
    lat                 REAL NOT NULL,
    lon                 REAL NOT NULL,
    sighted_at          TEXT NOT NULL,
    image_url           TEXT,
    recorded_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS sightings_tiger_sighted_idx
    ON sightings(tiger_id, sighted_at DESC);
CREATE INDEX IF NOT EXISTS tigers_last_seen_idx
    ON tigers(last_seen_at DESC);

PRAGMA user_version = 1;
";
