//! SQL schema for the devlink SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,   -- trimmed, lower-cased
    avatar        TEXT NOT NULL,
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- One profile per user. Embedded sequences are JSON arrays, most recent
-- first, and are rewritten together with the row on every save.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id      TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL UNIQUE REFERENCES users(user_id),
    company         TEXT,
    website         TEXT,
    location        TEXT,
    status          TEXT NOT NULL,
    skills          TEXT NOT NULL DEFAULT '[]',
    bio             TEXT,
    github_username TEXT,
    social          TEXT NOT NULL DEFAULT '{}',
    experience      TEXT NOT NULL DEFAULT '[]',
    education       TEXT NOT NULL DEFAULT '[]',
    created_at      TEXT NOT NULL,
    version         INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS posts (
    post_id    TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    text       TEXT NOT NULL,
    name       TEXT NOT NULL,   -- author snapshot
    avatar     TEXT NOT NULL,   -- author snapshot
    likes      TEXT NOT NULL DEFAULT '[]',
    comments   TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    version    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS posts_user_idx    ON posts(user_id);
CREATE INDEX IF NOT EXISTS posts_created_idx ON posts(created_at);

PRAGMA user_version = 1;
";
