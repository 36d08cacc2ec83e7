//! SQL schema for the Swell SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- `seq` fixes insertion order; updates never touch it.
CREATE TABLE IF NOT EXISTS subscriptions (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    subscription_id TEXT NOT NULL UNIQUE,
    created_at      TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at      TEXT NOT NULL,   -- RFC 3339 UTC
    locations       TEXT NOT NULL,   -- JSON array of strings, ordered
    kind            TEXT NOT NULL,   -- 'surf' | 'kitesurf'
    frequency       TEXT NOT NULL,   -- 'daily' | 'weekly'
    lookout         TEXT NOT NULL,   -- 'next_3_days' | 'next_week'
    delivery_day    TEXT NOT NULL,   -- 'monday' .. 'sunday'
    delivery_time   TEXT NOT NULL,   -- 'HH:MM'
    email           TEXT NOT NULL
);

PRAGMA user_version = 1;
";
