use rusqlite_migration::{Migrations, M};

/// Define all schema migrations.
/// Uses SQLite user_version pragma for tracking — no migration table needed.
pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "-- Migration 1: Initial schema

CREATE TABLE capsules (
    id TEXT PRIMARY KEY,
    message TEXT NOT NULL,
    unlock_date TEXT NOT NULL,
    is_public INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX idx_capsules_unlock ON capsules(unlock_date);

CREATE TABLE quotes (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    author TEXT NOT NULL,
    theme TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX idx_quotes_theme ON quotes(theme);

CREATE TABLE poll_votes (
    option_index INTEGER PRIMARY KEY,
    votes INTEGER NOT NULL DEFAULT 0
);
",
    )])
}
