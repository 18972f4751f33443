//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Talk-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawl run ledger
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    pages_visited INTEGER NOT NULL DEFAULT 0,
    items_found INTEGER NOT NULL DEFAULT 0,
    items_stored INTEGER NOT NULL DEFAULT 0,
    items_failed INTEGER NOT NULL DEFAULT 0
);

-- One row per canonical media URL
CREATE TABLE IF NOT EXISTS talks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT,
    author TEXT,
    first_seen_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Ordered keywords per talk
CREATE TABLE IF NOT EXISTS talk_keywords (
    talk_id INTEGER NOT NULL REFERENCES talks(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    keyword TEXT NOT NULL,
    PRIMARY KEY (talk_id, position)
);

CREATE INDEX IF NOT EXISTS idx_talk_keywords_keyword ON talk_keywords(keyword);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
