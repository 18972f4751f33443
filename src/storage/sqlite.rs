//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::crawler::CrawlStats;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, Talk, TalkRecord, UpsertOutcome};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the connection, flushing pending writes
    pub fn close(self) -> StorageResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StorageError::Sqlite(e))
    }

    fn load_keywords(&self, talk_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT keyword FROM talk_keywords WHERE talk_id = ?1 ORDER BY position")?;

        let keywords = stmt
            .query_map(params![talk_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(keywords)
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Failed),
        pages_visited: row.get::<_, i64>(5)? as u64,
        items_found: row.get::<_, i64>(6)? as u64,
        items_stored: row.get::<_, i64>(7)? as u64,
        items_failed: row.get::<_, i64>(8)? as u64,
    })
}

impl RecordStore for SqliteStorage {
    // ===== Talk Management =====

    fn upsert_talk(&mut self, talk: &Talk) -> StorageResult<UpsertOutcome> {
        if talk.url.is_empty() {
            return Err(StorageError::MissingKey);
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM talks WHERE url = ?1",
                params![talk.url],
                |row| row.get(0),
            )
            .optional()?;

        let (talk_id, outcome) = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE talks SET title = ?1, author = ?2, updated_at = ?3 WHERE id = ?4",
                    params![talk.title, talk.author, now, id],
                )?;
                (id, UpsertOutcome::Updated)
            }
            None => {
                tx.execute(
                    "INSERT INTO talks (url, title, author, first_seen_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![talk.url, talk.title, talk.author, now],
                )?;
                (tx.last_insert_rowid(), UpsertOutcome::Created)
            }
        };

        tx.execute(
            "DELETE FROM talk_keywords WHERE talk_id = ?1",
            params![talk_id],
        )?;
        for (position, keyword) in talk.keywords.iter().enumerate() {
            tx.execute(
                "INSERT INTO talk_keywords (talk_id, position, keyword) VALUES (?1, ?2, ?3)",
                params![talk_id, position as i64, keyword],
            )?;
        }

        tx.commit()?;
        Ok(outcome)
    }

    fn get_talk(&self, url: &str) -> StorageResult<Option<TalkRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, url, title, author, first_seen_at, updated_at FROM talks WHERE url = ?1",
                params![url],
                |row| {
                    Ok(TalkRecord {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        author: row.get(3)?,
                        keywords: Vec::new(),
                        first_seen_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()?;

        match record {
            Some(mut record) => {
                record.keywords = self.load_keywords(record.id)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn count_talks(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM talks")
    }

    fn count_talks_without_author(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM talks WHERE author IS NULL")
    }

    fn count_talks_without_title(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM talks WHERE title IS NULL")
    }

    fn count_distinct_keywords(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(DISTINCT keyword) FROM talk_keywords")
    }

    // ===== Run Ledger =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        stats: &CrawlStats,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_visited = ?3, items_found = ?4,
             items_stored = ?5, items_failed = ?6 WHERE id = ?7",
            params![
                status.to_db_string(),
                now,
                stats.pages_visited as i64,
                stats.items_found as i64,
                stats.items_stored as i64,
                stats.items_failed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status, pages_visited,
                 items_found, items_stored, items_failed FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }
}
