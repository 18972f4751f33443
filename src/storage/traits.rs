//! Storage traits and error types
//!
//! This module defines the trait interface for talk stores and associated
//! error types.

use crate::crawler::CrawlStats;
use crate::storage::{RunRecord, RunStatus, Talk, TalkRecord, UpsertOutcome};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Talk has no url")]
    MissingKey,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable keyed store for harvested talks
///
/// `url` is the exclusive match key. Implementations create a record on first
/// sight of a key and replace every non-key field on later sightings, absent
/// ones included. `first_seen_at` is only written on creation.
pub trait RecordStore {
    // ===== Talk Management =====

    /// Creates or refreshes the talk keyed by `talk.url`
    fn upsert_talk(&mut self, talk: &Talk) -> StorageResult<UpsertOutcome>;

    /// Gets a talk by its canonical URL
    fn get_talk(&self, url: &str) -> StorageResult<Option<TalkRecord>>;

    /// Counts stored talks
    fn count_talks(&self) -> StorageResult<u64>;

    /// Counts stored talks that have no author
    fn count_talks_without_author(&self) -> StorageResult<u64>;

    /// Counts stored talks that have no title
    fn count_talks_without_title(&self) -> StorageResult<u64>;

    /// Counts distinct keywords across all talks
    fn count_distinct_keywords(&self) -> StorageResult<u64>;

    // ===== Run Ledger =====

    /// Opens a ledger entry for a new run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Closes a ledger entry with its final status and counters
    fn finish_run(&mut self, run_id: i64, status: RunStatus, stats: &CrawlStats)
        -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
