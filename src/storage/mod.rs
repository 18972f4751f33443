//! Storage module for persisting harvested talks
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Idempotent talk upserts keyed by canonical media URL
//! - Run ledger entries written at the start and end of each crawl

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::HarvestError;
use std::path::Path;

/// Opens (creating if needed) the talk store at `path`
pub fn open_storage(path: &Path) -> Result<SqliteStorage, HarvestError> {
    Ok(SqliteStorage::new(path)?)
}

/// A talk as extracted from its detail page
///
/// `url` is the canonical media URL and the record's only identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub keywords: Vec<String>,
}

/// A talk as stored, with bookkeeping columns
#[derive(Debug, Clone)]
pub struct TalkRecord {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub keywords: Vec<String>,
    pub first_seen_at: String,
    pub updated_at: String,
}

/// Whether an upsert created a record or refreshed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Represents a crawl run in the ledger
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub pages_visited: u64,
    pub items_found: u64,
    pub items_stored: u64,
    pub items_failed: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
