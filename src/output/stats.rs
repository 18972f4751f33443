//! Statistics read back from the talk store
//!
//! This module provides functionality for extracting and displaying
//! store statistics for the `--stats` mode.

use crate::storage::{RecordStore, RunRecord};
use crate::HarvestError;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored talks
    pub total_talks: u64,

    /// Talks stored without an author
    pub talks_without_author: u64,

    /// Talks stored without a title
    pub talks_without_title: u64,

    /// Distinct keywords across all talks
    pub distinct_keywords: u64,

    /// Most recent crawl run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics<S: RecordStore + ?Sized>(
    storage: &S,
) -> Result<StoreStatistics, HarvestError> {
    Ok(StoreStatistics {
        total_talks: storage.count_talks()?,
        talks_without_author: storage.count_talks_without_author()?,
        talks_without_title: storage.count_talks_without_title()?,
        distinct_keywords: storage.count_distinct_keywords()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Talk Store Statistics ===\n");

    println!("Talks:");
    println!("  Stored: {}", stats.total_talks);
    println!("  Without author: {}", stats.talks_without_author);
    println!("  Without title: {}", stats.talks_without_title);
    println!("  Distinct keywords: {}", stats.distinct_keywords);
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            println!(
                "  Finished: {}",
                run.finished_at.as_deref().unwrap_or("-")
            );
            println!("  Config hash: {}", run.config_hash);
            println!("  Listing pages visited: {}", run.pages_visited);
            println!(
                "  Talks: {} found, {} stored, {} failed",
                run.items_found, run.items_stored, run.items_failed
            );
        }
        None => println!("No crawl runs recorded"),
    }
}
