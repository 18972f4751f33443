//! Crawler module: the pagination driver and the per-talk processor
//!
//! This module contains the core harvesting logic:
//! - Walking listing pages until one comes back empty
//! - Visiting each talk's detail page and extracting its record
//! - Containing per-talk failures so the crawl carries on
//! - Recording each run in the store's ledger

mod driver;
mod processor;
#[cfg(test)]
mod testing;

pub use driver::{CrawlDriver, CrawlPlan, CrawlStats};
pub use processor::{build_talk, ProcessedTalk, TalkProcessor};

use crate::config::Config;
use crate::renderer::HttpRenderer;
use crate::storage::{open_storage, RecordStore, RunStatus};
use crate::HarvestError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the crawl plan and the HTTP renderer
/// 2. Open the store and record a new run
/// 3. Drive the pagination loop to completion
/// 4. Record the run's outcome and release the store, whether or not the
///    crawl succeeded
///
/// # Example
///
/// ```no_run
/// use talk_harvest::config::load_config_with_hash;
/// use talk_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("harvest.toml"))?;
/// let stats = run_crawl(&config, &hash).await?;
/// println!("{} talks found", stats.items_found);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlStats, HarvestError> {
    let plan = CrawlPlan::from_config(&config.crawler)?;
    let renderer = HttpRenderer::new(&config.user_agent, config.crawler.request_timeout_secs)?;

    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let run_id = storage.create_run(config_hash)?;
    tracing::info!("Starting crawl run {}", run_id);

    let mut driver = CrawlDriver::new(renderer, storage, plan);
    let result = driver.run().await;
    let (_, mut storage, stats) = driver.into_parts();

    let status = if result.is_ok() {
        RunStatus::Completed
    } else {
        RunStatus::Failed
    };
    if let Err(e) = storage.finish_run(run_id, status, &stats) {
        tracing::warn!("Failed to record outcome of run {}: {}", run_id, e);
    }
    if let Err(e) = storage.close() {
        tracing::warn!("Failed to close store: {}", e);
    }

    result
}
