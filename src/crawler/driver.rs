//! Crawl driver - the pagination loop
//!
//! Visits listing page 1, 2, 3, ... and hands every talk link to the
//! processor in document order. An empty listing page ends the crawl.
//! Failures on a detail page are logged and skipped; failures loading a
//! listing page abort the run.

use crate::config::CrawlerConfig;
use crate::crawler::processor::TalkProcessor;
use crate::extract::{compile_selector, extract_listing_links};
use crate::renderer::PageRenderer;
use crate::storage::{RecordStore, UpsertOutcome};
use crate::url::listing_page_url;
use crate::HarvestError;
use scraper::Selector;
use url::Url;

/// Counters for one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Listing pages loaded, including the final empty one
    pub pages_visited: u64,
    /// Talk links handed to the processor
    pub items_found: u64,
    /// Talks successfully upserted
    pub items_stored: u64,
    /// Talks skipped after a failure
    pub items_failed: u64,
}

/// Where and how to paginate
#[derive(Debug, Clone)]
pub struct CrawlPlan {
    pub listing_url: Url,
    pub page_param: String,
    pub talk_selector: Selector,
    pub max_pages: Option<u32>,
}

impl CrawlPlan {
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            listing_url: Url::parse(&config.listing_url)?,
            page_param: config.page_param.clone(),
            talk_selector: compile_selector(&config.talk_link_selector)?,
            max_pages: config.max_pages,
        })
    }
}

/// Main crawl driver
pub struct CrawlDriver<R, S> {
    renderer: R,
    store: S,
    plan: CrawlPlan,
    stats: CrawlStats,
}

impl<R, S> CrawlDriver<R, S>
where
    R: PageRenderer,
    S: RecordStore,
{
    pub fn new(renderer: R, store: S, plan: CrawlPlan) -> Self {
        Self {
            renderer,
            store,
            plan,
            stats: CrawlStats::default(),
        }
    }

    /// Counters so far; still meaningful after `run` returned an error
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Gives back the renderer, the store and the final counters
    pub fn into_parts(self) -> (R, S, CrawlStats) {
        (self.renderer, self.store, self.stats)
    }

    /// Runs the pagination loop to completion
    ///
    /// The cursor starts at 1 and advances by one after every non-empty
    /// page. The loop stops at the first empty listing page, or once
    /// `max_pages` pages have been visited when a ceiling is configured.
    /// Counters start from zero on every call.
    pub async fn run(&mut self) -> Result<CrawlStats, HarvestError> {
        self.stats = CrawlStats::default();
        let mut cursor: u32 = 1;

        loop {
            if let Some(max_pages) = self.plan.max_pages {
                if cursor > max_pages {
                    tracing::warn!(
                        "Stopping after {} listing pages: max-pages ceiling reached",
                        max_pages
                    );
                    break;
                }
            }

            let found = self.process_listing_page(cursor).await?;
            if found == 0 {
                tracing::info!("Listing page {} is empty, crawl complete", cursor);
                break;
            }

            cursor += 1;
        }

        tracing::debug!(
            "Crawl finished: {} pages, {} talks found, {} stored, {} failed",
            self.stats.pages_visited,
            self.stats.items_found,
            self.stats.items_stored,
            self.stats.items_failed
        );

        Ok(self.stats)
    }

    /// Visits one listing page and processes its talks
    ///
    /// Returns the number of talk links found. Errors loading the listing
    /// page itself are returned; errors on individual talks are not.
    pub async fn process_listing_page(&mut self, page: u32) -> Result<usize, HarvestError> {
        let url = listing_page_url(&self.plan.listing_url, &self.plan.page_param, page);
        tracing::info!("Listing page {}: {}", page, url);

        self.renderer
            .navigate(&url)
            .await
            .map_err(|e| HarvestError::navigation(&url, e))?;
        let rendered = self
            .renderer
            .content()
            .await
            .map_err(|e| HarvestError::navigation(&url, e))?;

        let talks = extract_listing_links(
            &rendered.document(),
            rendered.url(),
            &self.plan.talk_selector,
        );
        self.stats.pages_visited += 1;

        if talks.is_empty() {
            return Ok(0);
        }

        tracing::debug!("Found {} talks on listing page {}", talks.len(), page);
        self.stats.items_found += talks.len() as u64;

        let mut processor = TalkProcessor::new(&mut self.renderer, &mut self.store);
        for talk_url in &talks {
            match processor.process(talk_url).await {
                Ok(processed) => {
                    self.stats.items_stored += 1;
                    let verb = match processed.outcome {
                        UpsertOutcome::Created => "Stored",
                        UpsertOutcome::Updated => "Refreshed",
                    };
                    tracing::info!(
                        "{} {} ({})",
                        verb,
                        processed.talk.title.as_deref().unwrap_or("<untitled>"),
                        processed.talk.url
                    );
                }
                Err(e) => {
                    self.stats.items_failed += 1;
                    tracing::error!("(ERROR) [{}]: {}", talk_url, e);
                }
            }
        }

        Ok(talks.len())
    }
}
