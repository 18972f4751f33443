//! Talk-Harvest: a paginated talk catalogue ingester
//!
//! This crate walks a paginated listing of talks, visits every talk's detail
//! page, extracts its metadata and media download link, and upserts one record
//! per canonical media URL into a SQLite store.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod renderer;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Talk-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No share control on {url}")]
    MissingControl { url: String },

    #[error("No media url on {url}")]
    MissingMediaLink { url: String },

    #[error("Navigation failed for {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: renderer::RenderError,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl HarvestError {
    /// Wraps a renderer failure with the URL that was being loaded
    pub fn navigation(url: &::url::Url, source: renderer::RenderError) -> Self {
        Self::Navigation {
            url: url.to_string(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Talk-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlDriver, CrawlStats, TalkProcessor};
pub use storage::{RecordStore, SqliteStorage, Talk, UpsertOutcome};
pub use crate::url::{canonicalize_media_url, listing_page_url};
