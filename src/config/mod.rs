//! Configuration module for Talk-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use talk_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Listing pages start at: {}", config.crawler.listing_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_talk_link_selector, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
