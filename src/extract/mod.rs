//! Extraction rules for listing and detail pages
//!
//! Every function here is pure: it reads a parsed document and returns owned
//! values. Missing markup yields empty or absent values; only the caller
//! decides which absences are fatal for an item.

mod detail;
mod listing;

pub use detail::{
    extract_media_url, extract_meta, find_share_control, parse_keywords, visible_label, TalkMeta,
};
pub use listing::extract_listing_links;

use crate::HarvestError;
use scraper::Selector;

/// Compiles a CSS selector, reporting the offending text on failure
pub fn compile_selector(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
