use serde::Deserialize;

/// Main configuration structure for Talk-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Base address of the paginated talk listing
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Query parameter that carries the 1-based page index
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    /// CSS selector matching talk links on a listing page
    #[serde(rename = "talk-link-selector", default = "default_talk_link_selector")]
    pub talk_link_selector: String,

    /// Optional ceiling on the number of listing pages visited
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_page_param() -> String {
    "page".to_string()
}

/// Selector for talk links on the public talk listing
pub fn default_talk_link_selector() -> String {
    r#".talk-link a[href^="/talks"]"#.to_string()
}

fn default_request_timeout() -> u64 {
    30
}
