//! Page rendering boundary
//!
//! The crawl only ever talks to a page through this interface: load a URL,
//! hand back the rendered markup, and activate a control on the current page.
//! One renderer is one logical browsing session and is used strictly serially.

mod http;

pub use http::HttpRenderer;

use async_trait::async_trait;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Errors raised by a page renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("No page has been loaded")]
    NoPage,

    #[error("Element {selector}[{index}] is not on the current page")]
    ElementNotFound { selector: String, index: usize },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A snapshot of the rendered DOM of the current page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    url: Url,
    html: String,
}

impl RenderedPage {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    /// Final URL of the page, used as the base for relative links
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Parses the snapshot into a queryable document
    ///
    /// The returned document is not `Send`; keep it out of scope across awaits.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// An interactive element on the current page, addressed by selector and
/// document-order position among the selector's matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub selector: String,
    pub index: usize,
    /// Visible label at the time the control was located
    pub label: String,
}

impl Control {
    /// Checks that the control still exists in `document`
    pub fn is_present_in(&self, document: &Html) -> RenderResult<bool> {
        let selector = Selector::parse(&self.selector)
            .map_err(|_| RenderError::InvalidSelector(self.selector.clone()))?;
        Ok(document.select(&selector).nth(self.index).is_some())
    }
}

/// Rendering/navigation engine used by the crawl
#[async_trait]
pub trait PageRenderer: Send {
    /// Loads and renders `url`, replacing the current page
    async fn navigate(&mut self, url: &Url) -> RenderResult<()>;

    /// Returns the rendered DOM of the current page
    async fn content(&self) -> RenderResult<RenderedPage>;

    /// Activates `control` on the current page
    async fn click(&mut self, control: &Control) -> RenderResult<()>;
}
