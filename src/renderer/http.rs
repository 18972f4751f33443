//! HTTP page renderer
//!
//! Renders pages by fetching their served markup with `reqwest`. Static
//! markup runs no scripts, so activating a control only verifies that it is
//! present on the current page; the DOM is unchanged afterwards.

use crate::config::UserAgentConfig;
use crate::renderer::{Control, PageRenderer, RenderError, RenderResult, RenderedPage};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Page renderer backed by plain HTTP GET requests
pub struct HttpRenderer {
    client: Client,
    current: Option<RenderedPage>,
}

impl HttpRenderer {
    /// Builds a renderer with the crawler's user agent and request timeout
    ///
    /// # Example
    ///
    /// ```no_run
    /// use talk_harvest::config::UserAgentConfig;
    /// use talk_harvest::renderer::HttpRenderer;
    ///
    /// let config = UserAgentConfig {
    ///     crawler_name: "TalkHarvest".to_string(),
    ///     crawler_version: "1.0".to_string(),
    ///     contact_url: "https://example.com/about".to_string(),
    ///     contact_email: "admin@example.com".to_string(),
    /// };
    ///
    /// let renderer = HttpRenderer::new(&config, 30).unwrap();
    /// ```
    pub fn new(config: &UserAgentConfig, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, timeout_secs)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }
}

/// Builds an HTTP client with the crawler's identification
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a transport error onto the renderer taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        RenderError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        RenderError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn check_control(page: &RenderedPage, control: &Control) -> RenderResult<()> {
    let document = page.document();
    if control.is_present_in(&document)? {
        Ok(())
    } else {
        Err(RenderError::ElementNotFound {
            selector: control.selector.clone(),
            index: control.index,
        })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn navigate(&mut self, url: &Url) -> RenderResult<()> {
        // A failed navigation leaves no page behind
        self.current = None;

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        self.current = Some(RenderedPage::new(final_url, body));
        Ok(())
    }

    async fn content(&self) -> RenderResult<RenderedPage> {
        self.current.clone().ok_or(RenderError::NoPage)
    }

    async fn click(&mut self, control: &Control) -> RenderResult<()> {
        let page = self.current.as_ref().ok_or(RenderError::NoPage)?;
        check_control(page, control)?;
        tracing::trace!("Activated control '{}' on {}", control.label, page.url());
        Ok(())
    }
}
