//! In-memory renderer serving canned markup

use crate::renderer::{Control, PageRenderer, RenderError, RenderResult, RenderedPage};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Serves fixed HTML per URL and records what the crawl did
#[derive(Default)]
pub struct ScriptedRenderer {
    pages: HashMap<String, String>,
    unreachable: HashSet<String>,
    visits: Vec<String>,
    clicks: Vec<Control>,
    current: Option<RenderedPage>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    /// Makes navigation to `url` fail with a network error
    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    pub fn visits(&self) -> &[String] {
        &self.visits
    }

    pub fn clicks(&self) -> &[Control] {
        &self.clicks
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn navigate(&mut self, url: &Url) -> RenderResult<()> {
        self.visits.push(url.to_string());
        self.current = None;

        if self.unreachable.contains(url.as_str()) {
            return Err(RenderError::Network {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            });
        }

        let html = self.pages.get(url.as_str()).ok_or(RenderError::Status {
            url: url.to_string(),
            status: 404,
        })?;
        self.current = Some(RenderedPage::new(url.clone(), html.clone()));
        Ok(())
    }

    async fn content(&self) -> RenderResult<RenderedPage> {
        self.current.clone().ok_or(RenderError::NoPage)
    }

    async fn click(&mut self, control: &Control) -> RenderResult<()> {
        if self.current.is_none() {
            return Err(RenderError::NoPage);
        }
        self.clicks.push(control.clone());
        Ok(())
    }
}

/// Builds a detail page with a share button and a download link
pub fn detail_page(
    title: Option<&str>,
    author: Option<&str>,
    keywords: Option<&str>,
    media_href: &str,
) -> String {
    let mut head = String::new();
    if let Some(title) = title {
        head.push_str(&format!(r#"<meta property="og:title" content="{}">"#, title));
    }
    if let Some(author) = author {
        head.push_str(&format!(r#"<meta name="author" content="{}">"#, author));
    }
    if let Some(keywords) = keywords {
        head.push_str(&format!(r#"<meta name="keywords" content="{}">"#, keywords));
    }

    format!(
        r#"<html><head>{}</head><body>
            <button>Like</button>
            <button>Share</button>
            <a href="{}">Download audio</a>
        </body></html>"#,
        head, media_href
    )
}

/// Builds a listing page linking to the given talk paths
pub fn listing_page(paths: &[&str]) -> String {
    let cards: String = paths
        .iter()
        .map(|p| format!(r#"<div class="talk-link"><a href="{}">Talk</a></div>"#, p))
        .collect();
    format!("<html><body>{}</body></html>", cards)
}
