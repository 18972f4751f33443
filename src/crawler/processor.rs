//! Detail page processing
//!
//! One visit: navigate, reveal the share panel, pick the media link, read the
//! meta tags, canonicalize, upsert. Any failure leaves the store untouched for
//! that item and is returned to the driver, which contains it.

use crate::extract::{extract_media_url, extract_meta, find_share_control, TalkMeta};
use crate::renderer::PageRenderer;
use crate::storage::{RecordStore, Talk, UpsertOutcome};
use crate::url::canonicalize_media_url;
use crate::HarvestError;
use url::Url;

/// A talk that was extracted and stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedTalk {
    pub talk: Talk,
    pub outcome: UpsertOutcome,
}

/// Processes talk detail pages against a renderer and a store
pub struct TalkProcessor<'a, R: ?Sized, S: ?Sized> {
    renderer: &'a mut R,
    store: &'a mut S,
}

impl<'a, R, S> TalkProcessor<'a, R, S>
where
    R: PageRenderer + ?Sized,
    S: RecordStore + ?Sized,
{
    pub fn new(renderer: &'a mut R, store: &'a mut S) -> Self {
        Self { renderer, store }
    }

    /// Visits `detail_url` and upserts the talk found there
    ///
    /// # Errors
    ///
    /// * `Navigation` - the page could not be loaded or the control vanished
    /// * `MissingControl` - no share button on the page
    /// * `MissingMediaLink` - neither an audio nor a video download link
    /// * `Persistence` - the store rejected the upsert
    pub async fn process(&mut self, detail_url: &Url) -> Result<ProcessedTalk, HarvestError> {
        tracing::debug!("Processing talk {}", detail_url);

        self.renderer
            .navigate(detail_url)
            .await
            .map_err(|e| HarvestError::navigation(detail_url, e))?;

        let page = self
            .renderer
            .content()
            .await
            .map_err(|e| HarvestError::navigation(detail_url, e))?;

        let control = find_share_control(&page.document()).ok_or_else(|| {
            HarvestError::MissingControl {
                url: detail_url.to_string(),
            }
        })?;

        // Some layouts only insert the download links once sharing is opened
        self.renderer
            .click(&control)
            .await
            .map_err(|e| HarvestError::navigation(detail_url, e))?;

        let page = self
            .renderer
            .content()
            .await
            .map_err(|e| HarvestError::navigation(detail_url, e))?;

        let (media_url, meta) = {
            let document = page.document();
            (
                extract_media_url(&document, page.url()),
                extract_meta(&document),
            )
        };

        let media_url = media_url.ok_or_else(|| HarvestError::MissingMediaLink {
            url: detail_url.to_string(),
        })?;

        let talk = build_talk(&media_url, meta)?;
        let outcome = self.store.upsert_talk(&talk)?;

        Ok(ProcessedTalk { talk, outcome })
    }
}

/// Assembles a storable talk from a media link and page metadata
pub fn build_talk(media_url: &Url, meta: TalkMeta) -> Result<Talk, HarvestError> {
    let canonical = canonicalize_media_url(media_url.as_str())?;

    Ok(Talk {
        url: canonical.into(),
        title: meta.title,
        author: meta.author,
        keywords: meta.keywords,
    })
}
