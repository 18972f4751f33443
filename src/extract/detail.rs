//! Detail page rules: the share control, the media link and the meta tags
//!
//! Controls and links are matched on their visible label with a
//! case-insensitive substring test. Those labels are the contract the
//! target site's markup honours, so the patterns are fixed.

use crate::renderer::Control;
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const CONTROL_SELECTOR: &str = "button";
const SHARE_PATTERN: &str = "share";
const AUDIO_PATTERN: &str = "download audio";
const VIDEO_PATTERN: &str = "download video";

/// Keyword separator used by the `keywords` meta tag
const KEYWORD_SEPARATOR: &str = ", ";

/// Metadata read from a detail page's meta tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkMeta {
    /// `og:title` property
    pub title: Option<String>,
    /// `author` meta name
    pub author: Option<String>,
    /// `keywords` meta name, split into an ordered list
    pub keywords: Vec<String>,
}

/// Returns the visible label of an element with whitespace collapsed
pub fn visible_label(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn label_matches(element: &ElementRef<'_>, pattern: &str) -> bool {
    visible_label(element).to_lowercase().contains(pattern)
}

/// Locates the first button whose label contains "share"
pub fn find_share_control(document: &Html) -> Option<Control> {
    let selector = Selector::parse(CONTROL_SELECTOR).ok()?;

    document
        .select(&selector)
        .enumerate()
        .find(|(_, element)| label_matches(element, SHARE_PATTERN))
        .map(|(index, element)| Control {
            selector: CONTROL_SELECTOR.to_string(),
            index,
            label: visible_label(&element),
        })
}

/// Picks the media download link of a detail page
///
/// The first anchor labelled "download audio" wins; failing that, the first
/// labelled "download video". The chosen anchor's href is resolved against
/// `base_url`. Returns None if neither label is present or the chosen href is
/// unusable.
pub fn extract_media_url(document: &Html, base_url: &Url) -> Option<Url> {
    let selector = Selector::parse("a").ok()?;
    let anchors: Vec<ElementRef<'_>> = document.select(&selector).collect();

    let chosen = anchors
        .iter()
        .find(|a| label_matches(a, AUDIO_PATTERN))
        .or_else(|| anchors.iter().find(|a| label_matches(a, VIDEO_PATTERN)))?;

    let href = chosen.value().attr("href")?;
    resolve_link(href, base_url)
}

/// Reads title, author and keywords from the page's meta tags
///
/// Each field is independent: a missing tag, or a tag without content, leaves
/// that field empty and never fails the extraction.
pub fn extract_meta(document: &Html) -> TalkMeta {
    let selector = match Selector::parse("meta") {
        Ok(selector) => selector,
        Err(_) => return TalkMeta::default(),
    };
    let metas: Vec<ElementRef<'_>> = document.select(&selector).collect();

    let content_where = |attribute: &str, value: &str| -> Option<String> {
        metas
            .iter()
            .find(|m| m.value().attr(attribute) == Some(value))
            .and_then(|m| m.value().attr("content"))
            .filter(|content| !content.is_empty())
            .map(str::to_string)
    };

    TalkMeta {
        title: content_where("property", "og:title"),
        author: content_where("name", "author"),
        keywords: parse_keywords(content_where("name", "keywords").as_deref()),
    }
}

/// Splits a `keywords` meta value on ", " preserving order
///
/// An absent or empty value yields no keywords. Otherwise every piece of the
/// split is kept, including empty ones.
///
/// # Example
///
/// ```
/// use talk_harvest::extract::parse_keywords;
///
/// assert_eq!(
///     parse_keywords(Some("design, technology, innovation")),
///     vec!["design", "technology", "innovation"]
/// );
/// assert!(parse_keywords(None).is_empty());
/// ```
pub fn parse_keywords(content: Option<&str>) -> Vec<String> {
    match content {
        Some(content) if !content.is_empty() => content
            .split(KEYWORD_SEPARATOR)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
