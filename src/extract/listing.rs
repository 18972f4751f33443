use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts talk detail URLs from a listing page
///
/// Anchors matching `talk_selector` are returned in document order as
/// absolute URLs. Anchors without a usable href are skipped. Duplicates are
/// kept; the upsert downstream collapses them.
///
/// # Example
///
/// ```
/// use scraper::{Html, Selector};
/// use talk_harvest::extract::extract_listing_links;
/// use url::Url;
///
/// let html = r#"<div class="talk-link"><a href="/talks/one">One</a></div>"#;
/// let document = Html::parse_document(html);
/// let selector = Selector::parse(r#".talk-link a[href^="/talks"]"#).unwrap();
/// let base = Url::parse("https://www.ted.com/talks?page=1").unwrap();
///
/// let links = extract_listing_links(&document, &base, &selector);
/// assert_eq!(links[0].as_str(), "https://www.ted.com/talks/one");
/// ```
pub fn extract_listing_links(document: &Html, base_url: &Url, talk_selector: &Selector) -> Vec<Url> {
    document
        .select(talk_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}
