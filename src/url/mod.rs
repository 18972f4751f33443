//! URL handling module for Talk-Harvest
//!
//! This module builds listing page addresses, resolves links found in markup,
//! and canonicalizes media download URLs into record identity keys.

mod normalize;

pub use normalize::canonicalize_media_url;

use url::Url;

/// Builds the address of listing page `page` (1-based)
///
/// Any existing value of `page_param` on the base URL is replaced; other query
/// parameters are preserved in their original order.
///
/// # Examples
///
/// ```
/// use talk_harvest::url::listing_page_url;
/// use url::Url;
///
/// let base = Url::parse("https://www.ted.com/talks").unwrap();
/// let url = listing_page_url(&base, "page", 3);
/// assert_eq!(url.as_str(), "https://www.ted.com/talks?page=3");
/// ```
pub fn listing_page_url(base: &Url, page_param: &str, page: u32) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != page_param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(page_param, &page.to_string());
    }
    url
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that do not resolve to an HTTP(S) URL
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        _ => None,
    }
}
