use crate::UrlError;
use url::Url;

/// Canonicalizes a media download URL into the identity key of a talk
///
/// Download links carry per-visit tokens in their query string, so the query is
/// dropped entirely. Scheme, host, path and fragment are kept as served.
///
/// # Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP or HTTPS scheme and a host
/// 3. Remove the query string (including a bare trailing `?`)
///
/// # Examples
///
/// ```
/// use talk_harvest::url::canonicalize_media_url;
///
/// let url = canonicalize_media_url("https://example.com/media/123?token=abc&ts=456").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/media/123");
/// ```
pub fn canonicalize_media_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS media links are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_query(None);

    Ok(url)
}
