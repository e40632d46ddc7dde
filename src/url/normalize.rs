use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes an absolute URL for use as a frontier key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Reject schemes other than http and https
/// 3. Remove fragment (everything after #)
///
/// Scheme, host, path, params and query are kept as the URL parser
/// serializes them, so `http://x/p#frag1` and `http://x/p#frag2` collapse to
/// the same key.
///
/// # Examples
///
/// ```
/// use domain_crawler::url::normalize_url;
///
/// let url = normalize_url("http://example.com/page?id=3#reviews").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page?id=3");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    Ok(strip_fragment(url))
}

/// Removes the fragment component from a parsed URL
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
