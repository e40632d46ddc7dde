//! URL handling module
//!
//! This module provides domain extraction, fragment normalization and the
//! single-domain scope check used by the link extractor.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize_url, strip_fragment};

use url::Url;

/// Returns true if a URL falls inside the crawl scope
///
/// A URL is in scope when its domain equals `base_domain`, or when it carries
/// no host at all.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use domain_crawler::url::is_in_scope;
///
/// let inside = Url::parse("https://example.com/a").unwrap();
/// let outside = Url::parse("https://other.com/a").unwrap();
/// assert!(is_in_scope(&inside, "example.com"));
/// assert!(!is_in_scope(&outside, "example.com"));
/// ```
pub fn is_in_scope(url: &Url, base_domain: &str) -> bool {
    match extract_domain(url) {
        Some(domain) => domain == base_domain,
        None => true,
    }
}
