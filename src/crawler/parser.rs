//! HTML parser for extracting page records
//!
//! This module turns fetched HTML into a [`Page`]:
//! - Page title
//! - A representative first paragraph
//! - In-scope outbound links with their anchor text

use crate::output::{Link, Page};
use crate::url::{is_in_scope, strip_fragment};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Title recorded when the document has no `<title>` element
pub const UNTITLED: &str = "Untitled";

/// Anchor text recorded when a link has no visible text
pub const NO_LINK_TEXT: &str = "No text";

/// Maximum number of characters kept from anchor text
pub const MAX_LINK_TEXT_CHARS: usize = 100;

/// A paragraph must be longer than this (in characters) to be picked first
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// Extracts page records for one crawl scope
#[derive(Debug, Clone)]
pub struct Extractor {
    base_domain: String,
}

impl Extractor {
    /// Creates an extractor that keeps links on `base_domain`
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
        }
    }

    /// Returns the domain links are restricted to
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Parses `html` fetched from `source_url` into a page record
    pub fn extract(&self, html: &str, source_url: &Url) -> Page {
        parse_html(html, source_url, &self.base_domain)
    }
}

/// Parses HTML content and extracts the page record
///
/// # Link Extraction Rules
///
/// Only `<a href="...">` elements inside `<body>` are considered.
///
/// **Exclude:**
/// - empty hrefs
/// - `javascript:`, `mailto:`, `tel:` links
/// - fragment-only links (`#section`)
/// - links whose resolved host differs from `base_domain`
///
/// Relative links are resolved against `source_url` and fragments are
/// stripped. Duplicates are kept; the frontier suppresses them.
///
/// # Example
///
/// ```
/// use domain_crawler::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let source = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &source, "example.com");
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.links[0].url, "https://example.com/page");
/// ```
pub fn parse_html(html: &str, source_url: &Url, base_domain: &str) -> Page {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let first_paragraph = extract_first_paragraph(&document);

    // html5ever moves anchors found in <head> into the body, so links are
    // read from the markup starting at the explicit <body> tag when there is one
    let links = match body_markup(html) {
        Some(body) => extract_links(&Html::parse_document(body), source_url, base_domain),
        None => extract_links(&document, source_url, base_domain),
    };

    Page::new(title, source_url.to_string(), first_paragraph, links)
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return UNTITLED.to_string();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| trimmed_text(&element))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Picks the first paragraph longer than [`MIN_PARAGRAPH_CHARS`]
///
/// Falls back to the first paragraph of any length, then to an empty string.
fn extract_first_paragraph(document: &Html) -> String {
    let Ok(p_selector) = Selector::parse("p") else {
        return String::new();
    };

    let mut paragraphs = document.select(&p_selector).map(|p| trimmed_text(&p));
    let Some(first) = paragraphs.next() else {
        return String::new();
    };

    if first.chars().count() > MIN_PARAGRAPH_CHARS {
        return first;
    }

    paragraphs
        .find(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .unwrap_or(first)
}

/// Returns the markup from the first `<body` start tag onward
fn body_markup(html: &str) -> Option<&str> {
    let lowered = html.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(found) = lowered[offset..].find("<body") {
        let start = offset + found;
        let after = start + "<body".len();
        match lowered.as_bytes().get(after).copied() {
            Some(b'>' | b'/') => return Some(&html[start..]),
            Some(c) if c.is_ascii_whitespace() => return Some(&html[start..]),
            None => return None,
            // e.g. <bodyguard>
            Some(_) => offset = after,
        }
    }

    None
}

/// Extracts in-scope links from anchors inside `<body>`
fn extract_links(document: &Html, source_url: &Url, base_domain: &str) -> Vec<Link> {
    let (Ok(body_selector), Ok(a_selector)) = (Selector::parse("body"), Selector::parse("a[href]"))
    else {
        return Vec::new();
    };

    let Some(body) = document.select(&body_selector).next() else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in body.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(href, source_url, base_domain) else {
            continue;
        };

        links.push(Link {
            url: url.to_string(),
            text: link_text(&element),
        });
    }

    links
}

/// Resolves a link href to an absolute, fragment-free, in-scope URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, source_url: &Url, base_domain: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let absolute_url = source_url.join(href).ok()?;

    if !is_in_scope(&absolute_url, base_domain) {
        return None;
    }

    Some(strip_fragment(absolute_url))
}

/// Anchor text trimmed and cut to [`MAX_LINK_TEXT_CHARS`], or the placeholder
fn link_text(element: &ElementRef) -> String {
    let text: String = trimmed_text(element)
        .chars()
        .take(MAX_LINK_TEXT_CHARS)
        .collect();

    if text.is_empty() {
        NO_LINK_TEXT.to_string()
    } else {
        text
    }
}

fn trimmed_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
