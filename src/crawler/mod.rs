//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a politeness delay and charset fallback
//! - HTML parsing and scope-restricted link extraction
//! - The priority frontier with duplicate suppression
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod stop;

pub use coordinator::{CrawlPhase, CrawlState, Crawler, PageOutcome};
pub use fetcher::{build_http_client, decode_body, fetch_url, Charset, FetchResult, Fetcher};
pub use frontier::{Frontier, FrontierEntry, PriorityPolicy, ProductFirst};
pub use parser::{parse_html, Extractor, MAX_LINK_TEXT_CHARS, NO_LINK_TEXT, UNTITLED};
pub use stop::StopHandle;

pub use crate::output::CrawlSummary;

use crate::config::Config;
use crate::CrawlerError;

/// Runs a complete crawl and returns the finished crawler
///
/// The caller decides where to persist the results with
/// [`Crawler::save_results`].
///
/// # Example
///
/// ```no_run
/// use domain_crawler::config::Config;
/// use domain_crawler::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let crawler = crawl(Config::new("https://example.com/", 10, 1.0)).await?;
/// crawler.save_results(Path::new("crawler_results.json"));
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<Crawler, CrawlerError> {
    let mut crawler = Crawler::new(config)?;
    crawler.crawl().await;
    Ok(crawler)
}
