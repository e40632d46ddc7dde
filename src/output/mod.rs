//! Output module for crawl results
//!
//! This module handles:
//! - The page record schema shared with the downstream indexer
//! - Buffering records and persisting them as a JSON array
//! - The end-of-run statistics report

mod record;
pub mod stats;
mod store;

pub use record::{Link, Page, Review};
pub use stats::{format_summary, print_summary, CrawlSummary, SummaryReport};
pub use store::ResultStore;

use thiserror::Error;

/// Errors that can occur while persisting or reloading results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
