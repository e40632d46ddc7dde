//! Crawl statistics and the end-of-run report
//!
//! This module holds the counters the orchestrator accumulates during a run
//! and renders the human-readable summary printed by the binary.

use crate::output::Page;
use std::fmt;

/// Counters describing a finished (or stopped) crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages recorded in the results
    pub pages_visited: usize,

    /// Recorded pages whose URL mentions "product"
    pub product_pages: usize,

    /// URLs marked visited, including skipped and failed ones
    pub urls_marked_visited: usize,

    /// URLs skipped because robots.txt denied them
    pub robots_denied: usize,

    /// URLs whose fetch failed or returned non-HTML content
    pub fetch_failures: usize,

    /// URLs still waiting in the frontier when the crawl ended
    pub pending_urls: usize,

    /// Whether a robots.txt policy was in effect
    pub robots_loaded: bool,

    /// Whether the crawl ended because a stop was requested
    pub stopped_early: bool,
}

const RULE: &str = "==================================================";

/// End-of-run report over a summary and the recorded pages
///
/// Lists every visited URL (product pages flagged) and details the first
/// recorded page with up to five of its links.
pub struct SummaryReport<'a> {
    pub summary: &'a CrawlSummary,
    pub pages: &'a [Page],
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;

        writeln!(f, "{}\nSUMMARY\n{}", RULE, RULE)?;
        writeln!(f, "Pages visited: {}", summary.pages_visited)?;

        let Some(first) = self.pages.first() else {
            return writeln!(
                f,
                "No page visited. Check the network connection and robots.txt permissions."
            );
        };

        writeln!(f, "Product pages: {}", summary.product_pages)?;
        writeln!(f, "Robots.txt denials: {}", summary.robots_denied)?;
        writeln!(f, "Failed fetches: {}", summary.fetch_failures)?;
        writeln!(f, "Still in frontier: {}", summary.pending_urls)?;
        if summary.stopped_early {
            writeln!(f, "Crawl stopped before completion")?;
        }

        writeln!(f, "\nVisited URLs:")?;
        for (i, page) in self.pages.iter().enumerate() {
            let marker = if page.is_product() { " [PRODUCT]" } else { "" };
            writeln!(f, "{:>3}. {}{}", i + 1, page.url, marker)?;
        }

        writeln!(f, "\n{}\nFIRST RESULT\n{}", RULE, RULE)?;
        writeln!(f, "Title: {}", first.title)?;
        writeln!(f, "URL: {}", first.url)?;
        writeln!(
            f,
            "First paragraph: {}...",
            truncate_chars(&first.first_paragraph, 200)
        )?;
        writeln!(f, "Links found: {}", first.links.len())?;

        if !first.links.is_empty() {
            writeln!(f, "\nFirst 5 links:")?;
            for (i, link) in first.links.iter().take(5).enumerate() {
                writeln!(
                    f,
                    "  {}. {}... -> {}",
                    i + 1,
                    truncate_chars(&link.text, 50),
                    link.url
                )?;
            }
        }

        Ok(())
    }
}

/// Renders the end-of-run report as a string
pub fn format_summary(summary: &CrawlSummary, pages: &[Page]) -> String {
    SummaryReport { summary, pages }.to_string()
}

/// Prints the end-of-run report to stdout
pub fn print_summary(summary: &CrawlSummary, pages: &[Page]) {
    print!("\n{}", format_summary(summary, pages));
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
