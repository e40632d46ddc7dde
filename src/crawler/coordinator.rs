//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other components together:
//! - Loading robots.txt and seeding the frontier
//! - Pulling the highest-priority unvisited URL
//! - Gate check, fetch, extraction and link feedback
//! - Accumulating page records and persisting them once at the end

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, Fetcher, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::Extractor;
use crate::crawler::stop::StopHandle;
use crate::output::{CrawlSummary, Page, ResultStore};
use crate::robots::RobotsGate;
use crate::url::{extract_domain, normalize_url};
use crate::{ConfigError, CrawlerError, UrlError};
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;

/// Lifecycle of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Loading robots.txt and queueing the seed URL
    Seeding,
    /// Fetching pages until the budget or the frontier runs out
    Running,
    /// Terminal; results are ready to persist
    Done,
}

/// What happened to one dequeued URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page fetched, parsed and appended to the results
    Recorded {
        url: String,
        links: usize,
        new_links: usize,
    },
    /// URL had already been visited; nothing done
    AlreadyVisited { url: String },
    /// robots.txt forbids the URL
    RobotsDenied { url: String },
    /// Fetch failed or returned non-HTML content
    FetchFailed { url: String, reason: String },
}

/// Mutable state of one crawl run
#[derive(Debug)]
pub struct CrawlState {
    /// Domain of the seed URL; links elsewhere are never queued
    pub base_domain: String,
    /// Page budget
    pub max_pages: usize,
    /// Politeness delay before each request
    pub delay: Duration,
    /// Pending and visited URLs
    pub frontier: Frontier,
    /// Recorded pages, in visit order
    pub results: ResultStore,
    /// Pages recorded so far
    pub pages_crawled: usize,
}

/// Main crawler coordinator structure
pub struct Crawler {
    seed_url: Url,
    robots_scheme: String,
    state: CrawlState,
    fetcher: Fetcher,
    extractor: Extractor,
    robots: RobotsGate,
    phase: CrawlPhase,
    stop: StopHandle,
    robots_denied: usize,
    fetch_failures: usize,
    stopped_early: bool,
}

impl Crawler {
    /// Creates a crawler for one run
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration; validated here
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to [`crawl`](Crawler::crawl)
    /// * `Err(CrawlerError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        validate(&config)?;

        let seed_url = normalize_url(&config.crawler.seed_url)?;
        let base_domain = extract_domain(&seed_url).ok_or(UrlError::MissingDomain)?;
        let delay = Duration::try_from_secs_f64(config.crawler.delay_seconds).map_err(|e| {
            ConfigError::Validation(format!("delay_seconds out of range: {}", e))
        })?;

        let client = build_http_client(&config)?;

        Ok(Self {
            seed_url,
            robots_scheme: config.crawler.robots_scheme.clone(),
            state: CrawlState {
                base_domain: base_domain.clone(),
                max_pages: config.crawler.max_pages as usize,
                delay,
                frontier: Frontier::new(),
                results: ResultStore::new(),
                pages_crawled: 0,
            },
            fetcher: Fetcher::new(client, delay),
            extractor: Extractor::new(base_domain),
            robots: RobotsGate::unloaded(),
            phase: CrawlPhase::Seeding,
            stop: StopHandle::new(),
            robots_denied: 0,
            fetch_failures: 0,
            stopped_early: false,
        })
    }

    /// Replaces the frontier, e.g. to use a different priority policy
    pub fn with_frontier(mut self, frontier: Frontier) -> Self {
        self.state.frontier = frontier;
        self
    }

    /// Returns a handle that stops the crawl between iterations
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Returns the current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Returns the run state
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Returns the frontier
    pub fn frontier(&self) -> &Frontier {
        &self.state.frontier
    }

    /// Returns the recorded pages in visit order
    pub fn results(&self) -> &[Page] {
        self.state.results.pages()
    }

    /// Returns the robots.txt gate in effect
    pub fn robots(&self) -> &RobotsGate {
        &self.robots
    }

    /// Runs the crawl to completion
    ///
    /// Per-URL failures never abort the run. The crawl ends when the page
    /// budget is spent, the frontier empties, or a stop is requested.
    /// Calling this again after completion returns the same summary.
    pub async fn crawl(&mut self) -> CrawlSummary {
        if self.phase == CrawlPhase::Done {
            return self.summary();
        }

        let start_time = Instant::now();
        tracing::info!("Starting crawl from {}", self.seed_url);
        tracing::info!("Visiting at most {} pages", self.state.max_pages);

        self.seed().await;

        while let Some(outcome) = self.step().await {
            match outcome {
                PageOutcome::RobotsDenied { .. } => self.robots_denied += 1,
                PageOutcome::FetchFailed { .. } => self.fetch_failures += 1,
                PageOutcome::Recorded { .. } | PageOutcome::AlreadyVisited { .. } => {}
            }
        }

        self.phase = CrawlPhase::Done;
        tracing::info!(
            "Crawl finished: {} pages visited in {:?}",
            self.state.results.len(),
            start_time.elapsed()
        );

        self.summary()
    }

    /// Loads robots.txt and queues the seed URL
    async fn seed(&mut self) {
        self.phase = CrawlPhase::Seeding;

        tracing::info!("Fetching robots.txt...");
        self.robots = RobotsGate::load(
            self.fetcher.client(),
            &self.state.base_domain,
            &self.robots_scheme,
        )
        .await;

        if !self.robots.is_loaded() {
            tracing::warn!("robots.txt not loaded; crawling without restrictions");
        }

        self.state.frontier.enqueue(self.seed_url.as_str());
        self.phase = CrawlPhase::Running;
    }

    /// Runs one loop iteration
    ///
    /// Returns `None` when the crawl should end.
    async fn step(&mut self) -> Option<PageOutcome> {
        if self.stop.is_stop_requested() {
            tracing::info!("Stop requested; ending crawl");
            self.stopped_early = true;
            return None;
        }

        if self.state.pages_crawled >= self.state.max_pages {
            return None;
        }

        let entry = self.state.frontier.dequeue()?;
        let url = entry.url;

        // Marked before fetching so a failed URL is never retried
        if !self.state.frontier.mark_visited(&url) {
            tracing::debug!("Skipping already visited {}", url);
            return Some(PageOutcome::AlreadyVisited { url });
        }

        tracing::info!(
            "[{}/{}] {} (priority {})",
            self.state.pages_crawled + 1,
            self.state.max_pages,
            url,
            entry.priority
        );

        if !self.robots.can_fetch(&url) {
            tracing::info!("  -> Blocked by robots.txt");
            return Some(PageOutcome::RobotsDenied { url });
        }

        let source_url = match Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(e) => {
                let reason = format!("Invalid URL: {}", e);
                tracing::warn!("  -> FAILED: {}", reason);
                return Some(PageOutcome::FetchFailed { url, reason });
            }
        };

        let body = match self.fetcher.fetch(&url).await {
            FetchResult::Success { body, .. } => body,
            failure => {
                let reason = failure
                    .failure_reason()
                    .unwrap_or_else(|| "unknown error".to_string());
                tracing::warn!("  -> FAILED: {}", reason);
                return Some(PageOutcome::FetchFailed { url, reason });
            }
        };

        let page = self.extractor.extract(&body, &source_url);

        let mut new_links = 0;
        for link in &page.links {
            if !self.state.frontier.is_visited(&link.url) && self.state.frontier.enqueue(&link.url) {
                new_links += 1;
            }
        }

        let links = page.links.len();
        self.state.results.push(page);
        self.state.pages_crawled += 1;

        tracing::info!("  -> OK: {} links found ({} new)", links, new_links);
        Some(PageOutcome::Recorded {
            url,
            links,
            new_links,
        })
    }

    /// Builds the run summary from the current state
    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            pages_visited: self.state.results.len(),
            product_pages: self.results().iter().filter(|p| p.is_product()).count(),
            urls_marked_visited: self.state.frontier.visited_count(),
            robots_denied: self.robots_denied,
            fetch_failures: self.fetch_failures,
            pending_urls: self.state.frontier.len(),
            robots_loaded: self.robots.is_loaded(),
            stopped_early: self.stopped_early,
        }
    }

    /// Writes the recorded pages to `path` as JSON
    ///
    /// # Returns
    ///
    /// * `true` - Results saved
    /// * `false` - The write failed; results stay in memory
    pub fn save_results(&self, path: &Path) -> bool {
        match self.state.results.write_to(path) {
            Ok(()) => {
                tracing::info!("Results saved to {}", path.display());
                true
            }
            Err(e) => {
                tracing::error!("Failed to save results to {}: {}", path.display(), e);
                false
            }
        }
    }
}
