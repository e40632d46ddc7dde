//! Robots.txt handling module
//!
//! This module fetches and parses the crawled domain's robots.txt and answers
//! permission queries for the wildcard user agent. The gate fails open: when
//! the policy cannot be retrieved, every URL is allowed.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;

/// User agent token used for robots.txt matching
pub const ROBOTS_USER_AGENT: &str = "*";

/// Permission gate backed by the domain's robots.txt
#[derive(Debug, Clone, Default)]
pub struct RobotsGate {
    /// `None` when robots.txt could not be loaded
    policy: Option<ParsedRobots>,
}

impl RobotsGate {
    /// Creates a gate with no policy; every URL is allowed
    pub fn unloaded() -> Self {
        Self { policy: None }
    }

    /// Creates a loaded gate from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            policy: Some(ParsedRobots::from_content(content)),
        }
    }

    /// Loads `{scheme}://{domain}/robots.txt`
    ///
    /// Never fails: a timeout, connection error, non-2xx status or unreadable
    /// body leaves the gate unloaded, which permits everything.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client (certificate verification disabled, bounded timeout)
    /// * `domain` - The crawl's base domain, with port if any
    /// * `scheme` - `https` in production, `http` for plain test servers
    pub async fn load(client: &Client, domain: &str, scheme: &str) -> Self {
        let robots_url = format!("{}://{}/robots.txt", scheme, domain);

        match fetch_robots(client, &robots_url).await {
            Ok(content) => {
                tracing::info!("robots.txt loaded from {}", robots_url);
                let gate = Self::from_content(&content);
                if let Some(delay) = gate.crawl_delay() {
                    tracing::debug!("robots.txt declares Crawl-delay: {}s", delay);
                }
                gate
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read robots.txt from {} (continuing without it): {}",
                    robots_url,
                    e
                );
                Self::unloaded()
            }
        }
    }

    /// Returns true if a robots.txt policy is in effect
    pub fn is_loaded(&self) -> bool {
        self.policy.is_some()
    }

    /// Checks if the wildcard user agent may fetch a URL
    pub fn can_fetch(&self, url: &str) -> bool {
        match &self.policy {
            Some(policy) => policy.is_allowed(url, ROBOTS_USER_AGENT),
            None => true,
        }
    }

    /// Crawl delay declared for the wildcard user agent, if any
    pub fn crawl_delay(&self) -> Option<f64> {
        self.policy
            .as_ref()
            .and_then(|policy| policy.crawl_delay(ROBOTS_USER_AGENT))
    }
}

/// Fetches robots.txt content, failing on transport errors and non-2xx statuses
async fn fetch_robots(client: &Client, robots_url: &str) -> Result<String, reqwest::Error> {
    let response = client.get(robots_url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
