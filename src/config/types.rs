use serde::Deserialize;

/// Default politeness delay between requests, in seconds
pub const DEFAULT_DELAY_SECONDS: f64 = 0.5;

/// Default page budget
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Default timeout applied to robots.txt and page requests, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Default name of the JSON results file
pub const DEFAULT_RESULTS_PATH: &str = "crawler_results.json";

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute URL the crawl starts from; its host fixes the crawl scope
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of pages recorded in the results
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Politeness delay applied before every request (seconds, fractional allowed)
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Timeout for each HTTP request (seconds)
    #[serde(
        rename = "request-timeout-seconds",
        default = "default_request_timeout_seconds"
    )]
    pub request_timeout_seconds: u64,

    /// Scheme used to retrieve `{scheme}://{domain}/robots.txt`
    #[serde(rename = "robots-scheme", default = "default_robots_scheme")]
    pub robots_scheme: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON results file
    #[serde(rename = "results-path", default = "default_results_path")]
    pub results_path: String,
}

impl Config {
    /// Builds a configuration from the three crawl inputs, defaulting the rest
    pub fn new(seed_url: impl Into<String>, max_pages: u32, delay_seconds: f64) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_url: seed_url.into(),
                max_pages,
                delay_seconds,
                request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
                robots_scheme: default_robots_scheme(),
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL)`, or `CrawlerName/Version`
    /// when no contact URL is configured.
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "DomainCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
        }
    }
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_delay_seconds() -> f64 {
    DEFAULT_DELAY_SECONDS
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn default_robots_scheme() -> String {
    "https".to_string()
}

fn default_results_path() -> String {
    DEFAULT_RESULTS_PATH.to_string()
}
