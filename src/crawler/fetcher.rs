//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - The politeness delay applied before every request
//! - Content-Type filtering (HTML only)
//! - Decoding bodies through an ordered list of character sets
//! - Error classification

use crate::config::Config;
use reqwest::Client;
use std::borrow::Cow;
use std::time::Duration;

/// Character sets tried when decoding a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Latin1,
    Windows1252,
    /// UTF-8 with invalid sequences replaced
    Utf8Lossy,
}

/// Decode attempts, first success wins
pub const DECODE_ORDER: [Charset; 3] = [Charset::Utf8, Charset::Latin1, Charset::Windows1252];

impl Charset {
    /// Returns the charset's label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "iso-8859-1",
            Self::Windows1252 => "windows-1252",
            Self::Utf8Lossy => "utf-8 (lossy)",
        }
    }

    /// Decodes bytes, returning `None` if any byte sequence is invalid
    fn decode_strict(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            // ISO-8859-1 maps every byte to the code point of the same value
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
            Self::Utf8Lossy => Some(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Decodes a response body
///
/// Tries each charset of [`DECODE_ORDER`] and returns the first clean decode.
/// If none succeeds the body is decoded as UTF-8 with replacement characters,
/// so decoding never fails.
pub fn decode_body(bytes: &[u8]) -> (String, Charset) {
    DECODE_ORDER
        .iter()
        .find_map(|charset| charset.decode_strict(bytes).map(|text| (text, *charset)))
        .unwrap_or_else(|| {
            (
                String::from_utf8_lossy(bytes).into_owned(),
                Charset::Utf8Lossy,
            )
        })
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Decoded page body
        body: String,
        /// Charset the body was decoded with
        charset: Charset,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-2xx HTTP response
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (DNS, connection refused, TLS, timeout)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the page body if the fetch succeeded
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns true if the fetch produced an HTML body
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Describes why a fetch produced no page
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::ContentMismatch { content_type } => {
                Some(format!("Non-HTML content: {}", content_type))
            }
            Self::HttpError { status_code } => Some(format!("HTTP error: {}", status_code)),
            Self::NetworkError { error } => Some(format!("URL error: {}", error)),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Certificate verification is disabled so self-signed and test targets can
/// be crawled.
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent and timeout)
///
/// # Example
///
/// ```no_run
/// use domain_crawler::config::Config;
/// use domain_crawler::crawler::build_http_client;
///
/// let config = Config::new("https://example.com/", 10, 1.0);
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_seconds))
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages one at a time, sleeping for the politeness delay before each request
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    /// Returns the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the politeness delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits for the politeness delay, then fetches `url`
    ///
    /// The delay applies to every call, including the first.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport failure (DNS, connect, TLS, timeout) | NetworkError |
/// | Non-2xx status | HttpError |
/// | Content-Type without `text/html` | ContentMismatch |
/// | Body read failure | NetworkError |
/// | Otherwise | Success, body decoded via [`decode_body`] |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.bytes().await {
        Ok(bytes) => {
            let (body, charset) = decode_body(&bytes);
            tracing::trace!("Decoded {} bytes from {} as {}", bytes.len(), url, charset.label());
            FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
                charset,
            }
        }
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
