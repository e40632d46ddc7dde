//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use domain_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_DELAY_SECONDS,
    DEFAULT_MAX_PAGES, DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_RESULTS_PATH,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
