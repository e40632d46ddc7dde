//! Domain Crawler main entry point
//!
//! This is the command-line interface for the single-domain crawler.

use anyhow::{bail, Context};
use clap::Parser;
use domain_crawler::config::{load_config, validate, Config, DEFAULT_DELAY_SECONDS, DEFAULT_MAX_PAGES};
use domain_crawler::crawler::Crawler;
use domain_crawler::output::print_summary;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Domain Crawler: a polite single-domain web crawler
///
/// Crawls one domain from a seed URL while respecting robots.txt and a
/// politeness delay, then writes every visited page (title, first paragraph,
/// links) to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "domain-crawler")]
#[command(version)]
#[command(about = "A polite single-domain web crawler", long_about = None)]
struct Cli {
    /// Seed URL (absolute, with scheme and host)
    #[arg(value_name = "SEED_URL", required_unless_present = "config")]
    seed_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to record
    #[arg(short, long)]
    max_pages: Option<u32>,

    /// Politeness delay before each request, in seconds
    #[arg(short, long)]
    delay: Option<f64>,

    /// Path of the JSON results file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let results_path = PathBuf::from(&config.output.results_path);

    let mut crawler = Crawler::new(config).context("Failed to initialize crawler")?;

    // Ctrl-C stops the crawl between pages; results gathered so far are kept
    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            stop.request_stop();
        }
    });

    let summary = crawler.crawl().await;
    let saved = crawler.save_results(&results_path);

    if !cli.quiet {
        print_summary(&summary, crawler.results());
    }

    if !saved {
        bail!("Could not write results to {}", results_path.display());
    }

    Ok(())
}

/// Merges the config file (if any) with command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::new(
            cli.seed_url.clone().unwrap_or_default(),
            DEFAULT_MAX_PAGES,
            DEFAULT_DELAY_SECONDS,
        ),
    };

    if let Some(seed) = &cli.seed_url {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if let Some(output) = &cli.output {
        config.output.results_path = path_to_string(output);
    }

    validate(&config).context("Invalid crawl parameters")?;
    Ok(config)
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("domain_crawler=info,warn"),
            1 => EnvFilter::new("domain_crawler=debug,info"),
            2 => EnvFilter::new("domain_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "domain-crawler",
            "https://example.com/",
            "--max-pages",
            "3",
            "--delay",
            "0",
            "--output",
            "out.json",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.crawler.seed_url, "https://example.com/");
        assert_eq!(config.crawler.max_pages, 3);
        assert_eq!(config.crawler.delay_seconds, 0.0);
        assert_eq!(config.output.results_path, "out.json");
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["domain-crawler", "https://example.com/"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.crawler.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.crawler.delay_seconds, DEFAULT_DELAY_SECONDS);
    }

    #[test]
    fn test_seed_required_without_config() {
        assert!(Cli::try_parse_from(["domain-crawler"]).is_err());
    }

    #[test]
    fn test_invalid_delay_rejected() {
        let cli = Cli::parse_from(["domain-crawler", "https://example.com/", "--delay=-1"]);
        assert!(build_config(&cli).is_err());
    }
}
