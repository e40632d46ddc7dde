//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use domain_crawler::config::Config;
use domain_crawler::crawler::{Crawler, Frontier};
use domain_crawler::output::ResultStore;
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawl configuration pointed at a mock server
fn create_test_config(server: &MockServer, max_pages: u32) -> Config {
    let mut config = Config::new(format!("{}/", server.uri()), max_pages, 0.0);
    // Mock servers speak plain HTTP
    config.crawler.robots_scheme = "http".to_string();
    config.crawler.request_timeout_seconds = 5;
    config
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/plain"))
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, page_path: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

/// Number of GET requests the server received for a path
async fn hits(server: &MockServer, page_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == page_path)
        .count()
}

#[tokio::test]
async fn test_priority_budget_and_robots_scenario() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    mount_html(
        &server,
        "/",
        &page(
            "Home",
            r#"<p>Welcome to the test shop, enjoy your visit.</p>
               <a href="/a">Plain page</a>
               <a href="/product/1">Product one</a>
               <a href="/private">Private</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/product/1", &page("Product 1", "<p>Chocolate</p>")).await;
    mount_html(&server, "/a", &page("A", "")).await;
    mount_html(&server, "/private", &page("Private", "")).await;

    let mut crawler = Crawler::new(create_test_config(&server, 2)).expect("Failed to create crawler");
    let summary = crawler.crawl().await;

    let visited: Vec<&str> = crawler.results().iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        visited,
        vec![format!("{}/", base), format!("{}/product/1", base)]
    );
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.product_pages, 1);
    assert!(summary.robots_loaded);

    // /a is still pending, /private was never requested
    let a_url = format!("{}/a", base);
    assert!(crawler.frontier().is_pending(&a_url));
    assert!(!crawler.frontier().is_visited(&a_url));
    assert_eq!(hits(&server, "/private").await, 0);
    assert_eq!(hits(&server, "/a").await, 0);

    let home = &crawler.results()[0];
    assert_eq!(home.title, "Home");
    assert_eq!(home.first_paragraph, "Welcome to the test shop, enjoy your visit.");
    assert_eq!(home.links.len(), 3);
}

#[tokio::test]
async fn test_robots_denied_url_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    mount_html(
        &server,
        "/",
        &page("Home", r#"<a href="/private">Private</a><a href="/public">Public</a>"#),
    )
    .await;
    mount_html(&server, "/public", &page("Public", "")).await;

    let mut crawler = Crawler::new(create_test_config(&server, 10)).unwrap();
    let summary = crawler.crawl().await;

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.robots_denied, 1);
    assert!(crawler.frontier().is_visited(&format!("{}/private", base)));
    assert_eq!(hits(&server, "/private").await, 0);
    assert!(crawler.frontier().is_empty());
}

#[tokio::test]
async fn test_missing_robots_txt_fails_open() {
    let server = MockServer::start().await;

    // No robots.txt mock: the server answers 404
    mount_html(
        &server,
        "/",
        &page("Home", r#"<a href="/private">Private</a>"#),
    )
    .await;
    mount_html(&server, "/private", &page("Private", "")).await;

    let mut crawler = Crawler::new(create_test_config(&server, 10)).unwrap();
    let summary = crawler.crawl().await;

    assert!(!summary.robots_loaded);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(hits(&server, "/private").await, 1);
}

#[tokio::test]
async fn test_non_html_content_consumes_no_budget() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        &page("Home", r#"<a href="/doc.pdf">Manual</a><a href="/page">Page</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    mount_html(&server, "/page", &page("Page", "")).await;

    let mut crawler = Crawler::new(create_test_config(&server, 2)).unwrap();
    let summary = crawler.crawl().await;

    // The PDF was fetched first (equal priority, "/doc.pdf" < "/page") but not recorded
    assert_eq!(hits(&server, "/doc.pdf").await, 1);
    assert!(crawler.frontier().is_visited(&format!("{}/doc.pdf", base)));
    assert_eq!(summary.fetch_failures, 1);

    let visited: Vec<&str> = crawler.results().iter().map(|p| p.url.as_str()).collect();
    assert_eq!(visited, vec![format!("{}/", base), format!("{}/page", base)]);
}

#[tokio::test]
async fn test_http_error_skipped_and_not_retried() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        &page("Home", r#"<a href="/broken">Broken</a><a href="/ok">OK</a>"#),
    )
    .await;
    mount_html(
        &server,
        "/ok",
        &page("OK", r#"<a href="/broken">Broken again</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(create_test_config(&server, 10)).unwrap();
    let summary = crawler.crawl().await;

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(hits(&server, "/broken").await, 1);
}

#[tokio::test]
async fn test_fragments_and_duplicates_fetched_once() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        &page(
            "Home",
            r#"<a href="/a#x">A</a><a href="/a#y">A</a><a href="/a">A</a><a href="/">Home</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/a", &page("A", r#"<a href="/#top">Back home</a>"#)).await;

    let mut crawler = Crawler::new(create_test_config(&server, 10)).unwrap();
    crawler.crawl().await;

    assert_eq!(hits(&server, "/a").await, 1);
    assert_eq!(hits(&server, "/").await, 1);

    let urls: HashSet<&str> = crawler.results().iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls.len(), crawler.results().len());
    assert_eq!(crawler.results().len(), 2);
}

#[tokio::test]
async fn test_cross_domain_links_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        &page(
            "Home",
            r#"<a href="http://other.invalid/page">Elsewhere</a><a href="/local">Local</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/local", &page("Local", "")).await;

    let mut crawler = Crawler::new(create_test_config(&server, 10)).unwrap();
    let summary = crawler.crawl().await;

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.fetch_failures, 0);
    for record in crawler.results() {
        for link in &record.links {
            assert!(link.url.starts_with(&base), "out of scope link {}", link.url);
        }
    }
}

#[tokio::test]
async fn test_budget_never_exceeded() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_html(&server, "/", &page("Home", &links)).await;
    for i in 0..10 {
        mount_html(&server, &format!("/p{}", i), &page(&format!("Page {}", i), "")).await;
    }

    let mut crawler = Crawler::new(create_test_config(&server, 4)).unwrap();
    let summary = crawler.crawl().await;

    assert_eq!(crawler.results().len(), 4);
    assert_eq!(summary.pending_urls, 7);
    assert!(!summary.stopped_early);
}

#[tokio::test]
async fn test_latin1_page_decoded() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    let mut body = b"<html><head><title>Caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(b"</title></head><body></body></html>");
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(create_test_config(&server, 1)).unwrap();
    crawler.crawl().await;

    assert_eq!(crawler.results()[0].title, "Café");
}

#[tokio::test]
async fn test_custom_priority_policy() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        &page("Home", r#"<a href="/product/1">Product</a><a href="/news">News</a>"#),
    )
    .await;
    mount_html(&server, "/product/1", &page("Product", "")).await;
    mount_html(&server, "/news", &page("News", "")).await;

    let news_first = |url: &str| -> u32 {
        if url.contains("news") {
            0
        } else {
            1
        }
    };
    let mut crawler = Crawler::new(create_test_config(&server, 2))
        .unwrap()
        .with_frontier(Frontier::with_policy(news_first));
    crawler.crawl().await;

    assert_eq!(crawler.results()[1].url, format!("{}/news", base));
}

#[tokio::test]
async fn test_results_file_round_trip() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        &page(
            "Accueil",
            r#"<p>Bienvenue sur la boutique, où tout est délicieux.</p><a href="/product/1"></a>"#,
        ),
    )
    .await;
    mount_html(&server, "/product/1", &page("Chocolat", "<p>Noir</p>")).await;

    let mut crawler = Crawler::new(create_test_config(&server, 5)).unwrap();
    crawler.crawl().await;

    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("crawler_results.json");
    assert!(crawler.save_results(&out));

    let raw = std::fs::read_to_string(&out).unwrap();
    assert!(raw.contains("délicieux"));
    assert!(raw.contains("\"text\": \"No text\""));

    let reloaded = ResultStore::load_from(&out).unwrap();
    assert_eq!(reloaded.pages(), crawler.results());
}

#[tokio::test]
async fn test_stop_handle_ends_crawl() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(&server, "/", &page("Home", r#"<a href="/next">Next</a>"#)).await;
    mount_html(&server, "/next", &page("Next", "")).await;

    let mut config = create_test_config(&server, 10);
    config.crawler.delay_seconds = 0.3;
    let mut crawler = Crawler::new(config).unwrap();
    let stop = crawler.stop_handle();

    // Requested while the seed page is being fetched
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        stop.request_stop();
    });
    let summary = crawler.crawl().await;

    assert!(summary.stopped_early);
    assert_eq!(summary.pages_visited, 1);
    assert_eq!(hits(&server, "/next").await, 0);
}
