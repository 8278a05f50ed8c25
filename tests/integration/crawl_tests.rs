//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small wiki over HTTP and run the
//! full crawl cycle end-to-end.

use orphan_grinder::config::Config;
use orphan_grinder::crawler::{Coordinator, HttpScraper};
use orphan_grinder::graph::analyze;
use orphan_grinder::output::{build_report, format_markdown_report};
use orphan_grinder::GrinderError;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIKI_PATH: &str = "/acme/widgets/wiki";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::for_wiki(format!("{}{}", server.uri(), WIKI_PATH));
    config.crawler.concurrency_limit = 4;
    config.crawler.retry_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn index_html(hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    format!(
        r#"<html><body><div id="wiki-content"><ul>{}</ul></div></body></html>"#,
        items
    )
}

fn page_html(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<p><a href="{}">link</a></p>"#, href))
        .collect();
    format!(
        r#"<html><body>
        <div id="wiki-header"><a href="{}/Sidebar-Only">Sidebar</a></div>
        <div id="wiki-body"><div class="markdown-body">{}</div></div>
        </body></html>"#,
        WIKI_PATH, links
    )
}

async fn mount_html(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", WIKI_PATH, page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts the index and the four pages of the test wiki
///
/// home -> getting-started, install, missing-page (bad)
/// getting-started -> install (twice), home
/// install -> getting-started
/// lonely -> install, itself (anchor)
async fn mount_wiki(server: &MockServer) {
    mount_html(
        server,
        "_pages",
        index_html(&[
            WIKI_PATH,
            "/acme/widgets/wiki/Getting-Started",
            "/acme/widgets/wiki/Install",
            "/acme/widgets/wiki/Lonely",
            "/acme/widgets/wiki/Orphans",
        ]),
    )
    .await;

    mount_html(
        server,
        "home",
        page_html(&[
            "/acme/widgets/wiki/Getting-Started",
            "/acme/widgets/wiki/Install",
            "https://example.com/elsewhere",
            "#table-of-contents",
            "/acme/widgets/wiki/Missing-Page",
        ]),
    )
    .await;

    mount_html(
        server,
        "getting-started",
        page_html(&[
            "/acme/widgets/wiki/Install",
            "/acme/widgets/wiki/Install#linux",
            WIKI_PATH,
        ]),
    )
    .await;

    mount_html(
        server,
        "install",
        page_html(&["/acme/widgets/wiki/Getting-Started"]),
    )
    .await;
}

async fn mount_lonely(server: &MockServer) {
    mount_html(
        server,
        "lonely",
        page_html(&["/acme/widgets/wiki/Install", "/acme/widgets/wiki/Lonely#details"]),
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_finds_orphans() {
    let server = MockServer::start().await;
    mount_wiki(&server).await;
    mount_lonely(&server).await;

    let config = create_test_config(&server);
    let scraper = Arc::new(HttpScraper::from_config(&config).unwrap());
    let result = Coordinator::new(config.clone(), scraper).run().await.unwrap();

    let graph = &result.graph;
    let pages: Vec<&str> = graph.universe().iter().map(|p| p.as_str()).collect();
    assert_eq!(pages, vec!["home", "getting-started", "install", "lonely"]);

    assert_eq!(graph.inbound_count("home"), 1);
    assert_eq!(graph.inbound_count("getting-started"), 2);
    assert_eq!(graph.inbound_count("install"), 4);
    assert_eq!(graph.inbound_count("lonely"), 0);

    assert_eq!(graph.bad_links().len(), 1);
    assert_eq!(graph.bad_links()[0].source.as_str(), "home");
    assert_eq!(graph.bad_links()[0].target, "missing-page");

    let analysis = analyze(graph, 10, false);
    let orphans: Vec<&str> = analysis.orphans.iter().map(|p| p.as_str()).collect();
    assert_eq!(orphans, vec!["lonely"]);
    assert_eq!(analysis.most_linked[0].name.as_str(), "install");

    assert!(result.permanently_failed.is_empty());
    assert_eq!(result.batches, 1);
}

#[tokio::test]
async fn test_failed_page_is_retried() {
    let server = MockServer::start().await;

    // First two requests for the page fail, later ones are served normally
    Mock::given(method("GET"))
        .and(path(format!("{}/lonely", WIKI_PATH)))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    mount_wiki(&server).await;
    mount_lonely(&server).await;

    let config = create_test_config(&server);
    let scraper = Arc::new(HttpScraper::from_config(&config).unwrap());
    let result = Coordinator::new(config, scraper).run().await.unwrap();

    assert_eq!(result.batches, 3);
    assert!(result.permanently_failed.is_empty());
    // lonely's link to install was recorded once it loaded
    assert_eq!(result.graph.inbound_count("install"), 4);
}

#[tokio::test]
async fn test_permanent_failure_is_reported() {
    let server = MockServer::start().await;
    mount_wiki(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{}/lonely", WIKI_PATH)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.crawler.max_attempts = 2;
    let scraper = Arc::new(HttpScraper::from_config(&config).unwrap());
    let result = Coordinator::new(config.clone(), scraper).run().await.unwrap();

    let failed: Vec<&str> = result
        .permanently_failed
        .iter()
        .map(|p| p.as_str())
        .collect();
    assert_eq!(failed, vec!["lonely"]);
    assert_eq!(result.batches, 2);
    assert_eq!(result.graph.inbound_count("install"), 3);

    let report = build_report(&config, &result);
    let md = format_markdown_report(&report);
    assert!(md.contains("## Failed Pages (1):\n\n- [lonely](lonely)"));
}

#[tokio::test]
async fn test_missing_index_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/_pages", WIKI_PATH)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let scraper = Arc::new(HttpScraper::from_config(&config).unwrap());
    let result = Coordinator::new(config, scraper).run().await;

    match result {
        Err(GrinderError::IndexFetch { url, .. }) => assert!(url.ends_with("/_pages")),
        other => panic!("expected index fetch error, got {:?}", other.map(|r| r.batches)),
    }
}

#[tokio::test]
async fn test_page_limit_and_verbose_report() {
    let server = MockServer::start().await;
    mount_wiki(&server).await;
    mount_lonely(&server).await;

    let mut config = create_test_config(&server);
    config.crawler.page_limit = Some(3);
    config.report.verbose_analytics = true;

    let scraper = Arc::new(HttpScraper::from_config(&config).unwrap());
    let result = Coordinator::new(config.clone(), scraper).run().await.unwrap();
    assert_eq!(result.graph.len(), 3);

    let report = build_report(&config, &result);
    let md = format_markdown_report(&report);

    assert!(md.contains("## Orphaned Pages (0):"));
    assert!(md.contains("## Two clicks from Home (0):"));
    assert!(md.contains("## Over two clicks from Home (0):"));
    assert!(md.contains("- [install](install) (3 links)"));
    assert!(md.contains("## BAD LINKS (1):\n\n- [home](home) ==> `missing-page`"));
    assert!(!md.contains("Failed Pages"));
}
