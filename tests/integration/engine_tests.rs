//! Engine tests against in-memory wikis
//!
//! These tests swap the HTTP scraper for fakes that count concurrent
//! fetches, fail on demand and record progress notifications.

use async_trait::async_trait;
use orphan_grinder::config::Config;
use orphan_grinder::crawler::{Coordinator, CrawlResult, SelectorScraper};
use orphan_grinder::graph::{analyze, rank_most_linked};
use orphan_grinder::output::{ProgressEvent, ProgressObserver};
use orphan_grinder::{FetchError, FetchResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BASE: &str = "https://wiki.example.com/acme/widgets/wiki";

/// An in-memory wiki with optional failures and fetch latency
struct FakeWiki {
    index: Vec<String>,
    pages: HashMap<String, Vec<String>>,
    failures: Mutex<HashMap<String, usize>>,
    attempts: Mutex<HashMap<String, usize>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeWiki {
    /// Builds a wiki from (page, outbound page names) pairs
    fn new(pages: &[(&str, &[&str])]) -> Self {
        let index = pages
            .iter()
            .map(|(name, _)| format!("/acme/widgets/wiki/{}", name))
            .collect();
        let pages = pages
            .iter()
            .map(|(name, links)| {
                let hrefs = links
                    .iter()
                    .map(|link| format!("/acme/widgets/wiki/{}", link))
                    .collect();
                (name.to_lowercase(), hrefs)
            })
            .collect();

        Self {
            index,
            pages,
            failures: Mutex::new(HashMap::new()),
            attempts: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the first `times` fetches of `page` fail
    fn failing(self, page: &str, times: usize) -> Self {
        self.failures.lock().unwrap().insert(page.to_string(), times);
        self
    }

    fn attempts(&self, page: &str) -> usize {
        self.attempts.lock().unwrap().get(page).copied().unwrap_or(0)
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn should_fail(&self, page: &str) -> bool {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(page.to_string())
            .or_insert(0) += 1;

        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(page) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl SelectorScraper for FakeWiki {
    async fn select_attributes(
        &self,
        url: &str,
        _selector: &str,
        _attribute: &str,
    ) -> FetchResult<Vec<String>> {
        let page = url.rsplit('/').next().unwrap_or_default().to_string();
        if page == "_pages" {
            return Ok(self.index.clone());
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.should_fail(&page) {
            return Err(FetchError::Other {
                url: url.to_string(),
                message: "simulated failure".to_string(),
            });
        }

        self.pages.get(&page).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Records every notification it receives
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<ProgressEvent>>,
    retry_batches: Mutex<Vec<usize>>,
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(*event);
    }

    fn on_retry_batch(&self, pages: usize) {
        self.retry_batches.lock().unwrap().push(pages);
    }
}

fn test_config() -> Config {
    let mut config = Config::for_wiki(BASE);
    config.crawler.retry_delay_ms = 0;
    config
}

/// Home links to every page, and every page links back home
fn star_wiki(size: usize) -> FakeWiki {
    let names: Vec<String> = (0..size).map(|i| format!("page-{}", i)).collect();
    let mut pages: Vec<(String, Vec<String>)> = vec![("home".to_string(), names.clone())];
    pages.extend(names.iter().map(|n| (n.clone(), vec!["home".to_string()])));

    let borrowed: Vec<(&str, Vec<&str>)> = pages
        .iter()
        .map(|(n, links)| (n.as_str(), links.iter().map(String::as_str).collect()))
        .collect();
    let spec: Vec<(&str, &[&str])> = borrowed
        .iter()
        .map(|(n, links)| (*n, links.as_slice()))
        .collect();
    FakeWiki::new(&spec)
}

async fn crawl(config: Config, wiki: Arc<FakeWiki>) -> CrawlResult {
    Coordinator::new(config, wiki).run().await.unwrap()
}

#[tokio::test]
async fn test_concurrency_bound_is_respected() {
    let wiki = Arc::new(star_wiki(24).with_latency(Duration::from_millis(20)));
    let mut config = test_config();
    config.crawler.concurrency_limit = 10;

    let result = crawl(config, Arc::clone(&wiki)).await;

    assert_eq!(result.graph.len(), 25);
    assert!(wiki.max_in_flight() <= 10, "saw {} fetches in flight", wiki.max_in_flight());
    assert!(wiki.max_in_flight() >= 2);
}

#[tokio::test]
async fn test_retry_converges() {
    let wiki = Arc::new(
        FakeWiki::new(&[
            ("home", &["alpha", "beta"]),
            ("alpha", &["beta"]),
            ("beta", &["gamma"]),
            ("gamma", &[]),
        ])
        .failing("beta", 2),
    );
    let observer = Arc::new(RecordingObserver::default());

    let result = Coordinator::new(test_config(), Arc::clone(&wiki))
        .with_observer(observer.clone())
        .run()
        .await
        .unwrap();

    assert!(result.permanently_failed.is_empty());
    assert_eq!(wiki.attempts("beta"), 3);
    assert_eq!(wiki.attempts("alpha"), 1);
    assert_eq!(result.graph.inbound_count("gamma"), 1);
    assert_eq!(*observer.retry_batches.lock().unwrap(), vec![1, 1]);
}

#[tokio::test]
async fn test_attempt_cap_produces_permanent_failure() {
    let wiki = Arc::new(
        FakeWiki::new(&[("home", &["alpha"]), ("alpha", &["home"]), ("broken", &["alpha"])])
            .failing("broken", usize::MAX),
    );
    let mut config = test_config();
    config.crawler.max_attempts = 3;

    let result = crawl(config, Arc::clone(&wiki)).await;

    let failed: Vec<&str> = result.permanently_failed.iter().map(|p| p.as_str()).collect();
    assert_eq!(failed, vec!["broken"]);
    assert_eq!(wiki.attempts("broken"), 3);
    assert_eq!(result.batches, 3);
    // the failed page contributed nothing
    assert_eq!(result.graph.inbound_count("alpha"), 1);
}

#[tokio::test]
async fn test_repeated_crawls_are_identical() {
    let first = crawl(test_config(), Arc::new(star_wiki(15).with_latency(Duration::from_millis(1)))).await;
    let second = crawl(test_config(), Arc::new(star_wiki(15).with_latency(Duration::from_millis(1)))).await;

    let keys = |result: &CrawlResult| -> Vec<String> {
        result.graph.universe().iter().map(|p| p.to_string()).collect()
    };
    assert_eq!(keys(&first), keys(&second));

    for (page, sources) in first.graph.iter() {
        let mut a: Vec<&str> = sources.iter().map(|p| p.as_str()).collect();
        let mut b: Vec<&str> = second
            .graph
            .linked_from(page.as_str())
            .unwrap()
            .iter()
            .map(|p| p.as_str())
            .collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b, "linked-from lists differ for {}", page);
    }

    assert_eq!(rank_most_linked(&first.graph), rank_most_linked(&second.graph));
}

#[tokio::test]
async fn test_graph_properties() {
    let wiki = Arc::new(FakeWiki::new(&[
        ("home", &["alpha", "nowhere", "alpha"]),
        ("alpha", &["beta", "home", "elsewhere"]),
        ("beta", &["alpha"]),
        ("lonely", &["home"]),
    ]));
    let result = crawl(test_config(), wiki).await;
    let graph = &result.graph;

    for page in graph.universe().iter() {
        assert!(graph.linked_from(page.as_str()).is_some());
    }

    for bad in graph.bad_links() {
        assert!(!graph.universe().contains(&bad.target));
    }
    assert_eq!(graph.bad_links().len(), 2);

    let analysis = analyze(graph, 10, true);
    for (page, sources) in graph.iter() {
        assert_eq!(analysis.orphans.contains(page), sources.is_empty());
    }
    let orphans: Vec<&str> = analysis.orphans.iter().map(|p| p.as_str()).collect();
    assert_eq!(orphans, vec!["lonely"]);

    let ranking = rank_most_linked(graph);
    assert!(ranking.windows(2).all(|w| w[0].inbound >= w[1].inbound));
    assert_eq!(ranking[0].name.as_str(), "alpha");
    assert_eq!(ranking[0].inbound, 3);
}

#[tokio::test]
async fn test_distance_tiers_on_chain() {
    let wiki = Arc::new(FakeWiki::new(&[
        ("home", &["a"]),
        ("a", &["b"]),
        ("b", &["c"]),
        ("c", &["d"]),
        ("d", &[]),
    ]));
    let result = crawl(test_config(), wiki).await;

    let tiers = analyze(&result.graph, 10, true).distance_tiers.unwrap();
    let two: Vec<&str> = tiers.two_clicks.iter().map(|p| p.as_str()).collect();
    let over: Vec<&str> = tiers.over_two_clicks.iter().map(|p| p.as_str()).collect();
    assert_eq!(two, vec!["c"]);
    assert_eq!(over, vec!["d"]);
}

#[tokio::test]
async fn test_progress_events() {
    let wiki = Arc::new(star_wiki(24));
    let observer = Arc::new(RecordingObserver::default());
    let mut config = test_config();
    config.crawler.progress_interval = 5;

    Coordinator::new(config, wiki)
        .with_observer(observer.clone())
        .run()
        .await
        .unwrap();

    let events = observer.events.lock().unwrap();
    assert_eq!(events.len(), 5);
    let processed: Vec<usize> = events.iter().map(|e| e.processed).collect();
    assert_eq!(processed, vec![5, 10, 15, 20, 25]);

    let last = events.last().unwrap();
    assert_eq!(last.percent_complete, 100);
    assert_eq!(last.remaining, 0);
    assert_eq!(last.bad_links, 0);
    assert!(observer.retry_batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_anchor_link_to_itself_keeps_page_orphaned() {
    let wiki = Arc::new(FakeWiki::new(&[
        ("home", &["alpha"]),
        ("alpha", &["home"]),
        ("lonely", &["Lonely#details"]),
    ]));
    let result = crawl(test_config(), wiki).await;

    assert_eq!(result.graph.inbound_count("lonely"), 0);
    assert!(result.graph.bad_links().is_empty());

    let analysis = analyze(&result.graph, 10, false);
    let orphans: Vec<&str> = analysis.orphans.iter().map(|p| p.as_str()).collect();
    assert_eq!(orphans, vec!["lonely"]);
}
