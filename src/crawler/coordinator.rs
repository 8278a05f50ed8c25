//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Fetching the page index and fixing the page universe
//! - Fanning out page fetches through the scheduler
//! - Recording links into the graph as fetches complete
//! - Retrying failed pages until they succeed or run out of attempts
//!
//! The coordinator is the only code that mutates the link graph. Fetch tasks
//! hand their results back through the scheduler and never touch shared
//! state, so a failed fetch leaves nothing behind to undo.

use crate::config::Config;
use crate::crawler::fetcher::{HttpScraper, PageFetcher, SelectorScraper};
use crate::crawler::scheduler::Scheduler;
use crate::graph::{LinkGraph, PageUniverse};
use crate::links::PageName;
use crate::output::{LoggingObserver, ProgressEvent, ProgressObserver};
use crate::state::PageLedger;
use crate::{GrinderError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Final state of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Reverse link graph over every page in the universe, with bad links
    pub graph: LinkGraph,

    /// Pages that could not be loaded within the attempt limit
    pub permanently_failed: Vec<PageName>,

    /// Number of fetch batches run, the first one included
    pub batches: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: ?Sized> {
    config: Arc<Config>,
    fetcher: PageFetcher<S>,
    observer: Arc<dyn ProgressObserver>,
}

impl<S: SelectorScraper + ?Sized + 'static> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `scraper` - Retrieves pages of the wiki
    pub fn new(config: Config, scraper: Arc<S>) -> Self {
        let fetcher = PageFetcher::new(scraper, config.wiki.clone());

        Self {
            config: Arc::new(config),
            fetcher,
            observer: Arc::new(LoggingObserver),
        }
    }

    /// Replaces the default logging observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Every page was either processed or given up on
    /// * `Err(GrinderError::IndexFetch)` - The page index could not be loaded
    /// * `Err(GrinderError::Scheduler)` - A fetch task panicked or was cancelled
    pub async fn run(&self) -> Result<CrawlResult> {
        let universe = self.load_universe().await?;
        tracing::info!("Scraping {} wiki pages...", universe.len());

        let mut ledger = PageLedger::new(&universe, self.config.crawler.max_attempts);
        if ledger.is_empty() {
            tracing::warn!("The page index lists no pages to crawl");
        }
        let mut graph = LinkGraph::new(universe);

        let mut batch = graph.universe().pages().to_vec();
        let mut batches = 0;

        while !batch.is_empty() {
            if batches > 0 {
                self.observer.on_retry_batch(batch.len());
                let delay = self.config.crawler.retry_delay_ms;
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }

            batches += 1;
            self.run_batch(batch, &mut graph, &mut ledger).await?;
            batch = ledger.retry_batch();
        }

        let permanently_failed = ledger.permanently_failed();
        if !permanently_failed.is_empty() {
            tracing::warn!(
                "{} pages could not be loaded after {} attempts",
                permanently_failed.len(),
                ledger.max_attempts()
            );
        }

        tracing::info!(
            "Crawl complete: {} of {} pages processed, {} links, {} bad links, {} batches",
            ledger.processed_count(),
            ledger.len(),
            graph.link_count(),
            graph.bad_links().len(),
            batches
        );

        Ok(CrawlResult {
            graph,
            permanently_failed,
            batches,
        })
    }

    /// Fetches the page index and applies the page limit
    async fn load_universe(&self) -> Result<PageUniverse> {
        let index_url = self.fetcher.index_url();
        tracing::info!("Looking up wiki page index at {}", index_url);

        let pages = self
            .fetcher
            .fetch_index()
            .await
            .map_err(|source| GrinderError::IndexFetch {
                url: index_url,
                source,
            })?;

        let mut universe = PageUniverse::new(pages);
        if let Some(limit) = self.config.crawler.page_limit {
            universe.truncate(limit);
        }

        Ok(universe)
    }

    /// Fetches one batch of pages and records the outcomes
    async fn run_batch(
        &self,
        batch: Vec<PageName>,
        graph: &mut LinkGraph,
        ledger: &mut PageLedger,
    ) -> Result<()> {
        let mut scheduler = Scheduler::new(self.config.crawler.concurrency_limit);
        tracing::debug!(
            "Fetching {} pages, at most {} at a time",
            batch.len(),
            scheduler.concurrency_limit()
        );

        for page in batch {
            let fetcher = self.fetcher.clone();
            scheduler.spawn(async move {
                let outcome = fetcher.fetch_page_links(&page).await;
                (page, outcome)
            });
        }

        let interval = self.config.crawler.progress_interval.max(1);
        let mut failed = 0;

        while let Some(completed) = scheduler.next_completed().await {
            let (page, outcome) = completed?;

            match outcome {
                Ok(links) => {
                    let tally = graph.record_links(&page, &links);
                    ledger.record_success(&page);
                    tracing::debug!(
                        "Recorded {} links from {} ({} bad)",
                        tally.linked,
                        page,
                        tally.bad
                    );

                    let processed = ledger.processed_count();
                    if processed % interval == 0 {
                        self.observer.on_progress(&ProgressEvent::new(
                            processed,
                            ledger.remaining_count(),
                            failed,
                            graph.bad_links().len(),
                        ));
                    }
                }
                Err(e) => {
                    failed += 1;
                    match ledger.record_failure(&page) {
                        state if state.is_terminal() => tracing::warn!(
                            "Giving up on {} after {} attempts: {}",
                            page,
                            ledger.attempts(page.as_str()),
                            e
                        ),
                        _ => tracing::warn!(
                            "Failed to load {} (attempt {}): {}",
                            page,
                            ledger.attempts(page.as_str()),
                            e
                        ),
                    }
                }
            }
        }

        Ok(())
    }
}

/// Crawls the configured wiki over HTTP
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed
/// * `Err(GrinderError)` - The HTTP client could not be built or the crawl failed
pub async fn run_crawl(config: Config) -> Result<CrawlResult> {
    let scraper = Arc::new(HttpScraper::from_config(&config)?);
    Coordinator::new(config, scraper).run().await
}
