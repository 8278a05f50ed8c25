//! Crawler module for wiki page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `SelectorScraper` boundary
//! - HTML parsing and attribute extraction
//! - Bounded concurrent scheduling of page fetches
//! - Overall crawl coordination and retries

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlResult};
pub use fetcher::{build_http_client, HttpScraper, PageFetcher, SelectorScraper};
pub use parser::select_attribute_values;
pub use scheduler::Scheduler;
