//! Orphan Grinder: finds the pages of a wiki that nothing links to
//!
//! This crate crawls a wiki's page index, follows the intra-wiki links of every
//! page with bounded concurrency, and builds a reverse link graph from which it
//! reports orphaned pages, bad links, the most linked pages and how far pages
//! sit from the home page.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod links;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Orphan Grinder operations
///
/// Only fatal conditions live here. A single page failing to load is a
/// [`FetchError`] that the crawler retries and, at worst, reports.
#[derive(Debug, Error)]
pub enum GrinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Index fetch failed for {url}: {source}")]
    IndexFetch { url: String, source: FetchError },

    #[error("Crawl scheduler failed: {0}")]
    Scheduler(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Report error: {0}")]
    Report(#[from] output::OutputError),
}

impl GrinderError {
    /// Names the stage of the run that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::IndexFetch { .. } => "index fetch",
            Self::Scheduler(_) => "scheduler",
            Self::Client(_) => "http client setup",
            Self::Report(_) => "report",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Errors from fetching and scraping a single wiki page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Fetch failed for {url}: {message}")]
    Other { url: String, message: String },
}

/// Result type alias for Orphan Grinder operations
pub type Result<T> = std::result::Result<T, GrinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlResult, HttpScraper, SelectorScraper};
pub use graph::{analyze, GraphAnalysis, LinkGraph, PageUniverse};
pub use links::{normalize_page_name, PageName};
