//! Output handler traits and types
//!
//! This module defines the observer interface the crawler reports progress
//! through, and the errors that can occur while writing reports.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Snapshot of crawl progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Processed pages as a rounded percentage of the universe
    pub percent_complete: u32,

    /// Pages fetched and recorded successfully
    pub processed: usize,

    /// Pages not yet processed
    pub remaining: usize,

    /// Failed page loads in the current batch
    pub failed: usize,

    /// Bad links found so far
    pub bad_links: usize,
}

impl ProgressEvent {
    pub fn new(processed: usize, remaining: usize, failed: usize, bad_links: usize) -> Self {
        let total = processed + remaining;
        let percent_complete = if total == 0 {
            100
        } else {
            ((processed as f64 / total as f64) * 100.0).round() as u32
        };

        Self {
            percent_complete,
            processed,
            remaining,
            failed,
            bad_links,
        }
    }
}

/// Receives crawl progress notifications
///
/// Notifications are purely observational; nothing an observer does can
/// change the crawl.
pub trait ProgressObserver: Send + Sync {
    /// Called every `progress-interval` processed pages
    fn on_progress(&self, event: &ProgressEvent);

    /// Called before a batch of failed pages is fetched again
    fn on_retry_batch(&self, _pages: usize) {}
}

/// Reports progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        tracing::info!(
            "{}% done... {} pages processed, {} to go ({} failed page loads, {} bad links)",
            event.percent_complete,
            event.processed,
            event.remaining,
            event.failed,
            event.bad_links
        );
    }

    fn on_retry_batch(&self, pages: usize) {
        tracing::info!("Re-fetching {} pages...", pages);
    }
}
