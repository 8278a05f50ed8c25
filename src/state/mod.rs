//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Tracks the state of individual pages (pending, processed, failed, etc.)
//! - `PageLedger`: Per-page states and fetch attempt counts for one crawl

mod page_state;

// Re-export main types
pub use page_state::{PageLedger, PageState};
