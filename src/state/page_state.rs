/// Page state definitions for tracking crawl progress
///
/// This module defines the states a wiki page moves through during a crawl
/// and the ledger that counts fetch attempts per page.
use crate::graph::PageUniverse;
use crate::links::PageName;
use std::collections::HashMap;
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page has not been fetched yet
    Pending,

    /// Last fetch failed, page will be retried
    Failed,

    // ===== Terminal States =====
    /// Page was fetched and its links recorded
    Processed,

    /// Page ran out of attempts
    PermanentlyFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::PermanentlyFailed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Processed => "processed",
            Self::PermanentlyFailed => "permanently_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct PageEntry {
    state: PageState,
    attempts: u32,
}

/// Per-page state and attempt counts for one crawl
///
/// Pages are kept in universe order so retry batches and the permanent
/// failure list come out in a deterministic order.
#[derive(Debug, Clone)]
pub struct PageLedger {
    order: Vec<PageName>,
    entries: HashMap<PageName, PageEntry>,
    max_attempts: u32,
}

impl PageLedger {
    /// Creates a ledger with every universe page pending
    ///
    /// # Arguments
    ///
    /// * `universe` - The pages of the crawl
    /// * `max_attempts` - Fetch attempts before a page is given up on (at least 1)
    pub fn new(universe: &PageUniverse, max_attempts: u32) -> Self {
        let order: Vec<PageName> = universe.iter().cloned().collect();
        let entries = order
            .iter()
            .map(|page| {
                (
                    page.clone(),
                    PageEntry {
                        state: PageState::Pending,
                        attempts: 0,
                    },
                )
            })
            .collect();

        Self {
            order,
            entries,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Marks a page as successfully processed
    pub fn record_success(&mut self, page: &PageName) {
        if let Some(entry) = self.entries.get_mut(page) {
            entry.attempts += 1;
            entry.state = PageState::Processed;
        }
    }

    /// Records a failed fetch and returns the page's new state
    ///
    /// The page becomes [`PageState::PermanentlyFailed`] once its attempts
    /// reach the cap. Unknown pages are reported as permanently failed.
    pub fn record_failure(&mut self, page: &PageName) -> PageState {
        let Some(entry) = self.entries.get_mut(page) else {
            return PageState::PermanentlyFailed;
        };

        entry.attempts += 1;
        entry.state = if entry.attempts >= self.max_attempts {
            PageState::PermanentlyFailed
        } else {
            PageState::Failed
        };
        entry.state
    }

    pub fn state(&self, page: &str) -> Option<PageState> {
        self.entries.get(page).map(|entry| entry.state)
    }

    /// Number of fetch attempts made for a page so far
    pub fn attempts(&self, page: &str) -> u32 {
        self.entries.get(page).map_or(0, |entry| entry.attempts)
    }

    /// Pages that failed and still have attempts left, in universe order
    pub fn retry_batch(&self) -> Vec<PageName> {
        self.pages_in(PageState::Failed)
    }

    /// Pages that ran out of attempts, in universe order
    pub fn permanently_failed(&self) -> Vec<PageName> {
        self.pages_in(PageState::PermanentlyFailed)
    }

    pub fn processed_count(&self) -> usize {
        self.count(PageState::Processed)
    }

    /// Pages not yet successfully processed
    pub fn remaining_count(&self) -> usize {
        self.order.len() - self.processed_count()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn pages_in(&self, state: PageState) -> Vec<PageName> {
        self.order
            .iter()
            .filter(|page| self.state(page.as_str()) == Some(state))
            .cloned()
            .collect()
    }

    fn count(&self, state: PageState) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.state == state)
            .count()
    }
}
