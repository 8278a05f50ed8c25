//! Reverse link graph accumulated during a crawl

use crate::links::PageName;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// The fixed, ordered set of pages a crawl visits
///
/// Established once from the wiki's page index. Order is index order and
/// duplicates are dropped on construction.
#[derive(Debug, Clone, Default)]
pub struct PageUniverse {
    pages: Vec<PageName>,
    index: HashSet<PageName>,
}

impl PageUniverse {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = PageName>,
    {
        let mut universe = Self::default();
        for page in pages {
            if universe.index.insert(page.clone()) {
                universe.pages.push(page);
            }
        }
        universe
    }

    /// Keeps only the first `limit` pages
    pub fn truncate(&mut self, limit: usize) {
        if limit >= self.pages.len() {
            return;
        }
        for dropped in self.pages.drain(limit..) {
            self.index.remove(&dropped);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageName> {
        self.pages.iter()
    }

    pub fn pages(&self) -> &[PageName] {
        &self.pages
    }
}

/// A link to a page that is not part of the universe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadLink {
    /// The page the link was found on
    pub source: PageName,

    /// The normalized link target
    pub target: String,
}

/// What one page's links contributed to the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub linked: usize,
    pub bad: usize,
}

/// Mapping from each page to the pages that link to it
///
/// Every universe page has an entry from the start, so a page nobody links to
/// shows up with an empty list. Linked-from lists keep duplicates: a page that
/// links to the same target twice is recorded twice.
#[derive(Debug, Clone)]
pub struct LinkGraph {
    universe: PageUniverse,
    linked_from: HashMap<PageName, Vec<PageName>>,
    bad_links: Vec<BadLink>,
}

impl LinkGraph {
    pub fn new(universe: PageUniverse) -> Self {
        let linked_from = universe
            .iter()
            .map(|page| (page.clone(), Vec::new()))
            .collect();

        Self {
            universe,
            linked_from,
            bad_links: Vec::new(),
        }
    }

    /// Records the outbound links found on `source`
    ///
    /// Targets in the universe get `source` appended to their linked-from
    /// list; anything else becomes a bad link.
    pub fn record_links(&mut self, source: &PageName, targets: &[PageName]) -> LinkTally {
        let mut tally = LinkTally::default();

        for target in targets {
            match self.linked_from.get_mut(target.as_str()) {
                Some(sources) => {
                    sources.push(source.clone());
                    tally.linked += 1;
                }
                None => {
                    self.bad_links.push(BadLink {
                        source: source.clone(),
                        target: target.to_string(),
                    });
                    tally.bad += 1;
                }
            }
        }

        tally
    }

    /// Pages linking to `page`, or `None` if it is not in the universe
    pub fn linked_from(&self, page: &str) -> Option<&[PageName]> {
        self.linked_from.get(page).map(Vec::as_slice)
    }

    /// Number of inbound links of `page` (zero outside the universe)
    pub fn inbound_count(&self, page: &str) -> usize {
        self.linked_from(page).map_or(0, <[PageName]>::len)
    }

    /// Iterates pages with their linked-from lists in universe order
    pub fn iter(&self) -> impl Iterator<Item = (&PageName, &[PageName])> {
        self.universe.iter().map(move |page| {
            let sources = self
                .linked_from
                .get(page)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (page, sources)
        })
    }

    pub fn universe(&self) -> &PageUniverse {
        &self.universe
    }

    pub fn bad_links(&self) -> &[BadLink] {
        &self.bad_links
    }

    pub fn len(&self) -> usize {
        self.universe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.universe.is_empty()
    }

    /// Total number of recorded intra-wiki links
    pub fn link_count(&self) -> usize {
        self.linked_from.values().map(Vec::len).sum()
    }
}
