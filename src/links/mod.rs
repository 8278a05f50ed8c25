//! Wiki link handling
//!
//! This module turns raw `href` values scraped from wiki pages into page
//! identifiers:
//! - `normalize`: canonicalizes an href into a page name
//! - `filter`: decides which hrefs are intra-wiki links worth tracking

mod filter;
mod normalize;

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

pub use filter::{filter_wiki_links, is_intra_wiki_link, is_self_link};
pub use normalize::{normalize_page_name, HOME_PAGE, WIKI_ROOT_SEGMENT};

/// A normalized wiki page identifier
///
/// Always lowercase, without fragment, with `%3a` decoded to `:`, and never
/// empty. The wiki's index page is [`HOME_PAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageName(String);

impl PageName {
    /// Normalizes an href into a page name
    ///
    /// Returns `None` when the href normalizes to nothing, e.g. a bare
    /// fragment like `#section` or a trailing slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use orphan_grinder::PageName;
    ///
    /// let name = PageName::from_href("/acme/widgets/wiki/Getting-Started#install").unwrap();
    /// assert_eq!(name.as_str(), "getting-started");
    /// assert!(PageName::from_href("#top").is_none());
    /// ```
    pub fn from_href(href: &str) -> Option<Self> {
        let name = normalize_page_name(href);
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    /// The page name of the wiki's home page
    pub fn home() -> Self {
        Self(HOME_PAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_home(&self) -> bool {
        self.0 == HOME_PAGE
    }

    /// Path segment to use when linking back to the page
    ///
    /// Wiki servers expect the namespace separator percent-encoded.
    pub fn link_path(&self) -> String {
        self.0.replace(':', "%3a")
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
