//! HTTP fetcher implementation
//!
//! This module handles all page retrieval for the crawler:
//! - Building HTTP clients with proper user agent strings
//! - The `SelectorScraper` boundary the crawl depends on
//! - Turning scraped hrefs into page names for the index and for single pages

use crate::config::{Config, UserAgentConfig, WikiConfig};
use crate::crawler::parser::select_attribute_values;
use crate::links::{filter_wiki_links, PageName};
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Retrieves a document and extracts one attribute from matching elements
///
/// Implementations return deduplicated values in document order. The crawl
/// only ever talks to the wiki through this trait, so tests can substitute
/// an in-memory wiki.
///
/// # Example
///
/// ```ignore
/// use orphan_grinder::{FetchResult, SelectorScraper};
///
/// struct StaticScraper;
///
/// #[async_trait::async_trait]
/// impl SelectorScraper for StaticScraper {
///     async fn select_attributes(&self, _url: &str, _selector: &str, _attribute: &str) -> FetchResult<Vec<String>> {
///         Ok(vec!["/acme/widgets/wiki".to_string()])
///     }
/// }
/// ```
#[async_trait]
pub trait SelectorScraper: Send + Sync {
    async fn select_attributes(
        &self,
        url: &str,
        selector: &str,
        attribute: &str,
    ) -> FetchResult<Vec<String>>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall timeout for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use orphan_grinder::config::UserAgentConfig;
/// use orphan_grinder::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `SelectorScraper` backed by `reqwest` and `scraper`
#[derive(Debug, Clone)]
pub struct HttpScraper {
    client: Client,
}

impl HttpScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a scraper with the configured user agent and request timeout
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        Ok(Self::new(client))
    }

    async fn fetch_body(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SelectorScraper for HttpScraper {
    async fn select_attributes(
        &self,
        url: &str,
        selector: &str,
        attribute: &str,
    ) -> FetchResult<Vec<String>> {
        let body = self.fetch_body(url).await?;
        select_attribute_values(&body, selector, attribute)
    }
}

/// Fetches the page index and page links of one wiki
pub struct PageFetcher<S: ?Sized> {
    scraper: Arc<S>,
    wiki: Arc<WikiConfig>,
}

impl<S: ?Sized> Clone for PageFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            scraper: Arc::clone(&self.scraper),
            wiki: Arc::clone(&self.wiki),
        }
    }
}

impl<S: SelectorScraper + ?Sized> PageFetcher<S> {
    pub fn new(scraper: Arc<S>, wiki: WikiConfig) -> Self {
        Self {
            scraper,
            wiki: Arc::new(wiki),
        }
    }

    /// URL of the wiki's page index
    pub fn index_url(&self) -> String {
        self.join(&self.wiki.index_path)
    }

    /// URL of a single wiki page
    pub fn page_url(&self, page: &PageName) -> String {
        self.join(page.as_str())
    }

    /// Fetches the names of every page listed in the wiki's index
    ///
    /// Names are normalized, excluded pages are dropped, and each name
    /// appears once, in index order.
    pub async fn fetch_index(&self) -> FetchResult<Vec<PageName>> {
        let url = self.index_url();
        let hrefs = self
            .scraper
            .select_attributes(&url, &self.wiki.index_selector, &self.wiki.link_attribute)
            .await?;

        let mut seen = HashSet::new();
        let pages: Vec<PageName> = hrefs
            .iter()
            .filter_map(|href| PageName::from_href(href))
            .filter(|page| !self.is_excluded(page))
            .filter(|page| seen.insert(page.clone()))
            .collect();

        tracing::debug!("Index at {} lists {} pages", url, pages.len());
        Ok(pages)
    }

    /// Fetches the intra-wiki links of a single page
    ///
    /// External links, anchors and links back to the page itself are
    /// dropped, whether the href is relative or a full wiki path such as
    /// `/owner/repo/wiki/Page#section`. Repeated links to the same page are
    /// kept.
    pub async fn fetch_page_links(&self, page: &PageName) -> FetchResult<Vec<PageName>> {
        let url = self.page_url(page);
        let hrefs = self
            .scraper
            .select_attributes(&url, &self.wiki.page_selector, &self.wiki.link_attribute)
            .await?;

        let links: Vec<PageName> = filter_wiki_links(hrefs.iter().map(String::as_str), page.as_str())
            .into_iter()
            .filter_map(PageName::from_href)
            .filter(|link| link != page)
            .collect();

        tracing::debug!("{} links found in {}", links.len(), url);
        Ok(links)
    }

    fn is_excluded(&self, page: &PageName) -> bool {
        self.wiki
            .excluded_pages
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(page.as_str()))
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.wiki.base_url.trim_end_matches('/'), path)
    }
}
