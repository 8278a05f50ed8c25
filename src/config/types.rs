use serde::Deserialize;

/// Main configuration structure for Orphan Grinder
///
/// Every section has defaults, so an empty TOML file (or no file at all)
/// yields a usable configuration once the wiki URL is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Creates a default configuration for the given wiki
    pub fn for_wiki(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.wiki.base_url = base_url.into();
        config
    }
}

/// Where the wiki lives and how its pages are scraped
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WikiConfig {
    /// Root URL of the wiki, e.g. `https://github.com/owner/repo/wiki`
    pub base_url: String,

    /// Path of the page index, relative to the base URL
    pub index_path: String,

    /// Selector for the page links on the index
    pub index_selector: String,

    /// Selector for the links in a page's body
    pub page_selector: String,

    /// Attribute holding the link target
    pub link_attribute: String,

    /// Index entries that are never treated as pages (e.g. a previous report)
    pub excluded_pages: Vec<String>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            index_path: "_pages".to_string(),
            index_selector: "#wiki-content a".to_string(),
            page_selector: "#wiki-body .markdown-body a".to_string(),
            link_attribute: "href".to_string(),
            excluded_pages: vec!["orphans".to_string()],
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum number of page fetches in flight
    pub concurrency_limit: usize,

    /// Only crawl the first N pages of the index
    pub page_limit: Option<usize>,

    /// Fetch attempts per page before it counts as permanently failed
    pub max_attempts: u32,

    /// Pause before each retry batch (milliseconds)
    pub retry_delay_ms: u64,

    /// Emit a progress event every N processed pages
    pub progress_interval: usize,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 10,
            page_limit: None,
            max_attempts: 5,
            retry_delay_ms: 500,
            progress_interval: 10,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// What goes into the final report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReportConfig {
    /// Also compute distance tiers and list every linked page
    pub verbose_analytics: bool,

    /// Number of pages in the most-linked ranking
    pub most_linked_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbose_analytics: false,
            most_linked_limit: 10,
        }
    }
}
