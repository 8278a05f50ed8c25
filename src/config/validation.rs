use crate::config::types::{Config, CrawlerConfig, ReportConfig, UserAgentConfig, WikiConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_wiki_config(&config.wiki)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_report_config(&config.report)?;
    Ok(())
}

/// Validates the wiki location and selectors
fn validate_wiki_config(config: &WikiConfig) -> Result<(), ConfigError> {
    if config.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.index_path.is_empty() {
        return Err(ConfigError::Validation(
            "index_path cannot be empty".to_string(),
        ));
    }

    if config.link_attribute.is_empty() {
        return Err(ConfigError::Validation(
            "link_attribute cannot be empty".to_string(),
        ));
    }

    validate_selector(&config.index_selector)?;
    validate_selector(&config.page_selector)?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency_limit < 1 || config.concurrency_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and 100, got {}",
            config.concurrency_limit
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "progress_interval must be >= 1, got {}",
            config.progress_interval
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.page_limit == Some(0) {
        return Err(ConfigError::Validation(
            "page_limit must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates report configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.most_linked_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "most_linked_limit must be >= 1, got {}",
            config.most_linked_limit
        )));
    }

    Ok(())
}

/// Checks that a CSS selector is non-empty and parses
fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(
            "selector cannot be empty".to_string(),
        ));
    }

    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))?;

    Ok(())
}
