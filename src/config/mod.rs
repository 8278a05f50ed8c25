//! Configuration module for Orphan Grinder
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; the command line supplies the wiki URL and may
//! override crawler settings before the configuration is validated.
//!
//! # Example
//!
//! ```no_run
//! use orphan_grinder::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("grinder.toml")).unwrap();
//! println!("Crawler will keep {} fetches in flight", config.crawler.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ReportConfig, UserAgentConfig, WikiConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
