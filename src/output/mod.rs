//! Output module for generating crawl reports
//!
//! This module handles:
//! - Bundling a finished crawl and its analysis into a `CrawlReport`
//! - Rendering the report as markdown or JSON
//! - Reporting progress while the crawl runs

mod markdown;
mod traits;

pub use markdown::format_markdown_report;
pub use traits::{LoggingObserver, OutputError, OutputResult, ProgressEvent, ProgressObserver};

use crate::config::Config;
use crate::crawler::CrawlResult;
use crate::graph::{analyze, BadLink, DistanceTiers, LinkedPage, RankedPage};
use crate::links::PageName;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Output format of the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Everything known about a wiki after a crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub wiki_url: String,
    pub generated_at: DateTime<Utc>,

    /// Whether distance tiers and the full linked-page listing are rendered
    #[serde(skip)]
    pub verbose: bool,

    pub page_count: usize,
    pub link_count: usize,
    pub batches: usize,
    pub orphans: Vec<PageName>,
    pub most_linked: Vec<RankedPage>,
    pub linked_pages: Vec<LinkedPage>,
    pub bad_links: Vec<BadLink>,
    pub failed_pages: Vec<PageName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_tiers: Option<DistanceTiers>,
}

/// Analyzes a finished crawl and bundles the results
///
/// # Arguments
///
/// * `config` - The configuration the crawl ran with
/// * `result` - The completed crawl
pub fn build_report(config: &Config, result: &CrawlResult) -> CrawlReport {
    let verbose = config.report.verbose_analytics;
    let analysis = analyze(&result.graph, config.report.most_linked_limit, verbose);

    CrawlReport {
        wiki_url: config.wiki.base_url.clone(),
        generated_at: Utc::now(),
        verbose,
        page_count: result.graph.len(),
        link_count: result.graph.link_count(),
        batches: result.batches,
        orphans: analysis.orphans,
        most_linked: analysis.most_linked,
        linked_pages: analysis.linked_pages,
        bad_links: result.graph.bad_links().to_vec(),
        failed_pages: result.permanently_failed.clone(),
        distance_tiers: analysis.distance_tiers,
    }
}

/// Renders the report in the requested format
pub fn render_report(report: &CrawlReport, format: ReportFormat) -> OutputResult<String> {
    match format {
        ReportFormat::Markdown => Ok(format_markdown_report(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Renders the report and writes it out
///
/// # Arguments
///
/// * `report` - The report to write
/// * `format` - Markdown or JSON
/// * `writer` - Destination, e.g. stdout or a file
pub fn write_report<W: Write>(
    report: &CrawlReport,
    format: ReportFormat,
    writer: &mut W,
) -> OutputResult<()> {
    let rendered = render_report(report, format)?;
    writer.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
