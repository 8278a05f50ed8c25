//! Orphan Grinder main entry point
//!
//! This is the command-line interface for the Orphan Grinder wiki crawler.

use clap::Parser;
use orphan_grinder::config::{parse_config, validate, Config};
use orphan_grinder::crawler::run_crawl;
use orphan_grinder::output::{build_report, write_report, OutputError, ReportFormat};
use orphan_grinder::{ConfigError, GrinderError};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Orphan Grinder: finds the pages of a wiki that nothing links to
///
/// Orphan Grinder reads a wiki's page index, follows the links on every
/// page and reports orphaned pages, bad links and, with --all, how far each
/// page sits from the home page.
#[derive(Parser, Debug)]
#[command(name = "orphan-grinder")]
#[command(version)]
#[command(about = "Finds orphaned pages in a wiki", long_about = None)]
struct Cli {
    /// Root URL of the wiki, e.g. https://github.com/owner/repo/wiki
    #[arg(value_name = "WIKI_URL")]
    wiki_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also report distance from Home, most linked pages and all linked pages
    #[arg(long)]
    all: bool,

    /// Only crawl the first N pages of the index
    #[arg(long, value_name = "N")]
    debug: Option<usize>,

    /// Maximum number of pages fetched at once
    #[arg(long, value_name = "K")]
    concurrency: Option<usize>,

    /// Fetch attempts per page before giving up on it
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Write the report as JSON instead of markdown
    #[arg(long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout only ever carries the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("orphan_grinder=info,warn"),
            1 => EnvFilter::new("orphan_grinder=debug,info"),
            2 => EnvFilter::new("orphan_grinder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli).map_err(|e| fatal(e.into()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Markdown
    };

    tracing::info!("Starting scrape of {}", config.wiki.base_url);
    let result = run_crawl(config.clone()).await.map_err(fatal)?;

    let report = build_report(&config, &result);
    write_output(&report, format, cli.output.as_deref())
        .map_err(|e| fatal(GrinderError::Report(e)))?;

    Ok(())
}

/// Loads the optional config file and applies command line overrides
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(path)?
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.wiki_url {
        config.wiki.base_url = url.clone();
    }
    if cli.all {
        config.report.verbose_analytics = true;
    }
    if let Some(limit) = cli.debug {
        config.crawler.page_limit = Some(limit);
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency_limit = concurrency;
    }
    if let Some(attempts) = cli.max_attempts {
        config.crawler.max_attempts = attempts;
    }

    validate(&config)?;
    Ok(config)
}

/// Wraps a fatal error with the stage of the run it came from
fn fatal(err: GrinderError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("{} failed", stage))
}

fn write_output(
    report: &orphan_grinder::output::CrawlReport,
    format: ReportFormat,
    path: Option<&Path>,
) -> Result<(), OutputError> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_report(report, format, &mut writer)?;
            tracing::info!("Report written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_report(report, format, &mut writer)?;
        }
    }
    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Orphan Grinder Dry Run ===\n");

    println!("Wiki:");
    println!("  Base URL: {}", config.wiki.base_url);
    println!("  Index: {}/{}", config.wiki.base_url.trim_end_matches('/'), config.wiki.index_path);
    println!("  Index selector: {}", config.wiki.index_selector);
    println!("  Page selector: {}", config.wiki.page_selector);
    println!("  Excluded pages: {}", config.wiki.excluded_pages.join(", "));

    println!("\nCrawler Configuration:");
    println!("  Concurrency limit: {}", config.crawler.concurrency_limit);
    println!("  Max attempts: {}", config.crawler.max_attempts);
    println!("  Retry delay: {}ms", config.crawler.retry_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    match config.crawler.page_limit {
        Some(limit) => println!("  Page limit: {}", limit),
        None => println!("  Page limit: none"),
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("Verbose analytics: {}", config.report.verbose_analytics);

    println!("\n✓ Configuration is valid");
}
