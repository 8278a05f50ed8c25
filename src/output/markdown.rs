//! Markdown report generation
//!
//! The layout is meant to be pasted into the wiki itself, so every page is
//! rendered as a relative link to that page.

use crate::links::PageName;
use crate::output::CrawlReport;

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report data
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Orphan Grinder Report\n\n");
    md.push_str(&format!(
        "> This report was generated by {} for {} on {}.\n\n",
        env!("CARGO_PKG_NAME"),
        report.wiki_url,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    page_section(&mut md, "Orphaned Pages", &report.orphans);

    if report.verbose {
        if let Some(tiers) = &report.distance_tiers {
            page_section(&mut md, "Two clicks from Home", &tiers.two_clicks);
            page_section(&mut md, "Over two clicks from Home", &tiers.over_two_clicks);
        }

        md.push_str("## Most Linked Pages\n\n");
        for ranked in &report.most_linked {
            md.push_str(&format!(
                "- {} ({} links)\n",
                page_link(&ranked.name),
                ranked.inbound
            ));
        }
        md.push('\n');

        md.push_str("## All Linked Pages:\n\n");
        for linked in &report.linked_pages {
            md.push_str(&format!("- {} is linked from:\n", page_link(&linked.name)));
            for source in &linked.linked_from {
                md.push_str(&format!("  - {}\n", page_link(source)));
            }
        }
        md.push('\n');
    }

    if !report.bad_links.is_empty() {
        md.push_str(&format!("## BAD LINKS ({}):\n\n", report.bad_links.len()));
        for bad in &report.bad_links {
            md.push_str(&format!(
                "- {} ==> `{}`\n",
                page_link(&bad.source),
                bad.target
            ));
        }
        md.push('\n');
    }

    if !report.failed_pages.is_empty() {
        page_section(&mut md, "Failed Pages", &report.failed_pages);
    }

    md
}

fn page_section(md: &mut String, title: &str, pages: &[PageName]) {
    md.push_str(&format!("## {} ({}):\n\n", title, pages.len()));
    for page in pages {
        md.push_str(&format!("- {}\n", page_link(page)));
    }
    md.push('\n');
}

fn page_link(page: &PageName) -> String {
    format!("[{}]({})", page, page.link_path())
}
