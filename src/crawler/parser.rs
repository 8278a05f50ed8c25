//! HTML parser for extracting link targets
//!
//! Wiki pages are scraped with a CSS selector and a single attribute; this
//! module does the selecting. Relative targets are returned untouched since
//! page names are derived from the raw `href` text.

use crate::FetchError;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Collects an attribute from every element matching a CSS selector
///
/// Values are returned in document order with duplicates removed. Elements
/// without the attribute are skipped.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `selector` - CSS selector for the elements of interest
/// * `attribute` - Attribute whose values are collected
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Attribute values, possibly empty
/// * `Err(FetchError::Selector)` - The selector does not parse
///
/// # Example
///
/// ```
/// use orphan_grinder::crawler::select_attribute_values;
///
/// let html = r#"<div id="wiki-content"><a href="/w/wiki/Foo">Foo</a><a href="/w/wiki/Foo">Again</a></div>"#;
/// let hrefs = select_attribute_values(html, "#wiki-content a", "href").unwrap();
/// assert_eq!(hrefs, vec!["/w/wiki/Foo".to_string()]);
/// ```
pub fn select_attribute_values(
    html: &str,
    selector: &str,
    attribute: &str,
) -> Result<Vec<String>, FetchError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let values = document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect();

    Ok(values)
}

fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|e| FetchError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
