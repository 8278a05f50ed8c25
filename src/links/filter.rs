/// Prefixes of hrefs that never point at another wiki page
const EXTERNAL_PREFIXES: &[&str] = &["#", "http:", "https:", "irc:", "mailto:"];

/// Returns true if the href points at another page of the same wiki
///
/// Empty hrefs, same-page anchors and absolute or non-web schemes are
/// rejected.
///
/// # Examples
///
/// ```
/// use orphan_grinder::links::is_intra_wiki_link;
///
/// assert!(is_intra_wiki_link("/SomeWiki/Foo"));
/// assert!(!is_intra_wiki_link("http://example.com"));
/// assert!(!is_intra_wiki_link("#anchor"));
/// ```
pub fn is_intra_wiki_link(href: &str) -> bool {
    !href.is_empty() && !EXTERNAL_PREFIXES.iter().any(|prefix| href.starts_with(prefix))
}

/// Returns true if the href points back at the page it was found on
///
/// Both sides are compared lowercased. The href must name the page exactly,
/// optionally followed by a fragment or query, so `installation-guide` is not
/// a self link of `installation`.
pub fn is_self_link(href: &str, page_name: &str) -> bool {
    let href = href.to_lowercase();
    let page_name = page_name.to_lowercase();

    match href.strip_prefix(&page_name) {
        Some(rest) => rest.is_empty() || rest.starts_with('#') || rest.starts_with('?'),
        None => false,
    }
}

/// Keeps the hrefs worth tracking for a page, in their original order
pub fn filter_wiki_links<'a, I>(hrefs: I, page_name: &str) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .filter(|href| is_intra_wiki_link(href) && !is_self_link(href, page_name))
        .collect()
}
