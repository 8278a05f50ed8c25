/// Page name given to the wiki's root page
pub const HOME_PAGE: &str = "home";

/// Last path segment of a link to the wiki root, e.g. `/owner/repo/wiki`
pub const WIKI_ROOT_SEGMENT: &str = "wiki";

/// Canonicalizes a raw href into a page name
///
/// # Normalization Steps
///
/// 1. Take the last `/`-separated segment
/// 2. Map the wiki root segment (`wiki`) to `home`
/// 3. Drop everything from the first `#`
/// 4. Lowercase
/// 5. Decode every `%3a` into the `:` namespace separator
///
/// Never fails. An href made only of a fragment yields an empty string, which
/// callers treat as "not a page".
///
/// # Examples
///
/// ```
/// use orphan_grinder::normalize_page_name;
///
/// assert_eq!(normalize_page_name("/SomeWiki/wiki"), "home");
/// assert_eq!(normalize_page_name("/SomeWiki/Foo-Bar#section"), "foo-bar");
/// assert_eq!(normalize_page_name("/SomeWiki/NS%3APage"), "ns:page");
/// ```
pub fn normalize_page_name(href: &str) -> String {
    let segment = href.rsplit('/').next().unwrap_or(href);

    let segment = if segment == WIKI_ROOT_SEGMENT {
        HOME_PAGE
    } else {
        segment
    };

    let without_fragment = match segment.find('#') {
        Some(index) => &segment[..index],
        None => segment,
    };

    without_fragment.to_lowercase().replace("%3a", ":")
}
