//! Path validation and normalization.
//!
//! Incoming paths come from links, the address bar and history entries, so
//! they are normalized once before any pattern sees them.

use std::borrow::Cow;

/// Returns `true` if `path` is already in canonical form.
///
/// Canonical paths start with `/`, contain no empty segments, no query or
/// fragment, and end without `/` unless they are the root.
///
/// # Examples
///
/// ```
/// use pagewire_router::path::is_canonical_path;
///
/// assert!(is_canonical_path("/"));
/// assert!(is_canonical_path("/blog/hello"));
///
/// assert!(!is_canonical_path(""));
/// assert!(!is_canonical_path("about"));
/// assert!(!is_canonical_path("/about/"));
/// assert!(!is_canonical_path("/blog//hello"));
/// assert!(!is_canonical_path("/contact?ref=nav"));
/// ```
pub fn is_canonical_path(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    if path.contains("//") || path.contains(['?', '#']) {
        return false;
    }
    path == "/" || !path.ends_with('/')
}

/// Normalizes a path to canonical form.
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// - Query and fragment: `/contact?ref=nav#form` → `/contact`
/// - Missing leading slash: `about` → `/about`
/// - Trailing slash: `/about/` → `/about`
/// - Repeated slashes: `/blog//hello` → `/blog/hello`
/// - Empty input: `""` → `/`
///
/// # Examples
///
/// ```
/// use pagewire_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("/blog/hello/"), "/blog/hello");
/// assert_eq!(normalize_path("blog//hello?x=1"), "/blog/hello");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_canonical_path(path) {
        return Cow::Borrowed(path);
    }

    let without_suffix = path
        .find(['?', '#'])
        .map_or(path, |idx| &path[..idx]);

    let segments: Vec<&str> = without_suffix
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_paths_borrow() {
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
        assert!(matches!(
            normalize_path("/digital-marketing-agency"),
            Cow::Borrowed("/digital-marketing-agency")
        ));
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(normalize_path("/about/"), "/about");
        assert_eq!(normalize_path("/blog/my-post/"), "/blog/my-post");
    }

    #[test]
    fn test_repeated_slashes() {
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/blog///my-post"), "/blog/my-post");
    }

    #[test]
    fn test_query_and_fragment() {
        assert_eq!(normalize_path("/contact?utm_source=ad"), "/contact");
        assert_eq!(normalize_path("/about#team"), "/about");
        assert_eq!(normalize_path("/?ref=home"), "/");
        assert_eq!(normalize_path("?only=query"), "/");
    }

    #[test]
    fn test_missing_leading_slash_and_empty() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("contact"), "/contact");
    }
}
