//! Route pattern parsing and matching.
//!
//! Three pattern forms are supported:
//!
//! | Form | Example | Matches |
//! |---|---|---|
//! | exact | `/about` | exactly `/about` |
//! | named parameter | `/blog/:slug` | `/blog/<one segment>`, binding `slug` |
//! | catch-all | `*` | any path |
//!
//! Patterns are compiled to an anchored regex once, when the route table is
//! built. Paths are expected to be normalized (see [`crate::path`]).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::Write as _;
use std::hash::BuildHasher;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use pagewire_core::{PagewireError, PagewireResult};

use crate::view::Params;

/// Characters escaped when a parameter value is written into a path.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment.
    Static(String),
    /// Matches any single non-empty segment and binds it to the name.
    Param(String),
}

/// A compiled route pattern.
#[derive(Clone)]
pub struct RoutePattern {
    route: String,
    kind: PatternKind,
}

#[derive(Clone)]
enum PatternKind {
    Segments { segments: Vec<Segment>, regex: Regex },
    CatchAll,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("RoutePattern");
        s.field("route", &self.route);
        if let PatternKind::Segments { regex, .. } = &self.kind {
            s.field("regex", &regex.as_str());
        }
        s.finish()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route)
    }
}

impl RoutePattern {
    /// Parses and compiles a pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewire_router::routes::pattern::RoutePattern;
    ///
    /// let pattern = RoutePattern::parse("/blog/:slug", true).unwrap();
    /// let params = pattern.matches("/blog/my-first-post").unwrap();
    /// assert_eq!(params["slug"], "my-first-post");
    /// assert!(pattern.matches("/blog").is_none());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PagewireError::ImproperlyConfigured`] if the pattern does not
    /// start with `/`, has an empty or repeated parameter name, or uses `*`
    /// anywhere but as the whole pattern.
    pub fn parse(route: &str, case_sensitive: bool) -> PagewireResult<Self> {
        if route == "*" {
            return Ok(Self {
                route: route.to_string(),
                kind: PatternKind::CatchAll,
            });
        }

        if !route.starts_with('/') {
            return Err(PagewireError::ImproperlyConfigured(format!(
                "Route pattern '{route}' must start with '/' or be '*'"
            )));
        }

        let segments = parse_segments(route)?;

        let mut regex_str = String::from(if case_sensitive { "^" } else { "(?i)^" });
        for segment in &segments {
            match segment {
                Segment::Static(literal) => {
                    write!(regex_str, "/{}", regex::escape(literal)).ok();
                }
                Segment::Param(name) => {
                    write!(regex_str, "/(?P<{name}>[^/]+)").ok();
                }
            }
        }
        if segments.is_empty() {
            regex_str.push('/');
        }
        regex_str.push('$');

        let regex = Regex::new(&regex_str).map_err(|e| {
            PagewireError::ImproperlyConfigured(format!("Invalid route pattern '{route}': {e}"))
        })?;

        Ok(Self {
            route: route.to_string(),
            kind: PatternKind::Segments { segments, regex },
        })
    }

    /// Returns the pattern as written.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns `true` for the wildcard pattern.
    pub const fn is_catch_all(&self) -> bool {
        matches!(self.kind, PatternKind::CatchAll)
    }

    /// Returns the pattern's segments; empty for the root and the catch-all.
    pub fn segments(&self) -> &[Segment] {
        match &self.kind {
            PatternKind::Segments { segments, .. } => segments,
            PatternKind::CatchAll => &[],
        }
    }

    /// Returns the names of the pattern's parameters, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments().iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Matches a normalized path, returning the percent-decoded parameter
    /// values on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let regex = match &self.kind {
            PatternKind::CatchAll => return Some(Params::new()),
            PatternKind::Segments { regex, .. } => regex,
        };

        let captures = regex.captures(path)?;
        let params = self
            .param_names()
            .filter_map(|name| {
                let raw = captures.name(name)?.as_str();
                Some((name.to_string(), decode_segment(raw)))
            })
            .collect();
        Some(params)
    }

    /// Builds a concrete path from parameter values.
    ///
    /// Returns `None` for the catch-all, when a parameter is missing or
    /// empty, or when `params` names a parameter the pattern doesn't have.
    pub fn reverse<S: BuildHasher>(&self, params: &HashMap<&str, &str, S>) -> Option<String> {
        if self.is_catch_all() {
            return None;
        }

        let names: HashSet<&str> = self.param_names().collect();
        if params.keys().any(|key| !names.contains(key)) {
            return None;
        }

        let mut path = String::new();
        for segment in self.segments() {
            path.push('/');
            match segment {
                Segment::Static(literal) => path.push_str(literal),
                Segment::Param(name) => {
                    let value = params.get(name.as_str()).filter(|v| !v.is_empty())?;
                    path.extend(utf8_percent_encode(value, SEGMENT));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }
}

fn parse_segments(route: &str) -> PagewireResult<Vec<Segment>> {
    let mut seen = HashSet::new();
    route
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.contains('*') {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "Wildcard inside route pattern '{route}'; use a standalone '*' entry"
                )));
            }
            let Some(name) = segment.strip_prefix(':') else {
                return Ok(Segment::Static(segment.to_string()));
            };
            if !is_valid_param_name(name) {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "Invalid parameter name '{name}' in route pattern '{route}'"
                )));
            }
            if !seen.insert(name) {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "Parameter '{name}' appears twice in route pattern '{route}'"
                )));
            }
            Ok(Segment::Param(name.to_string()))
        })
        .collect()
}

fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Percent-decodes a segment; malformed UTF-8 leaves the raw value.
fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_pattern() {
        let p = RoutePattern::parse("/", true).unwrap();
        assert!(p.matches("/").is_some());
        assert!(p.matches("/about").is_none());
        assert!(p.segments().is_empty());
    }

    #[test]
    fn test_exact_pattern() {
        let p = RoutePattern::parse("/hiring-solutions", true).unwrap();
        assert!(p.matches("/hiring-solutions").unwrap().is_empty());
        assert!(p.matches("/hiring-solutions/extra").is_none());
        assert!(p.matches("/hiring").is_none());
    }

    #[test]
    fn test_named_param() {
        let p = RoutePattern::parse("/blog/:slug", true).unwrap();
        let params = p.matches("/blog/my-first-post").unwrap();
        assert_eq!(params.get("slug").unwrap(), "my-first-post");
        assert!(p.matches("/blog").is_none());
        assert!(p.matches("/blog/a/b").is_none());
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let p = RoutePattern::parse("/blog/:slug", true).unwrap();
        let params = p.matches("/blog/caf%C3%A9%20tips").unwrap();
        assert_eq!(params["slug"], "café tips");
    }

    #[test]
    fn test_param_with_malformed_encoding_kept_raw() {
        let p = RoutePattern::parse("/blog/:slug", true).unwrap();
        let params = p.matches("/blog/%FF").unwrap();
        assert_eq!(params["slug"], "%FF");
    }

    #[test]
    fn test_case_insensitive_static_segments() {
        let p = RoutePattern::parse("/about", false).unwrap();
        assert!(p.matches("/About").is_some());
        let strict = RoutePattern::parse("/about", true).unwrap();
        assert!(strict.matches("/About").is_none());
    }

    #[test]
    fn test_case_insensitive_keeps_param_case() {
        let p = RoutePattern::parse("/blog/:slug", false).unwrap();
        assert_eq!(p.matches("/BLOG/Hello").unwrap()["slug"], "Hello");
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let p = RoutePattern::parse("/a.b", true).unwrap();
        assert!(p.matches("/a.b").is_some());
        assert!(p.matches("/axb").is_none());
    }

    #[test]
    fn test_catch_all() {
        let p = RoutePattern::parse("*", true).unwrap();
        assert!(p.is_catch_all());
        assert!(p.matches("/anything/at/all").unwrap().is_empty());
        assert!(p.matches("/").is_some());
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(RoutePattern::parse("about", true).is_err());
        assert!(RoutePattern::parse("/blog/:", true).is_err());
        assert!(RoutePattern::parse("/blog/:1st", true).is_err());
        assert!(RoutePattern::parse("/a/:id/b/:id", true).is_err());
        assert!(RoutePattern::parse("/docs/*", true).is_err());
    }

    #[test]
    fn test_reverse() {
        let p = RoutePattern::parse("/blog/:slug", true).unwrap();
        let mut params = HashMap::new();
        params.insert("slug", "hello world");
        assert_eq!(p.reverse(&params).unwrap(), "/blog/hello%20world");
    }

    #[test]
    fn test_reverse_root_and_static() {
        let empty: HashMap<&str, &str> = HashMap::new();
        assert_eq!(RoutePattern::parse("/", true).unwrap().reverse(&empty).unwrap(), "/");
        assert_eq!(
            RoutePattern::parse("/contact", true).unwrap().reverse(&empty).unwrap(),
            "/contact"
        );
    }

    #[test]
    fn test_reverse_rejects_missing_and_unknown() {
        let p = RoutePattern::parse("/blog/:slug", true).unwrap();
        let empty: HashMap<&str, &str> = HashMap::new();
        assert!(p.reverse(&empty).is_none());

        let mut extra = HashMap::new();
        extra.insert("slug", "a");
        extra.insert("page", "2");
        assert!(p.reverse(&extra).is_none());

        assert!(RoutePattern::parse("*", true).unwrap().reverse(&empty).is_none());
    }

    #[test]
    fn test_param_names() {
        let p = RoutePattern::parse("/team/:team/member/:member", true).unwrap();
        assert_eq!(p.param_names().collect::<Vec<_>>(), vec!["team", "member"]);
    }

    #[test]
    fn test_debug_and_display() {
        let p = RoutePattern::parse("/blog/:slug", true).unwrap();
        assert_eq!(p.to_string(), "/blog/:slug");
        assert!(format!("{p:?}").contains("(?P<slug>[^/]+)"));
    }
}
