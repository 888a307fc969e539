//! The ordered route table.
//!
//! A [`RouteTable`] is built once at startup and never changes. Entries are
//! tried in declaration order and the first match wins. The table always
//! ends with exactly one catch-all, so [`RouteTable::match_path`] cannot fail.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use pagewire_core::{PagewireError, PagewireResult};

use super::pattern::RoutePattern;
use crate::path::normalize_path;
use crate::view::{Params, ViewId};

/// A (pattern, view) pair.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    view_id: ViewId,
    name: Option<String>,
}

impl RouteEntry {
    /// Returns the compiled pattern.
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the view this entry selects.
    pub const fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    /// Returns the name used for reverse lookup. The catch-all has none.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if this is the wildcard entry.
    pub const fn is_catch_all(&self) -> bool {
        self.pattern.is_catch_all()
    }
}

/// The result of matching a path: the winning entry plus extracted params.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    entry: Arc<RouteEntry>,
    path: String,
    params: Params,
}

impl RouteMatch {
    /// Returns the matched entry.
    pub fn entry(&self) -> &RouteEntry {
        &self.entry
    }

    /// Returns the matched view.
    pub fn view_id(&self) -> &ViewId {
        &self.entry.view_id
    }

    /// Returns the normalized path that was matched.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the extracted parameter values.
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns a single parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns `true` if only the catch-all matched.
    pub fn is_not_found(&self) -> bool {
        self.entry.is_catch_all()
    }
}

/// An immutable, ordered table of routes ending in a catch-all.
#[derive(Clone)]
pub struct RouteTable {
    routes: Vec<Arc<RouteEntry>>,
    catch_all: Arc<RouteEntry>,
    case_sensitive: bool,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries().map(|e| (e.pattern.route(), e.view_id.as_str())))
            .finish()
    }
}

impl RouteTable {
    /// Starts building a table.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Selects the entry for `path`.
    ///
    /// The path is normalized first; the first entry in declaration order
    /// whose pattern matches wins, and the catch-all takes everything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewire_router::RouteTable;
    ///
    /// let table = RouteTable::builder()
    ///     .route("/", "home")
    ///     .route("/blog/:slug", "blog-post")
    ///     .route("*", "not-found")
    ///     .build()
    ///     .unwrap();
    ///
    /// let m = table.match_path("/blog/hello/");
    /// assert_eq!(m.view_id().as_str(), "blog-post");
    /// assert_eq!(m.param("slug"), Some("hello"));
    /// assert!(table.match_path("/missing").is_not_found());
    /// ```
    pub fn match_path(&self, path: &str) -> RouteMatch {
        let path = normalize_path(path).into_owned();
        let (entry, params) = self
            .routes
            .iter()
            .find_map(|entry| entry.pattern.matches(&path).map(|params| (entry, params)))
            .unwrap_or((&self.catch_all, Params::new()));

        tracing::trace!(path = %path, view_id = %entry.view_id, "route matched");

        RouteMatch {
            entry: Arc::clone(entry),
            path,
            params,
        }
    }

    /// Builds the path for a named route.
    ///
    /// # Errors
    ///
    /// Returns [`PagewireError::NoReverseMatch`] if no route has this name or
    /// the parameters don't fit its pattern.
    pub fn reverse<S: BuildHasher>(
        &self,
        name: &str,
        params: &HashMap<&str, &str, S>,
    ) -> PagewireResult<String> {
        let entry = self
            .routes
            .iter()
            .find(|entry| entry.name() == Some(name))
            .ok_or_else(|| PagewireError::NoReverseMatch(name.to_string()))?;

        entry.pattern.reverse(params).ok_or_else(|| {
            PagewireError::NoReverseMatch(format!(
                "{name}' with params {:?} for pattern '{}",
                sorted_keys(params),
                entry.pattern
            ))
        })
    }

    /// Iterates all entries in declaration order, catch-all last.
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes
            .iter()
            .chain(std::iter::once(&self.catch_all))
            .map(|entry| &**entry)
    }

    /// Returns the catch-all entry.
    pub fn catch_all(&self) -> &RouteEntry {
        &self.catch_all
    }

    /// Returns the distinct view ids in declaration order.
    pub fn view_ids(&self) -> Vec<ViewId> {
        let mut seen = HashSet::new();
        self.entries()
            .filter(|entry| seen.insert(entry.view_id.clone()))
            .map(|entry| entry.view_id.clone())
            .collect()
    }

    /// Returns the number of entries, catch-all included.
    pub fn len(&self) -> usize {
        self.routes.len() + 1
    }

    /// Always `false`: a valid table has at least its catch-all.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns whether static segments are matched case-sensitively.
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

fn sorted_keys<S: BuildHasher>(params: &HashMap<&str, &str, S>) -> Vec<String> {
    let mut keys: Vec<String> = params.keys().map(ToString::to_string).collect();
    keys.sort_unstable();
    keys
}

/// Collects route declarations and validates them into a [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    declarations: Vec<Declaration>,
    case_sensitive: bool,
}

#[derive(Debug)]
struct Declaration {
    route: String,
    view_id: ViewId,
    name: Option<String>,
}

impl RouteTableBuilder {
    /// Declares a route. Its reverse-lookup name is the view id.
    #[must_use]
    pub fn route(self, route: &str, view_id: impl Into<ViewId>) -> Self {
        self.declare(route, view_id.into(), None)
    }

    /// Declares a route with an explicit reverse-lookup name.
    #[must_use]
    pub fn named_route(self, route: &str, view_id: impl Into<ViewId>, name: &str) -> Self {
        self.declare(route, view_id.into(), Some(name.to_string()))
    }

    /// Sets whether static segments are matched case-sensitively.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    fn declare(mut self, route: &str, view_id: ViewId, name: Option<String>) -> Self {
        self.declarations.push(Declaration {
            route: route.to_string(),
            view_id,
            name,
        });
        self
    }

    /// Compiles and validates the declarations.
    ///
    /// # Errors
    ///
    /// - [`PagewireError::NoMatch`] if there is no catch-all, since unmatched
    ///   paths would then have no view.
    /// - [`PagewireError::ImproperlyConfigured`] if a pattern is invalid, the
    ///   catch-all is not last or appears twice, a pattern or name repeats, or
    ///   two non-catch-all entries share a view id.
    pub fn build(self) -> PagewireResult<RouteTable> {
        let case_sensitive = self.case_sensitive;
        let mut routes = Vec::with_capacity(self.declarations.len());
        let mut catch_all: Option<Arc<RouteEntry>> = None;
        let mut seen_routes = HashSet::new();
        let mut seen_views = HashSet::new();
        let mut seen_names = HashSet::new();

        for decl in self.declarations {
            if let Some(existing) = &catch_all {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "Route '{}' is declared after the catch-all '{}' and can never match",
                    decl.route,
                    existing.pattern.route()
                )));
            }

            let pattern = RoutePattern::parse(&decl.route, case_sensitive)?;

            if pattern.is_catch_all() {
                catch_all = Some(Arc::new(RouteEntry {
                    pattern,
                    view_id: decl.view_id,
                    name: decl.name,
                }));
                continue;
            }

            let route_key = if case_sensitive {
                decl.route.trim_end_matches('/').to_string()
            } else {
                decl.route.trim_end_matches('/').to_lowercase()
            };
            if !seen_routes.insert(route_key) {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "Route pattern '{}' is declared twice",
                    decl.route
                )));
            }

            if !seen_views.insert(decl.view_id.clone()) {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "View '{}' is bound to more than one route",
                    decl.view_id
                )));
            }

            let name = decl.name.unwrap_or_else(|| decl.view_id.to_string());
            if !seen_names.insert(name.clone()) {
                return Err(PagewireError::ImproperlyConfigured(format!(
                    "Route name '{name}' is used more than once"
                )));
            }

            routes.push(Arc::new(RouteEntry {
                pattern,
                view_id: decl.view_id,
                name: Some(name),
            }));
        }

        let catch_all = catch_all.ok_or_else(|| {
            PagewireError::NoMatch("paths outside every pattern (the table has no '*' catch-all entry)".to_string())
        })?;

        tracing::debug!(routes = routes.len() + 1, case_sensitive, "route table built");

        Ok(RouteTable {
            routes,
            catch_all,
            case_sensitive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::builder()
            .route("/", "home")
            .route("/about", "about")
            .route("/blog", "blog-index")
            .route("/blog/:slug", "blog-post")
            .route("*", "not-found")
            .build()
            .unwrap()
    }

    #[test]
    fn test_match_exact() {
        let t = table();
        assert_eq!(t.match_path("/").view_id().as_str(), "home");
        assert_eq!(t.match_path("/about").view_id().as_str(), "about");
        assert_eq!(t.match_path("/blog").view_id().as_str(), "blog-index");
    }

    #[test]
    fn test_match_param() {
        let m = table().match_path("/blog/my-first-post");
        assert_eq!(m.view_id().as_str(), "blog-post");
        assert_eq!(m.param("slug"), Some("my-first-post"));
        assert_eq!(m.path(), "/blog/my-first-post");
        assert!(!m.is_not_found());
    }

    #[test]
    fn test_match_falls_through_to_catch_all() {
        let t = table();
        for path in ["/nonexistent", "/blog/a/b", "/about/team", "/ABOUT/us"] {
            let m = t.match_path(path);
            assert!(m.is_not_found(), "{path}");
            assert_eq!(m.view_id().as_str(), "not-found");
            assert!(m.params().is_empty());
        }
    }

    #[test]
    fn test_match_normalizes() {
        let t = table();
        assert_eq!(t.match_path("about/").view_id().as_str(), "about");
        assert_eq!(t.match_path("").view_id().as_str(), "home");
        assert_eq!(t.match_path("/blog?page=2").view_id().as_str(), "blog-index");
    }

    #[test]
    fn test_first_match_wins() {
        let t = RouteTable::builder()
            .route("/blog/featured", "featured")
            .route("/blog/:slug", "blog-post")
            .route("*", "not-found")
            .build()
            .unwrap();
        assert_eq!(t.match_path("/blog/featured").view_id().as_str(), "featured");
        assert_eq!(t.match_path("/blog/other").view_id().as_str(), "blog-post");
    }

    #[test]
    fn test_case_sensitivity() {
        assert_eq!(table().match_path("/About").view_id().as_str(), "about");

        let strict = RouteTable::builder()
            .route("/about", "about")
            .route("*", "not-found")
            .case_sensitive(true)
            .build()
            .unwrap();
        assert!(strict.is_case_sensitive());
        assert!(strict.match_path("/About").is_not_found());
    }

    #[test]
    fn test_missing_catch_all() {
        let err = RouteTable::builder().route("/", "home").build().unwrap_err();
        assert!(matches!(err, PagewireError::NoMatch(_)));
        assert!(err.is_defect());
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let err = RouteTable::builder()
            .route("*", "not-found")
            .route("/", "home")
            .build()
            .unwrap_err();
        assert!(matches!(err, PagewireError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_single_catch_all() {
        let err = RouteTable::builder()
            .route("*", "not-found")
            .route("*", "other")
            .build()
            .unwrap_err();
        assert!(matches!(err, PagewireError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_duplicate_view_rejected() {
        let err = RouteTable::builder()
            .route("/about", "about")
            .route("/about-us", "about")
            .route("*", "not-found")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("more than one route"));
    }

    #[test]
    fn test_catch_all_may_reuse_not_found_view() {
        let t = RouteTable::builder()
            .route("/404", "not-found")
            .route("*", "not-found")
            .build()
            .unwrap();
        assert_eq!(t.view_ids(), vec![ViewId::from("not-found")]);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_duplicate_pattern_rejected() {
        let err = RouteTable::builder()
            .route("/about", "about")
            .route("/About/", "about-again")
            .route("*", "not-found")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = RouteTable::builder()
            .named_route("/a", "a", "page")
            .named_route("/b", "b", "page")
            .route("*", "not-found")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("'page'"));
    }

    #[test]
    fn test_entries_in_declaration_order() {
        let t = table();
        let routes: Vec<&str> = t.entries().map(|e| e.pattern().route()).collect();
        assert_eq!(routes, vec!["/", "/about", "/blog", "/blog/:slug", "*"]);
        assert!(t.catch_all().name().is_none());
    }

    #[test]
    fn test_reverse() {
        let t = table();
        let mut params = HashMap::new();
        assert_eq!(t.reverse("about", &params).unwrap(), "/about");
        params.insert("slug", "launch-day");
        assert_eq!(t.reverse("blog-post", &params).unwrap(), "/blog/launch-day");
    }

    #[test]
    fn test_reverse_named_route() {
        let t = RouteTable::builder()
            .named_route("/contact", "contact", "get-in-touch")
            .route("*", "not-found")
            .build()
            .unwrap();
        let params: HashMap<&str, &str> = HashMap::new();
        assert_eq!(t.reverse("get-in-touch", &params).unwrap(), "/contact");
        assert!(t.reverse("contact", &params).is_err());
    }

    #[test]
    fn test_reverse_errors() {
        let t = table();
        let params: HashMap<&str, &str> = HashMap::new();
        assert!(matches!(
            t.reverse("missing", &params),
            Err(PagewireError::NoReverseMatch(_))
        ));
        assert!(matches!(
            t.reverse("blog-post", &params),
            Err(PagewireError::NoReverseMatch(_))
        ));
        assert!(t.reverse("not-found", &params).is_err());
    }

    #[test]
    fn test_debug_lists_entries() {
        let debug = format!("{:?}", table());
        assert!(debug.contains("(\"/blog/:slug\", \"blog-post\")"));
    }
}
