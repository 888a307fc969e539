//! The view-resolution facility.
//!
//! A [`ViewLoader`] turns a [`ViewId`] into a renderable implementation,
//! asynchronously. The router never calls a loader directly; it goes through
//! the [`ViewRegistry`](crate::registry::ViewRegistry), which guarantees each
//! view is loaded at most once.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::view::{SharedView, ViewId};

/// Why a loader could not produce a view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The loader has no module for this view.
    #[error("no module registered for view '{0}'")]
    UnknownView(String),

    /// Fetching the module failed (connection reset, timeout, bad status).
    #[error("network error: {0}")]
    Network(String),

    /// The module was fetched but could not be instantiated.
    #[error("invalid module: {0}")]
    InvalidModule(String),
}

/// Loads deferred view implementations.
///
/// Implementations may take arbitrarily long and may fail; callers see the
/// result through the registry's shared in-flight resolution.
#[async_trait]
pub trait ViewLoader: Send + Sync + 'static {
    /// Produces the implementation for `view_id`.
    async fn load(&self, view_id: &ViewId) -> Result<SharedView, LoadError>;
}

/// A loader backed by an in-memory table of ready views.
///
/// Useful for server-side tools and for tests that don't care about latency.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pagewire_router::{FallbackView, StaticLoader, ViewId, ViewLoader};
///
/// # tokio_test_block_on(async {
/// let loader = StaticLoader::new().with_view("about", Arc::new(FallbackView::default()));
/// assert!(loader.load(&ViewId::from("about")).await.is_ok());
/// assert!(loader.load(&ViewId::from("missing")).await.is_err());
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Default)]
pub struct StaticLoader {
    views: HashMap<ViewId, SharedView>,
}

impl StaticLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a view implementation.
    #[must_use]
    pub fn with_view(mut self, view_id: impl Into<ViewId>, view: SharedView) -> Self {
        self.views.insert(view_id.into(), view);
        self
    }

    /// Returns the number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if no views are registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.views.keys().map(ViewId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("StaticLoader").field("views", &ids).finish()
    }
}

#[async_trait]
impl ViewLoader for StaticLoader {
    async fn load(&self, view_id: &ViewId) -> Result<SharedView, LoadError> {
        self.views
            .get(view_id)
            .cloned()
            .ok_or_else(|| LoadError::UnknownView(view_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::view::FallbackView;

    #[tokio::test]
    async fn test_static_loader_known_view() {
        let loader = StaticLoader::new().with_view("home", Arc::new(FallbackView::default()));
        assert_eq!(loader.len(), 1);
        assert!(loader.load(&ViewId::from("home")).await.is_ok());
    }

    #[tokio::test]
    async fn test_static_loader_unknown_view() {
        let loader = StaticLoader::new();
        assert!(loader.is_empty());
        let err = loader.load(&ViewId::from("nope")).await.err().unwrap();
        assert_eq!(err, LoadError::UnknownView("nope".into()));
        assert_eq!(err.to_string(), "no module registered for view 'nope'");
    }

    #[test]
    fn test_static_loader_debug_sorted() {
        let loader = StaticLoader::new()
            .with_view("b", Arc::new(FallbackView::default()))
            .with_view("a", Arc::new(FallbackView::default()));
        assert_eq!(format!("{loader:?}"), "StaticLoader { views: [\"a\", \"b\"] }");
    }
}
