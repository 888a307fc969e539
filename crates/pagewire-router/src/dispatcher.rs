//! Path → view dispatch.
//!
//! The [`Dispatcher`] ties the route table to the view registry: it selects
//! the view for a path, renders it if the implementation is cached, and
//! otherwise starts resolution and renders the loading placeholder.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use tokio::sync::broadcast;

use pagewire_core::{PagewireResult, ResolutionFailure};

use crate::loader::ViewLoader;
use crate::registry::{Peek, ResolutionEvent, ResolutionState, ViewRegistry};
use crate::routes::{RouteMatch, RouteTable};
use crate::view::{FallbackView, RenderContext, SharedView, ViewId, ViewOutput};

/// What a render call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// The selected view, fully rendered.
    Ready(ViewOutput),
    /// The loading placeholder; the selected view is still resolving.
    Pending(ViewOutput),
}

impl Render {
    /// Returns the output to present, whichever variant this is.
    pub const fn output(&self) -> &ViewOutput {
        match self {
            Self::Ready(output) | Self::Pending(output) => output,
        }
    }

    /// Consumes the render, returning its output.
    pub fn into_output(self) -> ViewOutput {
        match self {
            Self::Ready(output) | Self::Pending(output) => output,
        }
    }

    /// Returns `true` if this is the loading placeholder.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Maps paths to rendered views.
///
/// Cloning is cheap; clones share the route table and the registry.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    registry: ViewRegistry,
    fallback: SharedView,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher over `table`, loading views with `loader` and
    /// showing [`FallbackView::default`] while they load.
    pub fn new(table: RouteTable, loader: Arc<dyn ViewLoader>) -> Self {
        Self {
            table: Arc::new(table),
            registry: ViewRegistry::new(loader),
            fallback: Arc::new(FallbackView::default()),
        }
    }

    /// Replaces the loading placeholder.
    #[must_use]
    pub fn with_fallback(mut self, fallback: SharedView) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the view registry.
    pub const fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Selects the route entry for `path`. Never fails.
    pub fn match_path(&self, path: &str) -> RouteMatch {
        self.table.match_path(path)
    }

    /// Renders whatever should be on screen for `path` right now.
    ///
    /// # Errors
    ///
    /// Returns the cached [`ResolutionFailure`] if the selected view failed
    /// to load.
    pub fn render(&self, path: &str) -> Result<Render, ResolutionFailure> {
        self.render_match(&self.match_path(path))
    }

    /// Renders an already-selected match.
    ///
    /// A resolved view renders immediately. Otherwise resolution is started
    /// in the background (joining any in-flight load) and the placeholder is
    /// rendered in its place. Called outside a Tokio runtime, the placeholder
    /// is rendered but nothing is loaded until the view is awaited through
    /// [`render_resolved`](Self::render_resolved).
    ///
    /// # Errors
    ///
    /// Returns the cached [`ResolutionFailure`] if the selected view failed
    /// to load.
    pub fn render_match(&self, route: &RouteMatch) -> Result<Render, ResolutionFailure> {
        let view_id = route.view_id();
        match self.registry.peek(view_id) {
            Peek::Resolved(view) => Ok(Render::Ready(view.render(&context(route)))),
            Peek::Failed(failure) => Err(failure),
            Peek::Unresolved | Peek::Resolving => {
                self.registry.trigger(view_id);
                tracing::debug!(path = %route.path(), view_id = %view_id, "view pending; rendering fallback");
                Ok(Render::Pending(self.fallback.render(&context(route))))
            }
        }
    }

    /// Resolves the view for `path` and renders it, waiting as long as the
    /// load takes.
    ///
    /// # Errors
    ///
    /// Returns [`PagewireError::ResolutionFailure`](pagewire_core::PagewireError::ResolutionFailure)
    /// if the view cannot be loaded.
    pub async fn render_resolved(&self, path: &str) -> PagewireResult<ViewOutput> {
        let route = self.match_path(path);
        let view = self.registry.resolve(route.view_id()).await?;
        Ok(view.render(&context(&route)))
    }

    /// Starts resolving `view_id` without rendering it, sharing any
    /// in-flight load.
    pub fn preload(&self, view_id: &ViewId) -> ResolutionState {
        self.registry.trigger(view_id)
    }

    /// Starts resolving the view `path` would select, e.g. when a link is
    /// hovered.
    pub fn preload_path(&self, path: &str) -> ResolutionState {
        self.preload(self.match_path(path).view_id())
    }

    /// Starts resolving every view in the table.
    pub fn preload_all(&self) {
        for view_id in self.table.view_ids() {
            self.registry.trigger(&view_id);
        }
    }

    /// Clears a cached failure so the view can be loaded again.
    pub fn retry(&self, view_id: &ViewId) -> bool {
        self.registry.retry(view_id)
    }

    /// Builds the path for a named route.
    ///
    /// # Errors
    ///
    /// See [`RouteTable::reverse`].
    pub fn reverse<S: BuildHasher>(
        &self,
        name: &str,
        params: &HashMap<&str, &str, S>,
    ) -> PagewireResult<String> {
        self.table.reverse(name, params)
    }

    /// Subscribes to settled-resolution announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionEvent> {
        self.registry.subscribe()
    }
}

fn context(route: &RouteMatch) -> RenderContext<'_> {
    RenderContext {
        path: route.path(),
        view_id: route.view_id(),
        params: route.params(),
    }
}
