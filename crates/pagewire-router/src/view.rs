//! Views and their rendered output.
//!
//! A [`View`] is the renderable implementation behind a [`ViewId`]. Views
//! are produced lazily by a [`ViewLoader`](crate::loader::ViewLoader) and
//! rendered against a [`RenderContext`] describing the current match.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named parameter values extracted from a path.
pub type Params = HashMap<String, String>;

/// A shared, type-erased view implementation.
pub type SharedView = Arc<dyn View>;

/// Opaque identifier naming a deferred view.
///
/// Cheap to clone; lookups in maps keyed by `ViewId` accept `&str`.
///
/// # Examples
///
/// ```
/// use pagewire_router::ViewId;
///
/// let id = ViewId::from("blog-post");
/// assert_eq!(id.as_str(), "blog-post");
/// assert_eq!(id.to_string(), "blog-post");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(Arc<str>);

impl ViewId {
    /// Creates a view identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ViewId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ViewId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ViewId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything a view needs to render one match.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The normalized path being rendered.
    pub path: &'a str,
    /// The view selected for the path.
    pub view_id: &'a ViewId,
    /// Named parameter values extracted from the path.
    pub params: &'a Params,
}

impl<'a> RenderContext<'a> {
    /// Returns the value of a named parameter.
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params.get(name).map(String::as_str)
    }
}

/// The output of rendering a view.
///
/// Page content is out of scope for the router, so output is a title and
/// a plain body. `is_fallback` marks the loading placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutput {
    /// The view that produced this output (for the placeholder: the view
    /// being waited on).
    pub view_id: ViewId,
    /// Document title.
    pub title: String,
    /// Rendered body.
    pub body: String,
    /// Whether this is the loading placeholder rather than the view itself.
    pub is_fallback: bool,
}

impl ViewOutput {
    /// Creates output for a resolved view.
    pub fn new(view_id: ViewId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            view_id,
            title: title.into(),
            body: body.into(),
            is_fallback: false,
        }
    }

    /// Creates placeholder output shown while `view_id` is loading.
    pub fn fallback(view_id: ViewId, title: impl Into<String>) -> Self {
        Self {
            view_id,
            title: title.into(),
            body: String::new(),
            is_fallback: true,
        }
    }
}

impl fmt::Display for ViewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fallback {
            write!(f, "[{}] {} (loading {})", self.view_id, self.title, self.view_id)
        } else if self.body.is_empty() {
            write!(f, "[{}] {}", self.view_id, self.title)
        } else {
            write!(f, "[{}] {}\n{}", self.view_id, self.title, self.body)
        }
    }
}

/// A renderable page implementation.
///
/// # Examples
///
/// ```
/// use pagewire_router::{Params, RenderContext, View, ViewId, ViewOutput};
///
/// struct About;
///
/// impl View for About {
///     fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
///         ViewOutput::new(ctx.view_id.clone(), "About", "")
///     }
/// }
///
/// let id = ViewId::from("about");
/// let params = Params::new();
/// let out = About.render(&RenderContext { path: "/about", view_id: &id, params: &params });
/// assert_eq!(out.title, "About");
/// ```
pub trait View: Send + Sync {
    /// Renders the view for one match.
    fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput;
}

/// The default loading placeholder: a title and nothing else.
#[derive(Debug, Clone)]
pub struct FallbackView {
    title: String,
}

impl FallbackView {
    /// Creates a placeholder with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for FallbackView {
    fn default() -> Self {
        Self::new("Loading")
    }
}

impl View for FallbackView {
    fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        ViewOutput::fallback(ctx.view_id.clone(), self.title.clone())
    }
}
