//! A stub view.

use pagewire_router::{RenderContext, View, ViewOutput};

/// Renders a fixed title and a body listing the path and its parameters.
///
/// ```
/// use pagewire_router::{Params, RenderContext, View, ViewId};
/// use pagewire_test::StubView;
///
/// let id = ViewId::from("blog-post");
/// let mut params = Params::new();
/// params.insert("slug".into(), "hello".into());
/// let out = StubView::new("Post").render(&RenderContext {
///     path: "/blog/hello",
///     view_id: &id,
///     params: &params,
/// });
/// assert_eq!(out.body, "/blog/hello slug=hello");
/// ```
#[derive(Debug, Clone)]
pub struct StubView {
    title: String,
}

impl StubView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl View for StubView {
    fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        let mut params: Vec<String> = ctx
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        params.sort_unstable();

        let mut body = ctx.path.to_string();
        for param in params {
            body.push(' ');
            body.push_str(&param);
        }
        ViewOutput::new(ctx.view_id.clone(), self.title.clone(), body)
    }
}
