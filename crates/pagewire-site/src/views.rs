//! Site pages.
//!
//! Page content is deliberately thin: each view renders a title and a line
//! of body text. The blog post view is the only one that reads a parameter.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use pagewire_router::{RenderContext, SharedView, View, ViewOutput};

/// A page with fixed copy.
#[derive(Debug, Clone, Copy)]
pub struct PageView {
    title: &'static str,
    body: &'static str,
}

impl PageView {
    pub const fn new(title: &'static str, body: &'static str) -> Self {
        Self { title, body }
    }
}

impl View for PageView {
    fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        ViewOutput::new(ctx.view_id.clone(), self.title, self.body)
    }
}

/// A single blog post, identified by its slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogPostView;

impl View for BlogPostView {
    fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        let slug = ctx.param("slug").unwrap_or_default();
        ViewOutput::new(ctx.view_id.clone(), title_from_slug(slug), format!("slug: {slug}"))
    }
}

/// Shown for any path no other route matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundView;

impl View for NotFoundView {
    fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        ViewOutput::new(
            ctx.view_id.clone(),
            "Page Not Found",
            format!("Nothing lives at {}.", ctx.path),
        )
    }
}

static PAGES: Lazy<HashMap<&'static str, PageView>> = Lazy::new(|| {
    HashMap::from([
        (
            "home",
            PageView::new("Home", "Growth marketing, hiring and web development under one roof."),
        ),
        (
            "digital-marketing",
            PageView::new("Digital Marketing Mastery", "A hands-on program covering search, social and paid media."),
        ),
        (
            "hiring-solutions",
            PageView::new("Hiring Solutions", "Find, vet and onboard marketing talent."),
        ),
        (
            "agency-services",
            PageView::new("Digital Marketing Agency", "Campaign strategy and execution for growing brands."),
        ),
        (
            "web-development",
            PageView::new("Website Development", "Fast, accessible sites built to convert."),
        ),
        (
            "blog-index",
            PageView::new("Blog", "Articles on marketing, hiring and the web."),
        ),
        (
            "about",
            PageView::new("About Us", "Who we are and how we work."),
        ),
        (
            "contact",
            PageView::new("Contact", "Tell us about your project."),
        ),
    ])
});

/// Returns the implementation for `view_id`, if the site has one.
pub fn view_for(view_id: &str) -> Option<SharedView> {
    match view_id {
        "blog-post" => Some(Arc::new(BlogPostView)),
        "not-found" => Some(Arc::new(NotFoundView)),
        other => PAGES
            .get(other)
            .map(|page| Arc::new(*page) as SharedView),
    }
}

/// Turns `my-first-post` into `My First Post`.
fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pagewire_router::{Params, ViewId};

    use super::*;
    use crate::routes::ROUTES;

    fn render(view_id: &str, path: &str, params: &Params) -> ViewOutput {
        let id = ViewId::from(view_id);
        view_for(view_id).unwrap().render(&RenderContext {
            path,
            view_id: &id,
            params,
        })
    }

    #[test]
    fn test_every_routed_view_exists() {
        for (_, view_id) in ROUTES {
            assert!(view_for(view_id).is_some(), "missing view {view_id}");
        }
        assert!(view_for("pricing").is_none());
    }

    #[test]
    fn test_blog_post_renders_slug() {
        let mut params = Params::new();
        params.insert("slug".into(), "my-first-post".into());
        let out = render("blog-post", "/blog/my-first-post", &params);
        assert_eq!(out.title, "My First Post");
        assert_eq!(out.body, "slug: my-first-post");
    }

    #[test]
    fn test_not_found_mentions_path() {
        let out = render("not-found", "/nonexistent", &Params::new());
        assert_eq!(out.title, "Page Not Found");
        assert!(out.body.contains("/nonexistent"));
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("hello"), "Hello");
        assert_eq!(title_from_slug("seo_tips--2024"), "Seo Tips 2024");
        assert_eq!(title_from_slug(""), "");
    }
}
