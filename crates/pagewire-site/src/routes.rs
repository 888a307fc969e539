//! URL configuration for the marketing site.

use pagewire_core::PagewireResult;
use pagewire_router::RouteTable;

/// The site's routes in declaration order, catch-all last.
pub const ROUTES: &[(&str, &str)] = &[
    ("/", "home"),
    ("/digital-marketing-mastery", "digital-marketing"),
    ("/hiring-solutions", "hiring-solutions"),
    ("/digital-marketing-agency", "agency-services"),
    ("/website-development", "web-development"),
    ("/blog", "blog-index"),
    ("/blog/:slug", "blog-post"),
    ("/about", "about"),
    ("/contact", "contact"),
    ("*", "not-found"),
];

/// Builds the site's route table.
///
/// Each route is named after its view, so `reverse("blog-post", ..)` works.
pub fn site_routes(case_sensitive: bool) -> PagewireResult<RouteTable> {
    ROUTES
        .iter()
        .fold(RouteTable::builder(), |builder, (pattern, view_id)| {
            builder.route(pattern, *view_id)
        })
        .case_sensitive(case_sensitive)
        .build()
}
