//! # pagewire-site
//!
//! The marketing site wired with pagewire: its route table, one view per
//! page and a loader that simulates fetching page modules.
//!
//! ## Modules
//!
//! - [`routes`] - The site's path table
//! - [`views`] - Page implementations
//! - [`loader`] - The simulated-latency module loader
//!
//! ## Example
//!
//! ```
//! use pagewire_core::Settings;
//!
//! let dispatcher = pagewire_site::dispatcher(&Settings::default()).unwrap();
//! let m = dispatcher.match_path("/blog/my-first-post");
//! assert_eq!(m.view_id().as_str(), "blog-post");
//! assert_eq!(m.param("slug"), Some("my-first-post"));
//! ```

pub mod loader;
pub mod routes;
pub mod views;

use std::sync::Arc;

use pagewire_core::{PagewireResult, Settings};
use pagewire_router::{Dispatcher, FallbackView, Navigator, Transitioner};

pub use loader::SiteLoader;
pub use routes::{site_routes, ROUTES};

/// Builds the site's dispatcher from settings.
///
/// Uses the configured case sensitivity, load latency and fallback title.
pub fn dispatcher(settings: &Settings) -> PagewireResult<Dispatcher> {
    let table = site_routes(settings.case_sensitive)?;
    Ok(
        Dispatcher::new(table, Arc::new(SiteLoader::from_settings(settings)))
            .with_fallback(Arc::new(FallbackView::new(settings.fallback_title.clone()))),
    )
}

/// Builds the site's navigator, with transitions timed from settings.
pub fn navigator(settings: &Settings) -> PagewireResult<Navigator> {
    Ok(Navigator::new(
        dispatcher(settings)?,
        Transitioner::from_settings(&settings.transition),
    ))
}
