//! # pagewire
//!
//! Client-side route dispatch with lazily loaded views.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `pagewire` to get everything, or on individual crates for finer-grained
//! control.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use pagewire::prelude::*;
//!
//! struct Home;
//!
//! impl View for Home {
//!     fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
//!         ViewOutput::new(ctx.view_id.clone(), "Home", "Welcome")
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let table = RouteTable::builder()
//!     .route("/", "home")
//!     .route("*", "not-found")
//!     .build()
//!     .unwrap();
//! let loader = StaticLoader::new().with_view("home", Arc::new(Home));
//! let dispatcher = Dispatcher::new(table, Arc::new(loader));
//!
//! // The first render shows the placeholder while the view loads.
//! assert!(dispatcher.render("/").unwrap().is_pending());
//! assert_eq!(dispatcher.render_resolved("/").await.unwrap().title, "Home");
//! # }
//! ```

/// Settings, errors and logging.
pub use pagewire_core as core;

/// Route tables, view resolution, transitions and the navigation loop.
pub use pagewire_router as router;

/// The marketing site: routes, pages and its module loader.
#[cfg(feature = "site")]
pub use pagewire_site as site;

/// The command registry behind the `pagewire` binary.
#[cfg(feature = "cli")]
pub use pagewire_cli as cli;

/// Test doubles: recording animators, counting and gated loaders.
#[cfg(feature = "testing")]
pub use pagewire_test as test;

// Third-party re-exports
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;

/// The types most applications need.
pub mod prelude {
    pub use pagewire_core::{PagewireError, PagewireResult, ResolutionFailure, Settings};
    pub use pagewire_router::{
        Dispatcher, ErrorPresenter, HistoryProvider, MemoryHistory, Navigator, Render,
        RenderContext, RouteTable, SharedView, StaticLoader, Transitioner, View, ViewId,
        ViewLoader, ViewOutput,
    };
}
