//! # pagewire-router
//!
//! Client-side route wiring: paths map to lazily loaded views, a placeholder
//! is shown while a view loads, and page transitions run the outgoing view's
//! exit before the incoming view's entry.
//!
//! ## Modules
//!
//! - [`path`] - Path normalization
//! - [`routes`] - Route patterns, the ordered route table and reverse lookup
//! - [`view`] - View identifiers, the `View` trait and rendered output
//! - [`loader`] - The asynchronous view loader seam
//! - [`registry`] - Memoized, single-flight view resolution
//! - [`dispatcher`] - Path → rendered view, with loading fallback
//! - [`transition`] - Exit/enter sequencing with last-navigation-wins
//! - [`history`] - History providers
//! - [`navigator`] - The navigation loop tying it all together
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use pagewire_router::{Dispatcher, FallbackView, RouteTable, StaticLoader};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let table = RouteTable::builder()
//!     .route("/", "home")
//!     .route("*", "not-found")
//!     .build()
//!     .unwrap();
//! let loader = StaticLoader::new()
//!     .with_view("home", Arc::new(FallbackView::new("Home")))
//!     .with_view("not-found", Arc::new(FallbackView::new("Not Found")));
//! let dispatcher = Dispatcher::new(table, Arc::new(loader));
//!
//! // The first render shows the placeholder while "home" loads.
//! assert!(dispatcher.render("/").unwrap().is_pending());
//! let home = dispatcher.render_resolved("/").await.unwrap();
//! assert_eq!(home.title, "Home");
//! # });
//! ```

pub mod dispatcher;
pub mod history;
pub mod loader;
pub mod navigator;
pub mod path;
pub mod registry;
pub mod routes;
pub mod transition;
pub mod view;

pub use dispatcher::{Dispatcher, Render};
pub use history::{HistoryProvider, MemoryHistory, NavigationEvent, NavigationType};
pub use loader::{LoadError, StaticLoader, ViewLoader};
pub use navigator::{ErrorPresenter, LogErrorPresenter, NavigationContext, Navigator};
pub use registry::{Peek, ResolutionEvent, ResolutionState, ViewRegistry};
pub use routes::{RouteEntry, RouteMatch, RoutePattern, RouteTable, RouteTableBuilder};
pub use transition::{Animator, TimedAnimator, TransitionPhase, Transitioner};
pub use view::{FallbackView, Params, RenderContext, SharedView, View, ViewId, ViewOutput};
