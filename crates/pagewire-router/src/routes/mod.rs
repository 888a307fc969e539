//! Route declaration and lookup.
//!
//! - [`pattern`]: pattern syntax (`/about`, `/blog/:slug`, `*`) and matching
//! - [`table`]: the ordered, immutable route table and reverse lookup
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use pagewire_router::routes::RouteTable;
//!
//! let table = RouteTable::builder()
//!     .route("/", "home")
//!     .route("/blog/:slug", "blog-post")
//!     .route("*", "not-found")
//!     .build()
//!     .unwrap();
//!
//! // Forward resolution
//! let m = table.match_path("/blog/my-first-post");
//! assert_eq!(m.param("slug"), Some("my-first-post"));
//!
//! // Reverse resolution
//! let mut params = HashMap::new();
//! params.insert("slug", "my-first-post");
//! assert_eq!(table.reverse("blog-post", &params).unwrap(), "/blog/my-first-post");
//! ```

pub mod pattern;
pub mod table;

pub use pattern::{RoutePattern, Segment};
pub use table::{RouteEntry, RouteMatch, RouteTable, RouteTableBuilder};
