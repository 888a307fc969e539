//! # pagewire-core
//!
//! Core types shared by every pagewire crate: the error enum, settings and
//! their loaders, and tracing setup. This crate has no framework dependencies.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Router, transition and loader configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{PagewireError, PagewireResult, ResolutionFailure};
pub use settings::{Settings, TransitionSettings};
