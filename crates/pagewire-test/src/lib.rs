//! # pagewire-test
//!
//! Test doubles for the pagewire router. Each double records what happened
//! to it so tests can assert on call counts and ordering rather than on
//! timing.
//!
//! ## Modules
//!
//! - [`loaders`] - Loaders that count calls, fail on demand, or wait for a gate
//! - [`animator`] - An animator that records exit/enter start and finish
//! - [`presenter`] - An error presenter that collects failures
//! - [`views`] - A stub view that echoes its render context

pub mod animator;
pub mod loaders;
pub mod presenter;
pub mod views;

pub use animator::{AnimationEvent, AnimationStep, RecordingAnimator};
pub use loaders::{CountingLoader, GatedLoader};
pub use presenter::CollectingErrorPresenter;
pub use views::StubView;
