//! An error presenter that collects failures for assertions.

use std::sync::{Arc, Mutex};

use pagewire_core::ResolutionFailure;
use pagewire_router::{ErrorPresenter, NavigationContext};

/// Collects every presented failure along with the navigation it ended.
///
/// Clones share the collection.
#[derive(Debug, Clone, Default)]
pub struct CollectingErrorPresenter {
    failures: Arc<Mutex<Vec<(u64, String, ResolutionFailure)>>>,
}

impl CollectingErrorPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(navigation seq, path, failure)` for each presentation.
    pub fn presented(&self) -> Vec<(u64, String, ResolutionFailure)> {
        self.failures
            .lock()
            .expect("presenter lock poisoned")
            .clone()
    }

    /// Returns just the failures.
    pub fn failures(&self) -> Vec<ResolutionFailure> {
        self.presented()
            .into_iter()
            .map(|(_, _, failure)| failure)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.failures.lock().expect("presenter lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorPresenter for CollectingErrorPresenter {
    fn present(&self, failure: &ResolutionFailure, context: &NavigationContext) {
        self.failures
            .lock()
            .expect("presenter lock poisoned")
            .push((context.seq, context.path().to_string(), failure.clone()));
    }
}
