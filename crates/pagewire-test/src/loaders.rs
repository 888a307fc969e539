//! Instrumented view loaders.
//!
//! [`CountingLoader`] answers from a table of views, optionally after a
//! simulated latency, and counts how often each view was requested.
//! [`GatedLoader`] holds every load until the test releases (or fails) it,
//! which makes "while resolution is in flight" states deterministic.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use pagewire_router::{LoadError, SharedView, ViewId, ViewLoader};

use crate::views::StubView;

/// A loader that counts calls per view.
///
/// Unknown views load as a [`StubView`] titled with the view id, so tests
/// only need to register views they care about.
#[derive(Default)]
pub struct CountingLoader {
    views: HashMap<ViewId, SharedView>,
    failing: HashSet<ViewId>,
    latency: Duration,
    calls: Mutex<HashMap<ViewId, usize>>,
}

impl std::fmt::Debug for CountingLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingLoader")
            .field("failing", &self.failing)
            .field("latency", &self.latency)
            .field("calls", &self.total_calls())
            .finish_non_exhaustive()
    }
}

impl CountingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a specific implementation for `view_id`.
    #[must_use]
    pub fn with_view(mut self, view_id: impl Into<ViewId>, view: SharedView) -> Self {
        self.views.insert(view_id.into(), view);
        self
    }

    /// Makes every load of `view_id` fail with a network error.
    #[must_use]
    pub fn failing(mut self, view_id: impl Into<ViewId>) -> Self {
        self.failing.insert(view_id.into());
        self
    }

    /// Sleeps this long before answering.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Returns how many times `view_id` was loaded.
    pub fn calls(&self, view_id: &str) -> usize {
        self.calls
            .lock()
            .expect("call counter lock poisoned")
            .get(view_id)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the number of loads across all views.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .expect("call counter lock poisoned")
            .values()
            .sum()
    }
}

#[async_trait]
impl ViewLoader for CountingLoader {
    async fn load(&self, view_id: &ViewId) -> Result<SharedView, LoadError> {
        *self
            .calls
            .lock()
            .expect("call counter lock poisoned")
            .entry(view_id.clone())
            .or_default() += 1;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.contains(view_id) {
            return Err(LoadError::Network(format!("{view_id}: connection reset")));
        }
        Ok(self
            .views
            .get(view_id)
            .cloned()
            .unwrap_or_else(|| Arc::new(StubView::new(view_id.as_str()))))
    }
}

type Gate = watch::Sender<Option<Result<(), LoadError>>>;

/// A loader whose loads wait until the test opens their gate.
///
/// Gates can be opened before the load starts; the load then completes
/// immediately.
#[derive(Debug, Default)]
pub struct GatedLoader {
    gates: Mutex<HashMap<ViewId, Gate>>,
    started: AtomicUsize,
}

impl GatedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn gate(&self, view_id: &ViewId) -> watch::Receiver<Option<Result<(), LoadError>>> {
        self.gates
            .lock()
            .expect("gate lock poisoned")
            .entry(view_id.clone())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    fn open(&self, view_id: &str, outcome: Result<(), LoadError>) {
        let view_id = ViewId::from(view_id);
        self.gates
            .lock()
            .expect("gate lock poisoned")
            .entry(view_id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(outcome));
    }

    /// Lets loads of `view_id` succeed with a [`StubView`].
    pub fn release(&self, view_id: &str) {
        self.open(view_id, Ok(()));
    }

    /// Makes loads of `view_id` fail with `error`.
    pub fn fail(&self, view_id: &str, error: LoadError) {
        self.open(view_id, Err(error));
    }

    /// Returns how many loads have started, across all views.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ViewLoader for GatedLoader {
    async fn load(&self, view_id: &ViewId) -> Result<SharedView, LoadError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let mut gate = self.gate(view_id);
        let outcome = gate
            .wait_for(Option::is_some)
            .await
            .map(|outcome| (*outcome).clone())
            .map_err(|_| LoadError::Network(format!("{view_id}: gate dropped")))?;

        match outcome {
            Some(Ok(())) => Ok(Arc::new(StubView::new(view_id.as_str()))),
            Some(Err(error)) => Err(error),
            None => Err(LoadError::Network(format!("{view_id}: gate never opened"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counting_loader_counts_and_fails() {
        let loader = CountingLoader::new().failing("contact");
        assert!(loader.load(&ViewId::from("home")).await.is_ok());
        assert!(loader.load(&ViewId::from("home")).await.is_ok());
        assert!(loader.load(&ViewId::from("contact")).await.is_err());
        assert_eq!(loader.calls("home"), 2);
        assert_eq!(loader.calls("contact"), 1);
        assert_eq!(loader.calls("about"), 0);
        assert_eq!(loader.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_gated_loader_waits_for_release() {
        let loader = Arc::new(GatedLoader::new());
        let pending = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.load(&ViewId::from("about")).await.is_ok() }
        });

        tokio::task::yield_now().await;
        assert_eq!(loader.started(), 1);
        assert!(!pending.is_finished());

        loader.release("about");
        assert!(pending.await.unwrap());
    }

    #[tokio::test]
    async fn test_gated_loader_opened_early() {
        let loader = GatedLoader::new();
        loader.fail("blog-post", LoadError::InvalidModule("bad chunk".into()));
        let err = loader.load(&ViewId::from("blog-post")).await.err().unwrap();
        assert_eq!(err, LoadError::InvalidModule("bad chunk".into()));
    }
}
