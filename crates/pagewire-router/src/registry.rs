//! The view-definition cache.
//!
//! [`ViewRegistry`] memoizes view resolution per [`ViewId`]. Each id moves
//! through `unresolved → resolving → resolved | failed` exactly once:
//!
//! - the first request starts the loader and stores the in-flight future;
//! - requests made while it is in flight join that same future, so the
//!   loader runs once no matter how many callers race;
//! - the outcome, success or failure, is cached for the life of the registry.
//!
//! A failed entry stays failed until someone calls [`ViewRegistry::retry`];
//! the registry never retries on its own.
//!
//! Every settled resolution is announced on a broadcast channel so the
//! navigation loop can swap the loading placeholder for the real view.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;

use pagewire_core::ResolutionFailure;

use crate::loader::ViewLoader;
use crate::view::{SharedView, ViewId};

/// Capacity of the resolution event channel.
const EVENT_CAPACITY: usize = 64;

/// A resolution anyone can await; clones share one underlying load.
pub type ResolveFuture = Shared<BoxFuture<'static, Result<SharedView, ResolutionFailure>>>;

/// Where a view definition is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionState {
    /// Never requested.
    Unresolved,
    /// A load is in flight.
    Resolving,
    /// Loaded and cached.
    Resolved,
    /// The load failed; the failure is cached.
    Failed,
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Resolving => write!(f, "resolving"),
            Self::Resolved => write!(f, "resolved"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A snapshot of one view definition, without starting anything.
#[derive(Clone)]
pub enum Peek {
    /// Never requested.
    Unresolved,
    /// A load is in flight.
    Resolving,
    /// The cached implementation.
    Resolved(SharedView),
    /// The cached failure.
    Failed(ResolutionFailure),
}

impl Peek {
    /// Returns the lifecycle state this snapshot corresponds to.
    pub const fn state(&self) -> ResolutionState {
        match self {
            Self::Unresolved => ResolutionState::Unresolved,
            Self::Resolving => ResolutionState::Resolving,
            Self::Resolved(_) => ResolutionState::Resolved,
            Self::Failed(_) => ResolutionState::Failed,
        }
    }
}

impl fmt::Debug for Peek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(failure) => f.debug_tuple("Failed").field(failure).finish(),
            other => write!(f, "{}", other.state()),
        }
    }
}

/// Announcement that a resolution settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEvent {
    /// The view whose resolution settled.
    pub view_id: ViewId,
    /// `Ok` if the implementation is now cached.
    pub outcome: Result<(), ResolutionFailure>,
}

enum Slot {
    Resolving(ResolveFuture),
    Resolved(SharedView),
    Failed(ResolutionFailure),
}

struct Inner {
    loader: Arc<dyn ViewLoader>,
    slots: Mutex<HashMap<ViewId, Slot>>,
    events: broadcast::Sender<ResolutionEvent>,
}

impl Inner {
    fn slots(&self) -> MutexGuard<'_, HashMap<ViewId, Slot>> {
        self.slots.lock().expect("view registry lock poisoned")
    }

    fn settle(&self, view_id: &ViewId, result: &Result<SharedView, ResolutionFailure>) {
        let slot = match result {
            Ok(view) => Slot::Resolved(Arc::clone(view)),
            Err(failure) => Slot::Failed(failure.clone()),
        };
        self.slots().insert(view_id.clone(), slot);

        match result {
            Ok(_) => tracing::debug!(view_id = %view_id, "view resolved"),
            Err(failure) => tracing::error!(view_id = %view_id, reason = %failure.reason, "view resolution failed"),
        }

        // Nobody listening is fine; the outcome is cached either way.
        self.events
            .send(ResolutionEvent {
                view_id: view_id.clone(),
                outcome: result.as_ref().map(|_| ()).map_err(Clone::clone),
            })
            .ok();
    }
}

/// Memoizing, single-flight cache of view implementations.
///
/// Cloning is cheap and clones share the cache.
#[derive(Clone)]
pub struct ViewRegistry {
    inner: Arc<Inner>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.inner.slots();
        let mut states: Vec<(&str, ResolutionState)> = slots
            .iter()
            .map(|(id, slot)| (id.as_str(), slot_state(slot)))
            .collect();
        states.sort_unstable_by_key(|(id, _)| *id);
        f.debug_struct("ViewRegistry").field("views", &states).finish()
    }
}

impl ViewRegistry {
    /// Creates an empty registry backed by `loader`.
    pub fn new(loader: Arc<dyn ViewLoader>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                loader,
                slots: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Subscribes to settled-resolution announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionEvent> {
        self.inner.events.subscribe()
    }

    /// Returns the future resolving `view_id`, starting the load if the view
    /// is unresolved.
    ///
    /// Calls made while a load is in flight return a handle to that same
    /// load. Resolved and failed views return an immediately ready future.
    /// The load only makes progress while someone polls a handle; use
    /// [`trigger`](Self::trigger) to start it in the background.
    pub fn resolve(&self, view_id: &ViewId) -> ResolveFuture {
        self.begin(view_id).0
    }

    /// Starts resolving `view_id` in the background if it is unresolved.
    ///
    /// Outside a Tokio runtime nothing is started and the view stays
    /// unresolved; the next [`resolve`](Self::resolve) that is awaited loads
    /// it. Returns the state after the call.
    pub fn trigger(&self, view_id: &ViewId) -> ResolutionState {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(view_id = %view_id, "no runtime; background resolution skipped");
            return self.state(view_id);
        };
        let (resolution, started) = self.begin(view_id);
        if started {
            runtime.spawn(async move {
                drop(resolution.await);
            });
        }
        self.state(view_id)
    }

    /// Inspects a view definition without starting anything.
    pub fn peek(&self, view_id: &ViewId) -> Peek {
        match self.inner.slots().get(view_id) {
            None => Peek::Unresolved,
            Some(Slot::Resolving(_)) => Peek::Resolving,
            Some(Slot::Resolved(view)) => Peek::Resolved(Arc::clone(view)),
            Some(Slot::Failed(failure)) => Peek::Failed(failure.clone()),
        }
    }

    /// Returns the lifecycle state of a view definition.
    pub fn state(&self, view_id: &ViewId) -> ResolutionState {
        self.inner
            .slots()
            .get(view_id)
            .map_or(ResolutionState::Unresolved, slot_state)
    }

    /// Returns the cached implementation, if resolved.
    pub fn get(&self, view_id: &ViewId) -> Option<SharedView> {
        match self.inner.slots().get(view_id) {
            Some(Slot::Resolved(view)) => Some(Arc::clone(view)),
            _ => None,
        }
    }

    /// Forgets a cached failure so the next request loads again.
    ///
    /// Returns `false` (and does nothing) unless the view is `failed`.
    pub fn retry(&self, view_id: &ViewId) -> bool {
        let mut slots = self.inner.slots();
        if matches!(slots.get(view_id), Some(Slot::Failed(_))) {
            slots.remove(view_id);
            tracing::info!(view_id = %view_id, "cleared failed resolution for retry");
            true
        } else {
            false
        }
    }

    /// Returns the ids currently in `state`, sorted.
    pub fn views_in(&self, state: ResolutionState) -> Vec<ViewId> {
        let mut ids: Vec<ViewId> = self
            .inner
            .slots()
            .iter()
            .filter(|(_, slot)| slot_state(slot) == state)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_unstable();
        ids
    }

    fn begin(&self, view_id: &ViewId) -> (ResolveFuture, bool) {
        let mut slots = self.inner.slots();
        match slots.get(view_id) {
            Some(Slot::Resolving(pending)) => {
                tracing::trace!(view_id = %view_id, "joining in-flight resolution");
                return (pending.clone(), false);
            }
            Some(Slot::Resolved(view)) => {
                return (future::ready(Ok(Arc::clone(view))).boxed().shared(), false);
            }
            Some(Slot::Failed(failure)) => {
                return (future::ready(Err(failure.clone())).boxed().shared(), false);
            }
            None => {}
        }

        let resolution = load(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.inner.loader),
            view_id.clone(),
        )
        .boxed()
        .shared();
        slots.insert(view_id.clone(), Slot::Resolving(resolution.clone()));
        tracing::debug!(view_id = %view_id, "view resolution started");
        (resolution, true)
    }
}

async fn load(
    registry: Weak<Inner>,
    loader: Arc<dyn ViewLoader>,
    view_id: ViewId,
) -> Result<SharedView, ResolutionFailure> {
    let result = loader
        .load(&view_id)
        .await
        .map_err(|e| ResolutionFailure::new(view_id.as_str(), e.to_string()));

    if let Some(registry) = registry.upgrade() {
        registry.settle(&view_id, &result);
    }
    result
}

const fn slot_state(slot: &Slot) -> ResolutionState {
    match slot {
        Slot::Resolving(_) => ResolutionState::Resolving,
        Slot::Resolved(_) => ResolutionState::Resolved,
        Slot::Failed(_) => ResolutionState::Failed,
    }
}
