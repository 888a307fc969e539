//! The navigation loop.
//!
//! A [`Navigator`] turns path changes into presented views. Each navigation
//! gets a [`NavigationContext`] with a fresh sequence number; the matched
//! view (or the loading placeholder) is presented through the
//! [`Transitioner`], and when a pending view finishes resolving the
//! navigator swaps it in, provided the user hasn't moved on. Resolution
//! failures go to an [`ErrorPresenter`].
//!
//! All of this runs on one task: [`Navigator::run`] handles history events
//! and resolution announcements strictly in the order it receives them.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

use pagewire_core::logging::navigation_span;
use pagewire_core::ResolutionFailure;

use crate::dispatcher::{Dispatcher, Render};
use crate::history::HistoryProvider;
use crate::registry::ResolutionEvent;
use crate::routes::RouteMatch;
use crate::transition::Transitioner;
use crate::view::{ViewId, ViewOutput};

/// Everything known about one navigation.
#[derive(Debug, Clone)]
pub struct NavigationContext {
    /// Increases by one per navigation; later navigations supersede earlier.
    pub seq: u64,
    /// The matched entry and its extracted parameters.
    pub route: RouteMatch,
    /// What was on screen when the navigation started.
    pub previous: Option<ViewOutput>,
}

impl NavigationContext {
    /// Returns the normalized path.
    pub fn path(&self) -> &str {
        self.route.path()
    }

    /// Returns the selected view.
    pub fn view_id(&self) -> &ViewId {
        self.route.view_id()
    }
}

/// Shows resolution failures to the user (error page, retry prompt, ...).
pub trait ErrorPresenter: Send + Sync {
    /// Called once per failed navigation.
    fn present(&self, failure: &ResolutionFailure, context: &NavigationContext);
}

/// Logs failures and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorPresenter;

impl ErrorPresenter for LogErrorPresenter {
    fn present(&self, failure: &ResolutionFailure, context: &NavigationContext) {
        tracing::error!(
            seq = context.seq,
            path = %context.path(),
            view_id = %failure.view_id,
            reason = %failure.reason,
            "navigation failed"
        );
    }
}

#[derive(Debug, Default)]
struct State {
    seq: u64,
    current: Option<NavigationContext>,
    presented: Option<ViewOutput>,
}

/// Drives navigation: match, render, transition, swap in resolved views.
pub struct Navigator {
    dispatcher: Dispatcher,
    transitioner: Transitioner,
    presenter: Arc<dyn ErrorPresenter>,
    state: Mutex<State>,
    frames: watch::Sender<Option<ViewOutput>>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("dispatcher", &self.dispatcher)
            .field("transitioner", &self.transitioner)
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Creates a navigator that logs failures.
    pub fn new(dispatcher: Dispatcher, transitioner: Transitioner) -> Self {
        let (frames, _) = watch::channel(None);
        Self {
            dispatcher,
            transitioner,
            presenter: Arc::new(LogErrorPresenter),
            state: Mutex::new(State::default()),
            frames,
        }
    }

    /// Replaces the failure presenter.
    #[must_use]
    pub fn with_presenter(mut self, presenter: Arc<dyn ErrorPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub const fn transitioner(&self) -> &Transitioner {
        &self.transitioner
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("navigator state lock poisoned")
    }

    /// Returns the context of the latest navigation.
    pub fn current(&self) -> Option<NavigationContext> {
        self.state().current.clone()
    }

    /// Returns what is on screen.
    pub fn presented(&self) -> Option<ViewOutput> {
        self.state().presented.clone()
    }

    /// Subscribes to presented frames. Every successful navigation
    /// publishes one, even if the view on screen doesn't change.
    pub fn frames(&self) -> watch::Receiver<Option<ViewOutput>> {
        self.frames.subscribe()
    }

    /// Navigates to `path`, superseding any earlier navigation.
    ///
    /// Presents the selected view if it is resolved and the loading
    /// placeholder otherwise.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolutionFailure`] of a view that failed to load,
    /// after handing it to the error presenter. The previous view stays on
    /// screen.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime: presenting a view starts a
    /// transition task.
    pub fn navigate(&self, path: &str) -> Result<Render, ResolutionFailure> {
        let route = self.dispatcher.match_path(path);

        let mut state = self.state();
        state.seq += 1;
        let span = navigation_span(state.seq, route.path());
        let _entered = span.enter();

        let context = NavigationContext {
            seq: state.seq,
            route,
            previous: state.presented.clone(),
        };
        tracing::info!(view_id = %context.view_id(), "navigating");

        let result = self.dispatcher.render_match(&context.route);
        if let Ok(render) = &result {
            self.show(&mut state, context.previous.clone(), render.output().clone());
        }
        state.current = Some(context.clone());
        drop(state);

        if let Err(failure) = &result {
            self.presenter.present(failure, &context);
        }
        result
    }

    /// Handles a settled resolution.
    ///
    /// If it is for the current navigation and the placeholder is on
    /// screen, the resolved view (or the failure) replaces it. Anything
    /// else was superseded, so the result just stays cached.
    pub fn on_resolution(&self, event: &ResolutionEvent) -> Option<Render> {
        let is_current = self
            .state()
            .current
            .as_ref()
            .is_some_and(|current| current.view_id() == &event.view_id);
        if is_current {
            self.refresh()
        } else {
            tracing::debug!(view_id = %event.view_id, "superseded resolution cached only");
            None
        }
    }

    /// Re-renders the current navigation if the placeholder is on screen.
    ///
    /// The placeholder is swapped out without an exit animation.
    pub fn refresh(&self) -> Option<Render> {
        let mut state = self.state();
        let context = state.current.clone()?;
        let waiting = state
            .presented
            .as_ref()
            .is_some_and(|presented| presented.is_fallback && presented.view_id == *context.view_id());
        if !waiting {
            return None;
        }

        let span = navigation_span(context.seq, context.path());
        let _entered = span.enter();

        match self.dispatcher.render_match(&context.route) {
            Ok(Render::Ready(output)) => {
                tracing::debug!(view_id = %output.view_id, "resolved view replaces fallback");
                self.show(&mut state, None, output.clone());
                Some(Render::Ready(output))
            }
            Ok(Render::Pending(_)) => None,
            Err(failure) => {
                // Leave the placeholder up; the presenter owns what happens next.
                drop(state);
                self.presenter.present(&failure, &context);
                None
            }
        }
    }

    /// Clears the current view's cached failure and navigates to it again.
    ///
    /// Returns `None` if the current view hasn't failed.
    pub fn retry(&self) -> Option<Result<Render, ResolutionFailure>> {
        let path = {
            let state = self.state();
            let current = state.current.as_ref()?;
            if !self.dispatcher.retry(current.view_id()) {
                return None;
            }
            current.path().to_string()
        };
        Some(self.navigate(&path))
    }

    /// Runs the navigation loop until `history` stops producing events.
    ///
    /// Navigates to the history's current path first, then handles
    /// navigation events and resolution announcements as they arrive.
    pub async fn run(&self, history: &dyn HistoryProvider) {
        let mut navigations = history.subscribe();
        let mut resolutions = self.dispatcher.subscribe();

        self.navigate(&history.current_path()).ok();

        loop {
            tokio::select! {
                event = navigations.recv() => match event {
                    Some(event) => {
                        self.navigate(&event.to).ok();
                    }
                    None => {
                        tracing::debug!("history closed; navigation loop stopping");
                        break;
                    }
                },
                event = resolutions.recv() => match event {
                    Ok(event) => {
                        self.on_resolution(&event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "missed resolution events; refreshing");
                        self.refresh();
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }

    /// Presents `output`. Re-presenting what is already on screen publishes
    /// the frame again without animating.
    fn show(&self, state: &mut State, previous: Option<ViewOutput>, output: ViewOutput) {
        if state.presented.as_ref() != Some(&output) {
            self.transitioner.transition(previous, output.clone());
            state.presented = Some(output.clone());
        }
        self.frames.send_replace(Some(output));
    }
}
