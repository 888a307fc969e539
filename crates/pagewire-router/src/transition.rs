//! Exit/enter transitions between presented views.
//!
//! A transition runs the outgoing view's exit animation and then the
//! incoming view's enter animation. Starting a new transition abandons the
//! one in flight: its task is aborted and it never publishes another phase,
//! so an older navigation can't finish on top of a newer one. Exit
//! animations are bounded by a timeout; one that overruns is cut short and
//! the enter animation starts anyway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use pagewire_core::TransitionSettings;

use crate::view::ViewOutput;

/// Plays exit and enter animations.
#[async_trait]
pub trait Animator: Send + Sync + 'static {
    /// Animates `output` leaving the screen.
    async fn exit(&self, output: &ViewOutput);

    /// Animates `output` arriving on screen.
    async fn enter(&self, output: &ViewOutput);
}

/// An animator that just waits out fixed durations.
#[derive(Debug, Clone, Copy)]
pub struct TimedAnimator {
    exit: Duration,
    enter: Duration,
}

impl TimedAnimator {
    pub const fn new(exit: Duration, enter: Duration) -> Self {
        Self { exit, enter }
    }

    pub const fn from_settings(settings: &TransitionSettings) -> Self {
        Self::new(settings.exit(), settings.enter())
    }
}

#[async_trait]
impl Animator for TimedAnimator {
    async fn exit(&self, _output: &ViewOutput) {
        tokio::time::sleep(self.exit).await;
    }

    async fn enter(&self, _output: &ViewOutput) {
        tokio::time::sleep(self.enter).await;
    }
}

/// Where the current transition is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Nothing has been presented yet.
    Idle,
    /// The outgoing view is animating out.
    Exiting(ViewOutput),
    /// The incoming view is animating in.
    Entering(ViewOutput),
    /// The incoming view is fully presented.
    Settled(ViewOutput),
}

impl TransitionPhase {
    /// Returns `true` once nothing is animating.
    pub const fn is_at_rest(&self) -> bool {
        matches!(self, Self::Idle | Self::Settled(_))
    }
}

/// Runs one transition at a time, abandoning stale ones.
pub struct Transitioner {
    animator: Arc<dyn Animator>,
    exit_timeout: Duration,
    current: Arc<AtomicU64>,
    phase: Arc<watch::Sender<TransitionPhase>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Transitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transitioner")
            .field("exit_timeout", &self.exit_timeout)
            .field("current", &self.current_id())
            .field("phase", &*self.phase.borrow())
            .finish_non_exhaustive()
    }
}

impl Transitioner {
    /// Creates a transitioner that cuts exit animations off after
    /// `exit_timeout`.
    pub fn new(animator: Arc<dyn Animator>, exit_timeout: Duration) -> Self {
        let (phase, _) = watch::channel(TransitionPhase::Idle);
        Self {
            animator,
            exit_timeout,
            current: Arc::new(AtomicU64::new(0)),
            phase: Arc::new(phase),
            task: Mutex::new(None),
        }
    }

    /// Creates a transitioner with a [`TimedAnimator`] configured from
    /// `settings`.
    pub fn from_settings(settings: &TransitionSettings) -> Self {
        Self::new(
            Arc::new(TimedAnimator::from_settings(settings)),
            settings.exit_timeout(),
        )
    }

    /// Starts a transition from `previous` (if anything is presented) to
    /// `next`, abandoning whatever transition is in flight.
    ///
    /// The first phase is published before this returns. Returns the
    /// transition's id.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since the animation runs
    /// on a spawned task.
    pub fn transition(&self, previous: Option<ViewOutput>, next: ViewOutput) -> u64 {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;

        let mut task = self.task.lock().expect("transition task lock poisoned");
        if let Some(stale) = task.take() {
            if !stale.is_finished() {
                tracing::debug!(transition = id - 1, "abandoning in-flight transition");
            }
            stale.abort();
        }

        let first = previous.as_ref().map_or_else(
            || TransitionPhase::Entering(next.clone()),
            |prev| TransitionPhase::Exiting(prev.clone()),
        );
        self.phase.send_replace(first);

        let animator = Arc::clone(&self.animator);
        let current = Arc::clone(&self.current);
        let phase = Arc::clone(&self.phase);
        let exit_timeout = self.exit_timeout;

        *task = Some(tokio::spawn(async move {
            let publish = |next_phase: TransitionPhase| {
                phase.send_if_modified(|slot| {
                    if current.load(Ordering::SeqCst) == id {
                        *slot = next_phase;
                        true
                    } else {
                        false
                    }
                });
            };

            if let Some(prev) = previous {
                if tokio::time::timeout(exit_timeout, animator.exit(&prev))
                    .await
                    .is_err()
                {
                    tracing::warn!(
                        view_id = %prev.view_id,
                        timeout_ms = exit_timeout.as_millis(),
                        "exit animation timed out; entering anyway"
                    );
                }
                publish(TransitionPhase::Entering(next.clone()));
            }

            animator.enter(&next).await;
            publish(TransitionPhase::Settled(next));
        }));

        id
    }

    /// Subscribes to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<TransitionPhase> {
        self.phase.subscribe()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase.borrow().clone()
    }

    /// Returns the id of the most recently started transition (0 if none).
    pub fn current_id(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Returns `true` while a transition task is still running.
    pub fn is_in_flight(&self) -> bool {
        self.task
            .lock()
            .expect("transition task lock poisoned")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Waits until nothing is animating.
    pub async fn wait_settled(&self) {
        let mut phases = self.phase.subscribe();
        // The sender lives in `self`, so the channel can't close here.
        phases.wait_for(TransitionPhase::is_at_rest).await.ok();
    }
}

impl Drop for Transitioner {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(task) = task.take() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::view::ViewId;

    fn out(id: &str) -> ViewOutput {
        ViewOutput::new(ViewId::from(id), id, "")
    }

    fn timed(exit_ms: u64, enter_ms: u64, timeout_ms: u64) -> Transitioner {
        Transitioner::new(
            Arc::new(TimedAnimator::new(
                Duration::from_millis(exit_ms),
                Duration::from_millis(enter_ms),
            )),
            Duration::from_millis(timeout_ms),
        )
    }

    fn assert_elapsed(start: Instant, ms: u64) {
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(ms), "{elapsed:?} < {ms}ms");
        assert!(elapsed < Duration::from_millis(ms + 10), "{elapsed:?} >> {ms}ms");
    }

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Animator for Recorder {
        async fn exit(&self, output: &ViewOutput) {
            self.log.lock().unwrap().push(format!("exit:{}", output.view_id));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        async fn enter(&self, output: &ViewOutput) {
            self.log.lock().unwrap().push(format!("enter:{}", output.view_id));
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_presentation_only_enters() {
        let transitioner = timed(200, 300, 500);
        assert_eq!(transitioner.phase(), TransitionPhase::Idle);

        let start = Instant::now();
        assert_eq!(transitioner.transition(None, out("home")), 1);
        assert_eq!(transitioner.phase(), TransitionPhase::Entering(out("home")));

        transitioner.wait_settled().await;
        assert_eq!(transitioner.phase(), TransitionPhase::Settled(out("home")));
        assert_elapsed(start, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_then_enter() {
        let transitioner = timed(200, 300, 500);
        let start = Instant::now();
        transitioner.transition(Some(out("home")), out("about"));
        assert_eq!(transitioner.phase(), TransitionPhase::Exiting(out("home")));

        transitioner.wait_settled().await;
        assert_eq!(transitioner.phase(), TransitionPhase::Settled(out("about")));
        assert_elapsed(start, 500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_timeout_cuts_animation_short() {
        let transitioner = timed(5_000, 100, 500);
        let start = Instant::now();
        transitioner.transition(Some(out("home")), out("contact"));

        transitioner.wait_settled().await;
        assert_eq!(transitioner.phase(), TransitionPhase::Settled(out("contact")));
        assert_elapsed(start, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_transition_abandons_stale_one() {
        let recorder = Arc::new(Recorder::default());
        let transitioner = Transitioner::new(recorder.clone(), Duration::from_millis(500));

        transitioner.transition(Some(out("a")), out("b"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(transitioner.is_in_flight());

        assert_eq!(transitioner.transition(Some(out("b")), out("c")), 2);
        transitioner.wait_settled().await;

        assert_eq!(transitioner.phase(), TransitionPhase::Settled(out("c")));
        assert_eq!(recorder.log(), vec!["exit:a", "exit:b", "enter:c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_phases() {
        let transitioner = timed(200, 300, 500);
        let mut phases = transitioner.subscribe();

        transitioner.transition(Some(out("home")), out("blog-index"));
        phases
            .wait_for(|p| *p == TransitionPhase::Entering(out("blog-index")))
            .await
            .unwrap();
        phases
            .wait_for(|p| *p == TransitionPhase::Settled(out("blog-index")))
            .await
            .unwrap();
    }

    #[test]
    fn test_from_settings() {
        let settings = TransitionSettings::default();
        let transitioner = Transitioner::from_settings(&settings);
        assert_eq!(transitioner.exit_timeout, settings.exit_timeout());
        assert_eq!(transitioner.current_id(), 0);
        assert!(!transitioner.is_in_flight());
    }
}
