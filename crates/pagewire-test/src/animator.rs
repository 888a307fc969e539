//! A recording animator.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pagewire_router::{Animator, ViewOutput};

/// One point in an animation's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    ExitStarted,
    ExitFinished,
    EnterStarted,
    EnterFinished,
}

impl fmt::Display for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExitStarted => "exit-start",
            Self::ExitFinished => "exit-end",
            Self::EnterStarted => "enter-start",
            Self::EnterFinished => "enter-end",
        })
    }
}

/// A recorded step together with the output being animated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationEvent {
    pub step: AnimationStep,
    pub output: ViewOutput,
}

impl fmt::Display for AnimationEvent {
    /// `exit-start home`, or `enter-end about (fallback)` for the placeholder.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.step, self.output.view_id)?;
        if self.output.is_fallback {
            f.write_str(" (fallback)")?;
        }
        Ok(())
    }
}

/// An animator that sleeps like [`TimedAnimator`](pagewire_router::TimedAnimator)
/// and records when each animation starts and finishes.
///
/// An animation abandoned mid-way records its start but never its finish.
/// Clones share the log.
#[derive(Debug, Clone)]
pub struct RecordingAnimator {
    exit: Duration,
    enter: Duration,
    events: Arc<Mutex<Vec<AnimationEvent>>>,
}

impl RecordingAnimator {
    pub fn new(exit: Duration, enter: Duration) -> Self {
        Self {
            exit,
            enter,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, step: AnimationStep, output: &ViewOutput) {
        self.events
            .lock()
            .expect("animation log lock poisoned")
            .push(AnimationEvent {
                step,
                output: output.clone(),
            });
    }

    /// Returns every recorded event in order.
    pub fn events(&self) -> Vec<AnimationEvent> {
        self.events
            .lock()
            .expect("animation log lock poisoned")
            .clone()
    }

    /// Returns the recorded events in their display form.
    pub fn log(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events
            .lock()
            .expect("animation log lock poisoned")
            .clear();
    }
}

#[async_trait]
impl Animator for RecordingAnimator {
    async fn exit(&self, output: &ViewOutput) {
        self.record(AnimationStep::ExitStarted, output);
        tokio::time::sleep(self.exit).await;
        self.record(AnimationStep::ExitFinished, output);
    }

    async fn enter(&self, output: &ViewOutput) {
        self.record(AnimationStep::EnterStarted, output);
        tokio::time::sleep(self.enter).await;
        self.record(AnimationStep::EnterFinished, output);
    }
}

#[cfg(test)]
mod tests {
    use pagewire_router::ViewId;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_records_start_and_finish() {
        let animator = RecordingAnimator::new(Duration::from_millis(100), Duration::from_millis(100));
        animator.exit(&ViewOutput::new(ViewId::from("home"), "Home", "")).await;
        animator
            .enter(&ViewOutput::fallback(ViewId::from("about"), "Loading"))
            .await;

        assert_eq!(
            animator.log(),
            vec![
                "exit-start home",
                "exit-end home",
                "enter-start about (fallback)",
                "enter-end about (fallback)",
            ]
        );

        animator.clear();
        assert!(animator.events().is_empty());
    }
}
