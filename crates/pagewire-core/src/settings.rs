//! Settings for pagewire.
//!
//! [`Settings`] holds router, transition and loader configuration with
//! sensible defaults. Load it from files and the environment through
//! [`settings_loader`](crate::settings_loader).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Page transition timing.
///
/// Animation curves are left to the animator; only durations live here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSettings {
    /// Duration of the outgoing view's exit animation, in milliseconds.
    pub exit_ms: u64,
    /// Duration of the incoming view's enter animation, in milliseconds.
    pub enter_ms: u64,
    /// An exit still running after this many milliseconds is abandoned and
    /// the enter begins anyway.
    pub exit_timeout_ms: u64,
}

impl TransitionSettings {
    /// Exit animation duration.
    pub const fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    /// Enter animation duration.
    pub const fn enter(&self) -> Duration {
        Duration::from_millis(self.enter_ms)
    }

    /// Upper bound on waiting for an exit animation.
    pub const fn exit_timeout(&self) -> Duration {
        Duration::from_millis(self.exit_timeout_ms)
    }
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            exit_ms: 200,
            enter_ms: 300,
            exit_timeout_ms: 500,
        }
    }
}

/// The complete set of pagewire settings.
///
/// # Examples
///
/// ```
/// use pagewire_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert!(!settings.case_sensitive);
/// assert_eq!(settings.transition.exit_timeout_ms, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Controls the log format.
    pub debug: bool,

    // ── Routing ──────────────────────────────────────────────────────

    /// Whether static path segments must match with the same case.
    pub case_sensitive: bool,
    /// Title shown by the loading placeholder.
    pub fallback_title: String,

    // ── Loading ──────────────────────────────────────────────────────

    /// Simulated latency of the site module loader, in milliseconds.
    pub load_latency_ms: u64,

    // ── Transitions ──────────────────────────────────────────────────

    /// Exit/enter animation timing.
    pub transition: TransitionSettings,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "pagewire_router=debug").
    pub log_level: String,
}

impl Settings {
    /// Simulated module load latency.
    pub const fn load_latency(&self) -> Duration {
        Duration::from_millis(self.load_latency_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            case_sensitive: false,
            fallback_title: "Loading".to_string(),
            load_latency_ms: 50,
            transition: TransitionSettings::default(),
            log_level: "info".to_string(),
        }
    }
}
