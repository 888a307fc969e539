//! Tracing setup and navigation spans.
//!
//! Log output goes to stderr so command output on stdout stays clean.
//! Debug builds of the settings get the pretty multi-line format; anything
//! else logs one JSON object per event.

use tracing_subscriber::EnvFilter;

use crate::error::PagewireError;
use crate::settings::Settings;

/// Parses a log filter directive such as `info` or
/// `pagewire_router=debug,warn`.
///
/// # Examples
///
/// ```
/// use pagewire_core::logging::parse_filter;
///
/// assert!(parse_filter("pagewire_router=trace").is_ok());
/// assert!(parse_filter("pagewire=loud").is_err());
/// ```
pub fn parse_filter(directive: &str) -> Result<EnvFilter, PagewireError> {
    EnvFilter::try_new(directive).map_err(|e| {
        PagewireError::ConfigurationError(format!("invalid log filter '{directive}': {e}"))
    })
}

/// Installs the global subscriber for `settings`.
///
/// An unparsable `log_level` falls back to `info`. If a subscriber is
/// already installed this does nothing.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;

    let (filter, rejected) = match parse_filter(&settings.log_level) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err)),
    };

    let installed = if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .is_ok()
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .is_ok()
    };

    if let (true, Some(err)) = (installed, rejected) {
        tracing::warn!(error = %err, "falling back to the 'info' log filter");
    }
}

/// Opens the span every event of one navigation is recorded under.
///
/// ```
/// use pagewire_core::logging::navigation_span;
///
/// let span = navigation_span(7, "/blog/hello");
/// let _guard = span.enter();
/// tracing::info!("navigating");
/// ```
pub fn navigation_span(seq: u64, path: &str) -> tracing::Span {
    tracing::info_span!("navigation", seq, path)
}
