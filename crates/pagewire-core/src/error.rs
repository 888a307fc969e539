//! Core error types for pagewire.
//!
//! [`PagewireError`] covers route table defects, view resolution failures,
//! reverse lookups, configuration problems and IO. [`ResolutionFailure`] is
//! kept as its own cloneable type because a single failed resolution is
//! handed to every caller that was waiting on it.

use std::fmt;

use thiserror::Error;

/// A deferred view implementation failed to load.
///
/// Cheap to clone: it is cached in the view definition and returned to every
/// caller that shares the failed resolution.
///
/// # Examples
///
/// ```
/// use pagewire_core::ResolutionFailure;
///
/// let failure = ResolutionFailure::new("blog-post", "chunk fetch timed out");
/// assert_eq!(failure.view_id, "blog-post");
/// assert_eq!(
///     failure.to_string(),
///     "view 'blog-post' failed to load: chunk fetch timed out"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    /// The view identifier whose implementation could not be loaded.
    pub view_id: String,
    /// Loader-supplied description of what went wrong.
    pub reason: String,
}

impl ResolutionFailure {
    /// Creates a new failure for the given view.
    pub fn new(view_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            view_id: view_id.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view '{}' failed to load: {}", self.view_id, self.reason)
    }
}

impl std::error::Error for ResolutionFailure {}

/// The primary error type for pagewire.
#[derive(Error, Debug)]
pub enum PagewireError {
    // ── Routing ──────────────────────────────────────────────────────

    /// No route matched a path. Only possible with a table that lacks a
    /// catch-all, which table construction rejects.
    #[error("No route matches: {0}")]
    NoMatch(String),

    /// A view's deferred implementation failed to load.
    #[error(transparent)]
    ResolutionFailure(#[from] ResolutionFailure),

    /// No route with the given name, or the parameters did not fit it.
    #[error("Reverse for '{0}' not found")]
    NoReverseMatch(String),

    // ── Configuration ────────────────────────────────────────────────

    /// The route table or another component is wired incorrectly.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PagewireError {
    /// Returns the process exit code associated with this error.
    ///
    /// Codes follow the BSD `sysexits` conventions:
    ///
    /// - `NoReverseMatch` -> 65 (data error)
    /// - `ResolutionFailure` -> 69 (service unavailable)
    /// - `NoMatch`, `ImproperlyConfigured` -> 70 (internal software error)
    /// - `IoError` -> 74
    /// - `ConfigurationError` -> 78
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NoReverseMatch(_) => 65,
            Self::ResolutionFailure(_) => 69,
            Self::NoMatch(_) | Self::ImproperlyConfigured(_) => 70,
            Self::IoError(_) => 74,
            Self::ConfigurationError(_) => 78,
        }
    }

    /// Returns `true` if this error reveals a bug in the route wiring rather
    /// than a runtime condition.
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::NoMatch(_) | Self::ImproperlyConfigured(_))
    }
}

/// A convenience type alias for `Result<T, PagewireError>`.
pub type PagewireResult<T> = Result<T, PagewireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_failure_display() {
        let failure = ResolutionFailure::new("contact", "network down");
        assert_eq!(failure.to_string(), "view 'contact' failed to load: network down");
    }

    #[test]
    fn test_resolution_failure_converts_transparently() {
        let err: PagewireError = ResolutionFailure::new("about", "404").into();
        assert_eq!(err.to_string(), "view 'about' failed to load: 404");
        assert_eq!(err.exit_code(), 69);
        assert!(!err.is_defect());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PagewireError::NoReverseMatch("x".into()).exit_code(), 65);
        assert_eq!(PagewireError::NoMatch("/x".into()).exit_code(), 70);
        assert_eq!(PagewireError::ImproperlyConfigured("x".into()).exit_code(), 70);
        assert_eq!(PagewireError::ConfigurationError("x".into()).exit_code(), 78);
    }

    #[test]
    fn test_defects() {
        assert!(PagewireError::NoMatch("/x".into()).is_defect());
        assert!(PagewireError::ImproperlyConfigured("x".into()).is_defect());
        assert!(!PagewireError::ConfigurationError("x".into()).is_defect());
    }

    #[test]
    fn test_no_match_display() {
        let err = PagewireError::NoMatch("/missing".into());
        assert_eq!(err.to_string(), "No route matches: /missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PagewireError = io_err.into();
        assert_eq!(err.exit_code(), 74);
        assert!(err.to_string().contains("file missing"));
    }
}
