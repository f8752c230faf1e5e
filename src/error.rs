//! Error handling for the router.
//!
//! This module defines the types returned when a navigation attempt completes,
//! successfully or not:
//!
//! - [`NavigationResult`] — the top-level outcome of any navigation
//!   (`Success`, `NotFound`, `Blocked`, `Redirected`, `Scheduled`,
//!   `Duplicate`, `Error`).
//! - [`NavigationError`] — a detailed error variant.
//! - [`ErrorReporter`] — where handler failures go. The router never fails
//!   the navigation for them; it reports and keeps going.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::NavigationResult;
//!
//! let result = NavigationResult::Success { path: "/dashboard".into() };
//! assert!(result.is_success());
//!
//! let blocked = NavigationResult::Blocked {
//!     message: Some("Please login to access this page".into()),
//!     redirect: Some("/login".into()),
//! };
//! assert_eq!(blocked.redirect_path(), Some("/login"));
//! ```

use crate::error_log;
use std::sync::Arc;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt.
///
/// Every call to [`Router::navigate`](crate::Router::navigate) and
/// [`Router::handle_location_change`](crate::Router::handle_location_change)
/// returns this enum.
#[derive(Debug, Clone)]
pub enum NavigationResult {
    /// A handler or default view was activated for `path`.
    Success { path: String },
    /// Nothing owns `path`; the previous view stays.
    NotFound { path: String },
    /// The guard did not allow the navigation.
    Blocked {
        message: Option<String>,
        redirect: Option<String>,
    },
    /// Navigation continued at `to` (guard redirect, rule redirect or role default).
    Redirected { to: String },
    /// The fragment was assigned; the host will deliver the change.
    Scheduled { path: String },
    /// A transition to the same target is already in flight.
    Duplicate { path: String },
    /// Navigation error.
    Error(NavigationError),
}

/// Detailed error variants that can occur during navigation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NavigationError {
    /// Nothing owns the path.
    #[error("Route not found: {path}")]
    RouteNotFound { path: String },

    /// The guard denied access without a redirect.
    #[error("Navigation to {path} denied")]
    GuardDenied { path: String },

    /// The activated handler or default view failed.
    #[error("Handler for {path} failed: {cause}")]
    HandlerFailed {
        path: String,
        cause: Arc<anyhow::Error>,
    },

    /// Redirects chained deeper than the configured limit.
    #[error("Redirect loop detected at {path} after {depth} redirects")]
    RedirectLoop { path: String, depth: usize },
}

impl NavigationError {
    /// Wrap a handler failure.
    pub fn handler_failed(path: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::HandlerFailed {
            path: path.into(),
            cause: Arc::new(cause),
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::RouteNotFound { path }
            | Self::GuardDenied { path }
            | Self::HandlerFailed { path, .. }
            | Self::RedirectLoop { path, .. } => path,
        }
    }
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if the navigation was dropped as a duplicate
    pub fn is_duplicate(&self) -> bool {
        matches!(self, NavigationResult::Duplicate { .. })
    }

    /// Check if there was an error
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Get redirect path if blocked with redirect or redirected
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            NavigationResult::Blocked {
                redirect: Some(path),
                ..
            }
            | NavigationResult::Redirected { to: path } => Some(path),
            _ => None,
        }
    }

    /// The error, if any.
    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            NavigationResult::Error(error) => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// Error reporting
// ============================================================================

/// Sink for errors the router swallows.
///
/// Handler failures never propagate out of a navigation; the view that
/// failed may have left partial content behind and the router does not roll
/// it back.
pub trait ErrorReporter: 'static {
    /// Record `error`.
    fn report(&self, error: &NavigationError);
}

/// Reports errors at error level through the crate's logging macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &NavigationError) {
        error_log!("{}", error);
    }
}

impl<F> ErrorReporter for F
where
    F: Fn(&NavigationError) + 'static,
{
    fn report(&self, error: &NavigationError) {
        self(error);
    }
}

// ============================================================================
// Tests
// ============================================================================
