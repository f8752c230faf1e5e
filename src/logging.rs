//! Logging abstraction layer.
//!
//! The router never talks to a logging backend directly. It goes through the
//! macros below, which forward to either [`log`](https://docs.rs/log) or
//! [`tracing`](https://docs.rs/tracing) depending on the enabled feature.
//! Enable at most one of the two.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Every record is emitted under the [`LOG_TARGET`] target, so a host
//! application can silence or raise the router's verbosity on its own, e.g.
//! `RUST_LOG=shell_navigator=debug`.
//!
//! | Level   | Emitted for |
//! |---------|-------------|
//! | `trace` | rule evaluation, cache hits |
//! | `debug` | guard decisions, duplicate suppression, unmatched paths |
//! | `info`  | route registration, committed navigations |
//! | `warn`  | missing message host, redirect depth exhaustion |
//! | `error` | handler failures |
//!
//! ```ignore
//! use shell_navigator::{debug_log, error_log};
//!
//! debug_log!("Guard allowed '{}'", path);
//! error_log!("Handler for '{}' failed: {}", path, err);
//! ```

/// Target used for every record the router emits.
pub const LOG_TARGET: &str = "shell_navigator";

/// Emit a **trace**-level record under [`LOG_TARGET`].
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **debug**-level record under [`LOG_TARGET`].
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **info**-level record under [`LOG_TARGET`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **warn**-level record under [`LOG_TARGET`].
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **error**-level record under [`LOG_TARGET`].
///
/// Used for failures the router swallows (a view handler that returned an
/// error), so they are never silent.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}
