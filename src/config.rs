//! Router configuration.

use crate::transition::TransitionConfig;
use std::time::Duration;

/// Maximum number of chained redirects before navigation stops.
pub const DEFAULT_MAX_REDIRECT_DEPTH: usize = 5;

/// Settings of a [`Router`](crate::Router).
///
/// ```
/// use shell_navigator::RouterConfig;
/// use std::time::Duration;
///
/// let config = RouterConfig::new()
///     .leave_delay(Duration::ZERO)
///     .max_redirect_depth(3);
///
/// assert_eq!(config.container_id, "app-container");
/// assert_eq!(config.message_slot_id, "route-message");
/// assert_eq!(config.transition.enter_hold, Duration::from_millis(300));
/// assert_eq!(config.max_redirect_depth, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RouterConfig {
    /// Id of the main content container.
    pub container_id: String,
    /// Id of the advisory message slot.
    pub message_slot_id: String,
    /// Page transition timing.
    pub transition: TransitionConfig,
    /// Chained redirects allowed before [`RedirectLoop`](crate::NavigationError::RedirectLoop).
    pub max_redirect_depth: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            container_id: "app-container".to_string(),
            message_slot_id: "route-message".to_string(),
            transition: TransitionConfig::default(),
            max_redirect_depth: DEFAULT_MAX_REDIRECT_DEPTH,
        }
    }
}

impl RouterConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main container id.
    pub fn container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    /// Set the message slot id.
    pub fn message_slot_id(mut self, id: impl Into<String>) -> Self {
        self.message_slot_id = id.into();
        self
    }

    /// Set the pause between the leaving mark and the handler.
    pub fn leave_delay(mut self, delay: Duration) -> Self {
        self.transition.leave_delay = delay;
        self
    }

    /// Set how long the entering mark stays on.
    pub fn enter_hold(mut self, hold: Duration) -> Self {
        self.transition.enter_hold = hold;
        self
    }

    /// Set the redirect chain limit.
    pub fn max_redirect_depth(mut self, depth: usize) -> Self {
        self.max_redirect_depth = depth;
        self
    }
}
