//! Router state management

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolutionCache};
use crate::params::NavigationRequest;
use crate::resolve::{resolve, PrecedenceTable, Resolution};
use crate::table::{BoxedHandler, RouteTable};
use crate::trace_log;

/// The record of the last committed route.
///
/// `pattern` is the registered pattern or precedence rule that took the path.
pub type CurrentRoute = NavigationRequest;

/// A message waiting for a redirected navigation to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotice {
    /// Normalized target whose completion shows the message.
    pub target: String,
    /// Text to show.
    pub message: String,
}

/// Router state
///
/// Owned by the [`Router`](crate::Router) behind a `RefCell`; every accessor
/// here is synchronous so no borrow is held across a suspension point.
#[derive(Debug)]
pub struct RouterState {
    routes: RouteTable,
    precedence: PrecedenceTable,
    #[cfg(feature = "cache")]
    cache: ResolutionCache,
    current: Option<CurrentRoute>,
    in_flight: Option<String>,
    running: Vec<String>,
    last_change: Option<String>,
    redirect_depth: usize,
    pending_notice: Option<PendingNotice>,
}

impl RouterState {
    /// Create a new router state
    pub fn new(routes: RouteTable, precedence: PrecedenceTable) -> Self {
        Self {
            routes,
            precedence,
            #[cfg(feature = "cache")]
            cache: ResolutionCache::new(),
            current: None,
            in_flight: None,
            running: Vec::new(),
            last_change: None,
            redirect_depth: 0,
            pending_notice: None,
        }
    }

    /// Register a route
    pub fn add_route(&mut self, pattern: String, handler: BoxedHandler) {
        self.routes.add_route(pattern, handler);
        #[cfg(feature = "cache")]
        self.cache.clear();
    }

    /// Registered routes.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Precedence rules.
    pub fn precedence(&self) -> &PrecedenceTable {
        &self.precedence
    }

    /// Resolve a normalized path (with caching when enabled).
    pub fn resolve(&mut self, path: &str) -> Resolution {
        #[cfg(feature = "cache")]
        if let Some(cached) = self.cache.get(path) {
            return cached;
        }

        let resolution = resolve(path, &self.precedence, &self.routes);

        #[cfg(feature = "cache")]
        self.cache.insert(path.to_string(), resolution.clone());

        resolution
    }

    /// Resolution cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    // ------------------------------------------------------------------
    // Current route
    // ------------------------------------------------------------------

    /// Last committed route.
    pub fn current_route(&self) -> Option<&CurrentRoute> {
        self.current.as_ref()
    }

    /// Get current path
    pub fn current_path(&self) -> Option<&str> {
        self.current.as_ref().map(|route| route.path.as_str())
    }

    /// Commit `route` as current.
    pub fn commit(&mut self, route: CurrentRoute) {
        trace_log!("Committing route '{}'", route.path);
        self.current = Some(route);
    }

    // ------------------------------------------------------------------
    // In-flight target
    // ------------------------------------------------------------------

    /// Target of the navigation in flight.
    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// Mark `target` as in flight.
    ///
    /// Returns `false` if the same target already is.
    pub fn begin(&mut self, target: &str) -> bool {
        if self.in_flight.as_deref() == Some(target) {
            return false;
        }
        self.in_flight = Some(target.to_string());
        true
    }

    /// Return to idle if `target` is still the one in flight.
    ///
    /// A newer navigation to a different target keeps its mark.
    pub fn finish(&mut self, target: &str) {
        if self.in_flight.as_deref() == Some(target) {
            self.in_flight = None;
        }
    }

    // ------------------------------------------------------------------
    // Running pipelines
    // ------------------------------------------------------------------

    /// Register a pipeline for `target`.
    ///
    /// Returns `false` if one for the same target is already running.
    pub fn enter_pipeline(&mut self, target: &str) -> bool {
        if self.is_running(target) {
            return false;
        }
        self.running.push(target.to_string());
        true
    }

    /// The pipeline for `target` ended.
    pub fn leave_pipeline(&mut self, target: &str) {
        self.running.retain(|running| running != target);
    }

    /// Return `true` if a pipeline for `target` is running.
    pub fn is_running(&self, target: &str) -> bool {
        self.running.iter().any(|running| running == target)
    }

    // ------------------------------------------------------------------
    // Change notifications
    // ------------------------------------------------------------------

    /// Claim a change notification that reads `target`.
    ///
    /// Returns `false` if an earlier notification already took the same
    /// target and the router has not assigned the fragment since: the host
    /// queued several changes that all read the final fragment.
    pub fn claim_change(&mut self, target: &str) -> bool {
        if self.last_change.as_deref() == Some(target) {
            return false;
        }
        self.last_change = Some(target.to_string());
        true
    }

    /// The router assigned the fragment; a notification is on its way.
    pub fn fragment_assigned(&mut self) {
        self.last_change = None;
    }

    // ------------------------------------------------------------------
    // Redirect chain
    // ------------------------------------------------------------------

    /// Count one more redirect and return the chain length.
    pub fn push_redirect(&mut self) -> usize {
        self.redirect_depth += 1;
        self.redirect_depth
    }

    /// The chain ended.
    pub fn reset_redirects(&mut self) {
        self.redirect_depth = 0;
    }

    /// Current chain length.
    pub fn redirect_depth(&self) -> usize {
        self.redirect_depth
    }

    // ------------------------------------------------------------------
    // Deferred message
    // ------------------------------------------------------------------

    /// Show `message` once navigation to `target` finishes.
    pub fn defer_notice(&mut self, target: String, message: String) {
        self.pending_notice = Some(PendingNotice { target, message });
    }

    /// Drop the pending notice unless it belongs to `target`.
    pub fn retain_notice_for(&mut self, target: &str) {
        if self
            .pending_notice
            .as_ref()
            .is_some_and(|notice| notice.target != target)
        {
            trace_log!("Dropping stale route message");
            self.pending_notice = None;
        }
    }

    /// Take the pending notice if it belongs to `target`.
    pub fn take_notice_for(&mut self, target: &str) -> Option<String> {
        if self
            .pending_notice
            .as_ref()
            .is_some_and(|notice| notice.target == target)
        {
            self.pending_notice.take().map(|notice| notice.message)
        } else {
            None
        }
    }

    /// The pending notice, if any.
    pub fn pending_notice(&self) -> Option<&PendingNotice> {
        self.pending_notice.as_ref()
    }
}
