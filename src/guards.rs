//! The guard adapter: the router's seam to the access-control predicate.
//!
//! The router hands a guard the normalized path of every navigation attempt
//! and waits for a [`GuardDecision`] before it commits anything. It never asks
//! *why* a decision was made; only the three fields of the decision matter.
//!
//! Guards are **asynchronous** (a session lookup or an allocation check may
//! hit the backend) and run on the UI thread, so their futures are not
//! required to be `Send`.
//!
//! # Composition
//!
//! | Type | Logic |
//! |------|-------|
//! | [`AllowAll`] | Always allows (the default when no guard is configured) |
//! | [`FnGuard`] / [`guard_fn`] | Closure returning a future |
//! | [`Guards`] | AND: guards run in priority order, the first non-allowing decision wins |
//!
//! # Example
//!
//! ```
//! use shell_navigator::{guard_fn, GuardDecision, RouteGuard};
//!
//! let guard = guard_fn(|path: String| async move {
//!     if path.starts_with("/admin") {
//!         GuardDecision::redirect_with_message("/login", "Please login to access this page")
//!     } else {
//!         GuardDecision::allow()
//!     }
//! });
//!
//! let decision = pollster::block_on(guard.check_route("/admin/dashboard"));
//! assert!(!decision.allowed);
//! assert_eq!(decision.redirect.as_deref(), Some("/login"));
//! ```

use futures::future::{self, FutureExt, LocalBoxFuture};
use std::future::Future;

// ============================================================================
// GuardDecision
// ============================================================================

/// Outcome of a guard check.
///
/// When `allowed` is `false` and `redirect` is set, the router performs
/// exactly one follow-up navigation to `redirect`. When `allowed` is `false`
/// without a redirect, nothing is activated. `message` is shown on the
/// advisory channel in both cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardDecision {
    /// Whether navigation may proceed.
    pub allowed: bool,
    /// Where to go instead, when not allowed.
    pub redirect: Option<String>,
    /// User-facing explanation.
    pub message: Option<String>,
}

impl GuardDecision {
    /// Allow navigation to proceed.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            ..Self::default()
        }
    }

    /// Block navigation without a redirect or message.
    pub fn deny() -> Self {
        Self::default()
    }

    /// Block navigation and explain why.
    pub fn deny_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Block navigation and go to `to` instead.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            redirect: Some(to.into()),
            ..Self::default()
        }
    }

    /// Block navigation, go to `to` instead, and explain why.
    pub fn redirect_with_message(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            redirect: Some(to.into()),
            message: Some(message.into()),
        }
    }

    /// Redirect target, if this decision redirects.
    pub fn redirect_path(&self) -> Option<&str> {
        if self.allowed {
            None
        } else {
            self.redirect.as_deref()
        }
    }
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Access-control predicate consulted before every navigation.
///
/// # Example
///
/// ```
/// use futures::future::{self, FutureExt, LocalBoxFuture};
/// use shell_navigator::{GuardDecision, RouteGuard};
///
/// struct PendingAccount;
///
/// impl RouteGuard for PendingAccount {
///     fn check_route(&self, path: &str) -> LocalBoxFuture<'static, GuardDecision> {
///         let decision = if path == "/account-status" {
///             GuardDecision::allow()
///         } else {
///             GuardDecision::redirect_with_message(
///                 "/account-status",
///                 "Your account is pending admin approval.",
///             )
///         };
///         future::ready(decision).boxed_local()
///     }
/// }
/// ```
pub trait RouteGuard: 'static {
    /// Decide whether navigation to `path` may proceed.
    fn check_route(&self, path: &str) -> LocalBoxFuture<'static, GuardDecision>;

    /// Guard name for logs.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Priority inside a [`Guards`] composition. Higher runs first.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// AllowAll
// ============================================================================

/// Guard that allows every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RouteGuard for AllowAll {
    fn check_route(&self, _path: &str) -> LocalBoxFuture<'static, GuardDecision> {
        future::ready(GuardDecision::allow()).boxed_local()
    }

    fn name(&self) -> &'static str {
        "AllowAll"
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a closure that receives the owned path.
pub const fn guard_fn<F, Fut>(f: F) -> FnGuard<F>
where
    F: Fn(String) -> Fut + 'static,
    Fut: Future<Output = GuardDecision> + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

impl<F, Fut> RouteGuard for FnGuard<F>
where
    F: Fn(String) -> Fut + 'static,
    Fut: Future<Output = GuardDecision> + 'static,
{
    fn check_route(&self, path: &str) -> LocalBoxFuture<'static, GuardDecision> {
        (self.f)(path.to_string()).boxed_local()
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// Guards run one after another in priority order (higher first); the first
/// decision that does not allow is returned and the rest are skipped.
///
/// ```
/// use shell_navigator::{guard_fn, GuardDecision, Guards, RouteGuard};
///
/// let guards = Guards::builder()
///     .guard(guard_fn(|_| async { GuardDecision::allow() }))
///     .guard(guard_fn(|_| async { GuardDecision::redirect("/login") }))
///     .build();
///
/// let decision = pollster::block_on(guards.check_route("/courses"));
/// assert_eq!(decision.redirect_path(), Some("/login"));
/// ```
pub struct Guards {
    guards: Vec<std::rc::Rc<dyn RouteGuard>>,
}

impl Guards {
    /// Create a new AND composition, sorted by priority.
    #[must_use]
    pub fn new(mut guards: Vec<std::rc::Rc<dyn RouteGuard>>) -> Self {
        guards.sort_by_key(|g| std::cmp::Reverse(g.priority()));
        Self { guards }
    }

    /// Start building a guard composition.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }
}

impl RouteGuard for Guards {
    fn check_route(&self, path: &str) -> LocalBoxFuture<'static, GuardDecision> {
        let guards = self.guards.clone();
        let path = path.to_string();
        async move {
            for guard in guards {
                let decision = guard.check_route(&path).await;
                if !decision.allowed {
                    crate::debug_log!("Guard '{}' did not allow '{}'", guard.name(), path);
                    return decision;
                }
            }
            GuardDecision::allow()
        }
        .boxed_local()
    }

    fn name(&self) -> &'static str {
        "Guards"
    }

    fn priority(&self) -> i32 {
        self.guards.iter().map(|g| g.priority()).max().unwrap_or(0)
    }
}

/// Builder for [`Guards`] with fluent API.
#[must_use]
#[derive(Default)]
pub struct GuardBuilder {
    guards: Vec<std::rc::Rc<dyn RouteGuard>>,
}

impl GuardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guard to the composition.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(std::rc::Rc::new(guard));
        self
    }

    /// Build the final [`Guards`].
    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

// ============================================================================
// Tests
// ============================================================================
