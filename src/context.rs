//! The navigation controller.
//!
//! [`Router`] owns the [`RouterState`], the message channel and every host
//! surface, and orchestrates the full pipeline for each location change:
//!
//! ```text
//! fragment → parse → clear message → guard ─┬─ allow ─→ resolve → commit → leave → handler → enter
//!                                           ├─ redirect → navigate(redirect) → message
//!                                           └─ deny ───→ message
//! ```
//!
//! # Entry points
//!
//! - [`Router::navigate`] — programmatic navigation. Assigns the fragment if
//!   it differs (the host's change notification then drives the pipeline) or
//!   runs the pipeline directly if it does not.
//! - [`Router::handle_location_change`] — runs the pipeline for the current
//!   fragment.
//! - [`Router::listen`] — the passive entry point: one pipeline per change
//!   notification. Notifications queued behind an assignment all read the
//!   final fragment, so only the first of them runs.
//! - [`Router::start`] — handle the initial fragment.
//!
//! # Concurrency
//!
//! Everything runs on one thread. A second navigation to the target already
//! in flight is dropped, and so is a second pipeline for a target whose
//! pipeline is still running; a navigation to a different target proceeds
//! alongside it and the later commit wins. Nothing is queued or cancelled.
//! Handlers may call back into the router at any time.
//!
//! # Example
//!
//! ```
//! use futures::executor::LocalPool;
//! use futures::task::LocalSpawnExt;
//! use shell_navigator::{handler_fn, Location, MemoryLocation, NavigationResult, Router};
//!
//! let (location, changes) = MemoryLocation::new();
//! let router = Router::builder(location.clone())
//!     .route("/courses/:id", handler_fn(|_request| async { Ok(()) }))
//!     .build();
//!
//! let mut pool = LocalPool::new();
//! pool.spawner().spawn_local(router.listen(changes)).unwrap();
//!
//! let result = pool.run_until(router.navigate("/courses/abc123"));
//! assert!(matches!(result, NavigationResult::Scheduled { .. }));
//!
//! pool.run_until_stalled();
//! assert_eq!(location.fragment(), "/courses/abc123");
//! assert_eq!(router.current_path().as_deref(), Some("/courses/abc123"));
//! ```

#[cfg(feature = "cache")]
use crate::cache::CacheStats;
use crate::config::RouterConfig;
use crate::defaults::{DefaultRoute, RoleHome};
use crate::error::{ErrorReporter, LogReporter, NavigationError, NavigationResult};
use crate::guards::{AllowAll, GuardDecision, RouteGuard};
use crate::location::Location;
use crate::matching::{normalize_target, parse_fragment};
use crate::message::{MessageChannel, MessageHost, NoMessageHost};
use crate::params::NavigationRequest;
use crate::resolve::{DefaultView, PrecedenceTable, Resolution, ViewLoader};
use crate::state::{CurrentRoute, RouterState};
use crate::table::{BoxedHandler, RouteTable};
use crate::transition::{NoDelay, NoTransition, Timer, TransitionSurface};
use crate::{debug_log, info_log, trace_log, warn_log};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::{Stream, StreamExt};
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

// ============================================================================
// Router
// ============================================================================

/// Hash-fragment navigation controller.
///
/// Cheap to clone; clones share the same state. Entry points return
/// `'static` futures, so they can be spawned on a local executor or awaited
/// from inside a handler.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

struct RouterInner {
    state: RefCell<RouterState>,
    messages: RefCell<MessageChannel>,
    location: Rc<dyn Location>,
    guard: Rc<dyn RouteGuard>,
    views: Option<Rc<dyn ViewLoader>>,
    default_route: Rc<dyn DefaultRoute>,
    surface: Rc<dyn TransitionSurface>,
    timer: Rc<dyn Timer>,
    reporter: Rc<dyn ErrorReporter>,
    config: RouterConfig,
}

/// Where a pipeline run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// `navigate`, `start` or a direct host call.
    Direct,
    /// A change notification from [`Router::listen`].
    Notified,
}

/// What a successful resolution activates.
enum Activation {
    Handler(BoxedHandler),
    View {
        loader: Rc<dyn ViewLoader>,
        view: DefaultView,
        args: Vec<String>,
    },
}

impl Router {
    /// Start configuring a router over `location`.
    pub fn builder(location: impl Location) -> RouterBuilder {
        RouterBuilder::new(location)
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Navigate to `target`.
    ///
    /// `target` is normalized first (`#` stripped, slashes collapsed, a
    /// trailing slash dropped). Returns [`NavigationResult::Duplicate`] if a
    /// navigation to the same target is in flight, and
    /// [`NavigationResult::Scheduled`] if the fragment was assigned and the
    /// host will deliver the change.
    pub fn navigate(&self, target: impl Into<String>) -> LocalBoxFuture<'static, NavigationResult> {
        let router = self.clone();
        let raw = target.into();
        async move { router.navigate_inner(raw).await }.boxed_local()
    }

    /// Run the pipeline for the current fragment.
    pub fn handle_location_change(&self) -> LocalBoxFuture<'static, NavigationResult> {
        let router = self.clone();
        async move { router.handle_change(Trigger::Direct).await }.boxed_local()
    }

    /// Process the fragment the page was loaded with.
    pub fn start(&self) -> LocalBoxFuture<'static, NavigationResult> {
        info_log!(
            "Router starting at '{}' ({} routes)",
            self.inner.location.fragment(),
            self.inner.state.borrow().routes().len()
        );
        self.handle_location_change()
    }

    /// Run the pipeline for each notification on a stream of fragment changes.
    ///
    /// Notifications are handled concurrently: a slow handler never holds up
    /// the next change. A notification is skipped, with
    /// [`NavigationResult::Duplicate`], when its target's pipeline is still
    /// running or when an earlier notification already took the same fragment
    /// and the router has not assigned a new one since. Completes when the
    /// stream ends.
    pub fn listen<S>(&self, changes: S) -> LocalBoxFuture<'static, ()>
    where
        S: Stream<Item = ()> + 'static,
    {
        let router = self.clone();
        changes
            .for_each_concurrent(None, move |()| {
                let router = router.clone();
                async move {
                    let result = router.handle_change(Trigger::Notified).await;
                    trace_log!("Location change handled: {:?}", result);
                }
            })
            .boxed_local()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register `handler` for `pattern`, replacing an earlier registration of
    /// the same pattern.
    pub fn add_route(&self, pattern: impl Into<String>, handler: BoxedHandler) {
        self.state_mut().add_route(pattern.into(), handler);
    }

    // ------------------------------------------------------------------
    // Message channel
    // ------------------------------------------------------------------

    /// Show `text` on the advisory channel.
    pub fn show_message(&self, text: &str) {
        self.inner.messages.borrow_mut().show(text);
    }

    /// Hide the advisory channel.
    pub fn clear_message(&self) {
        self.inner.messages.borrow_mut().clear();
    }

    /// The advisory message currently shown.
    pub fn message(&self) -> Option<String> {
        self.inner.messages.borrow().current().map(str::to_string)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Last committed route.
    pub fn current_route(&self) -> Option<CurrentRoute> {
        self.inner.state.borrow().current_route().cloned()
    }

    /// Path of the last committed route.
    pub fn current_path(&self) -> Option<String> {
        self.inner.state.borrow().current_path().map(str::to_string)
    }

    /// Target of the navigation in flight.
    pub fn in_flight(&self) -> Option<String> {
        self.inner.state.borrow().in_flight().map(str::to_string)
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .routes()
            .patterns()
            .map(str::to_string)
            .collect()
    }

    /// Resolve `path` without navigating.
    pub fn resolve(&self, path: &str) -> Resolution {
        self.state_mut().resolve(&parse_fragment(path).path)
    }

    /// Configuration the router was built with.
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// Resolution cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.state.borrow().cache_stats().clone()
    }

    fn state_mut(&self) -> RefMut<'_, RouterState> {
        self.inner.state.borrow_mut()
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    async fn navigate_inner(&self, raw: String) -> NavigationResult {
        let target = normalize_target(&raw);

        {
            let mut state = self.state_mut();
            if !state.begin(&target) {
                debug_log!("Already navigating to '{}', skipping duplicate", target);
                return NavigationResult::Duplicate { path: target };
            }
            state.retain_notice_for(&target);
        }

        let current = normalize_target(&self.inner.location.fragment());
        if current != target {
            debug_log!("Navigating '{}' → '{}'", current, target);
            self.state_mut().fragment_assigned();
            self.inner.location.set_fragment(&target);
            return NavigationResult::Scheduled { path: target };
        }

        debug_log!("Fragment already at '{}', dispatching directly", target);
        self.handle_change(Trigger::Direct).await
    }

    async fn handle_change(&self, trigger: Trigger) -> NavigationResult {
        let raw = self.inner.location.fragment();
        let target = normalize_target(&raw);
        {
            let mut state = self.state_mut();
            if trigger == Trigger::Notified && !state.claim_change(&target) {
                debug_log!("Change to '{}' already taken, skipping", target);
                return NavigationResult::Duplicate { path: target };
            }
            if !state.enter_pipeline(&target) {
                debug_log!("Already handling '{}', skipping duplicate", target);
                return NavigationResult::Duplicate { path: target };
            }
        }
        let request = parse_fragment(&raw);
        let _idle = IdleOnDrop {
            inner: Rc::clone(&self.inner),
            target: target.clone(),
        };

        self.state_mut().retain_notice_for(&target);
        self.clear_message();
        debug_log!("Handling route change '{}' → '{}'", raw, request.path);

        let decision = self.inner.guard.check_route(&request.path).await;
        debug_log!("Guard decision for '{}': {:?}", request.path, decision);

        let result = if decision.allowed {
            self.activate(request).await
        } else {
            self.refuse(&request.path, decision).await
        };

        let notice = self.state_mut().take_notice_for(&target);
        if let Some(message) = notice {
            self.show_message(&message);
        }
        result
    }

    async fn refuse(&self, path: &str, decision: GuardDecision) -> NavigationResult {
        let GuardDecision {
            redirect, message, ..
        } = decision;

        let Some(to) = redirect else {
            self.state_mut().reset_redirects();
            if let Some(message) = &message {
                self.show_message(message);
            }
            debug_log!("{}", NavigationError::GuardDenied { path: path.to_string() });
            return NavigationResult::Blocked {
                message,
                redirect: None,
            };
        };

        if let Err(error) = self.count_redirect(&to) {
            return self.fail(error);
        }

        info_log!("Guard redirecting '{}' → '{}'", path, to);
        let outcome = self.navigate(to.clone()).await;

        if let Some(message) = &message {
            match outcome {
                NavigationResult::Scheduled { .. } | NavigationResult::Duplicate { .. } => {
                    self.state_mut()
                        .defer_notice(normalize_target(&to), message.clone());
                }
                _ => self.show_message(message),
            }
        }

        match outcome {
            NavigationResult::Error(error @ NavigationError::RedirectLoop { .. }) => {
                NavigationResult::Error(error)
            }
            _ => NavigationResult::Blocked {
                message,
                redirect: Some(to),
            },
        }
    }

    async fn activate(&self, mut request: NavigationRequest) -> NavigationResult {
        let resolution = self.state_mut().resolve(&request.path);

        match resolution {
            Resolution::Registered {
                pattern,
                handler,
                params,
                rule,
            } => {
                trace_log!("'{}' resolved to '{}' (rule {:?})", request.path, pattern, rule);
                request.pattern = Some(pattern);
                request.params = params;
                self.transition(request, Activation::Handler(handler)).await
            }
            Resolution::DefaultView {
                rule,
                view,
                args,
                params,
            } => {
                let Some(loader) = self.inner.views.clone() else {
                    debug_log!("No view loader for default view '{}'", view.module);
                    return self.not_found(request.path);
                };
                request.pattern = Some(rule);
                request.params = params;
                self.transition(request, Activation::View { loader, view, args })
                    .await
            }
            Resolution::Redirect { rule, to } => {
                info_log!("Rule '{}' redirecting '{}' → '{}'", rule, request.path, to);
                self.forward(to).await
            }
            Resolution::RoleDefault => {
                let to = self.inner.default_route.default_route().await;
                info_log!("No route for '/', continuing at role default '{}'", to);
                self.forward(to).await
            }
            Resolution::Unmatched => self.not_found(request.path),
        }
    }

    /// Continue at `to` after a rule redirect or the role default.
    async fn forward(&self, to: String) -> NavigationResult {
        if let Err(error) = self.count_redirect(&to) {
            return self.fail(error);
        }
        match self.navigate(to.clone()).await {
            NavigationResult::Error(error @ NavigationError::RedirectLoop { .. }) => {
                NavigationResult::Error(error)
            }
            _ => NavigationResult::Redirected { to },
        }
    }

    async fn transition(&self, request: NavigationRequest, activation: Activation) -> NavigationResult {
        let path = request.path.clone();
        {
            let mut state = self.state_mut();
            state.reset_redirects();
            state.commit(request.clone());
        }
        info_log!("Activating '{}'", path);

        let timing = self.inner.config.transition;
        self.inner.surface.leave();
        if !timing.leave_delay.is_zero() {
            self.inner.timer.sleep(timing.leave_delay).await;
        }

        let outcome = match activation {
            Activation::Handler(handler) => handler.activate(request).await,
            Activation::View { loader, view, args } => loader.load(&view, args).await,
        };

        self.inner.surface.enter(timing.enter_hold);

        match outcome {
            Ok(()) => {
                debug_log!("Route '{}' activated", path);
                NavigationResult::Success { path }
            }
            Err(cause) => self.fail(NavigationError::handler_failed(path, cause)),
        }
    }

    fn not_found(&self, path: String) -> NavigationResult {
        self.state_mut().reset_redirects();
        debug_log!(
            "{}, keeping current view",
            NavigationError::RouteNotFound { path: path.clone() }
        );
        NavigationResult::NotFound { path }
    }

    fn count_redirect(&self, to: &str) -> Result<(), NavigationError> {
        let mut state = self.state_mut();
        let depth = state.push_redirect();
        if depth > self.inner.config.max_redirect_depth {
            state.reset_redirects();
            return Err(NavigationError::RedirectLoop {
                path: normalize_target(to),
                depth: depth - 1,
            });
        }
        Ok(())
    }

    fn fail(&self, error: NavigationError) -> NavigationResult {
        self.inner.reporter.report(&error);
        if matches!(error, NavigationError::RedirectLoop { .. }) {
            self.show_message(&error.to_string());
        }
        NavigationResult::Error(error)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("state", &self.inner.state)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Returns the router to idle when a change has been handled, whichever way
/// the pipeline exits.
struct IdleOnDrop {
    inner: Rc<RouterInner>,
    target: String,
}

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        match self.inner.state.try_borrow_mut() {
            Ok(mut state) => {
                state.finish(&self.target);
                state.leave_pipeline(&self.target);
            }
            Err(_) => {
                warn_log!("Router state busy, '{}' stays in flight", self.target);
            }
        }
    }
}

// ============================================================================
// RouterBuilder
// ============================================================================

/// Builder for [`Router`].
///
/// Every collaborator has a headless default: [`AllowAll`], no view loader,
/// [`RoleHome::signed_out`], [`NoTransition`], [`NoDelay`], [`LogReporter`],
/// [`NoMessageHost`], and the [`PrecedenceTable::lms`] rule set.
#[must_use]
pub struct RouterBuilder {
    location: Rc<dyn Location>,
    routes: RouteTable,
    precedence: PrecedenceTable,
    guard: Rc<dyn RouteGuard>,
    views: Option<Rc<dyn ViewLoader>>,
    default_route: Rc<dyn DefaultRoute>,
    surface: Rc<dyn TransitionSurface>,
    timer: Rc<dyn Timer>,
    reporter: Rc<dyn ErrorReporter>,
    message_host: Rc<dyn MessageHost>,
    config: RouterConfig,
}

impl RouterBuilder {
    /// Builder over `location` with default collaborators.
    pub fn new(location: impl Location) -> Self {
        Self {
            location: Rc::new(location),
            routes: RouteTable::new(),
            precedence: PrecedenceTable::lms(),
            guard: Rc::new(AllowAll),
            views: None,
            default_route: Rc::new(RoleHome::signed_out()),
            surface: Rc::new(NoTransition),
            timer: Rc::new(NoDelay),
            reporter: Rc::new(LogReporter),
            message_host: Rc::new(NoMessageHost),
            config: RouterConfig::default(),
        }
    }

    /// Register a route.
    pub fn route(mut self, pattern: impl Into<String>, handler: BoxedHandler) -> Self {
        self.routes.add_route(pattern, handler);
        self
    }

    /// Replace the precedence rules.
    pub fn precedence(mut self, precedence: PrecedenceTable) -> Self {
        self.precedence = precedence;
        self
    }

    /// Guard consulted before every navigation.
    pub fn guard(mut self, guard: impl RouteGuard) -> Self {
        self.guard = Rc::new(guard);
        self
    }

    /// Loader for family default views.
    pub fn views(mut self, loader: impl ViewLoader) -> Self {
        self.views = Some(Rc::new(loader));
        self
    }

    /// Destination for an unmatched root path.
    pub fn default_route(mut self, default_route: impl DefaultRoute) -> Self {
        self.default_route = Rc::new(default_route);
        self
    }

    /// Main container surface for page transitions.
    pub fn surface(mut self, surface: impl TransitionSurface) -> Self {
        self.surface = Rc::new(surface);
        self
    }

    /// Timer used for the leave delay.
    pub fn timer(mut self, timer: impl Timer) -> Self {
        self.timer = Rc::new(timer);
        self
    }

    /// Sink for handler failures and redirect loops.
    pub fn reporter(mut self, reporter: impl ErrorReporter) -> Self {
        self.reporter = Rc::new(reporter);
        self
    }

    /// Host that creates the advisory message slot.
    pub fn message_host(mut self, host: impl MessageHost) -> Self {
        self.message_host = Rc::new(host);
        self
    }

    /// Router configuration.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the router.
    pub fn build(self) -> Router {
        info_log!(
            "Router built with {} routes and {} precedence rules",
            self.routes.len(),
            self.precedence.len()
        );
        let messages = MessageChannel::new(
            self.message_host,
            self.config.container_id.clone(),
            self.config.message_slot_id.clone(),
        );
        Router {
            inner: Rc::new(RouterInner {
                state: RefCell::new(RouterState::new(self.routes, self.precedence)),
                messages: RefCell::new(messages),
                location: self.location,
                guard: self.guard,
                views: self.views,
                default_route: self.default_route,
                surface: self.surface,
                timer: self.timer,
                reporter: self.reporter,
                config: self.config,
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
