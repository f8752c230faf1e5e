//! Test utilities for navigation tests
//!
//! Provides fixtures, helpers, and assertion utilities for unit and integration tests.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use shell_navigator::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared log of everything the fixtures observed, in order.
#[derive(Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }
}

/// Handler that records `name` and the request it received.
pub fn recording(name: &str, calls: &Calls, requests: &Requests) -> BoxedHandler {
    let name = name.to_string();
    let calls = calls.clone();
    let requests = requests.clone();
    handler_fn(move |request| {
        calls.push(name.clone());
        requests.0.borrow_mut().push(request);
        future::ready(Ok(()))
    })
}

/// Requests seen by recording handlers.
#[derive(Clone, Default)]
pub struct Requests(Rc<RefCell<Vec<NavigationRequest>>>);

impl Requests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<NavigationRequest> {
        self.0.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Handler that fails with `message`.
pub fn failing(name: &str, calls: &Calls, message: &'static str) -> BoxedHandler {
    let name = name.to_string();
    let calls = calls.clone();
    handler_fn(move |_| {
        calls.push(name.clone());
        future::ready(Err(anyhow::anyhow!(message)))
    })
}

/// Handler that records its start, then waits until the returned sender fires.
///
/// Every activation waits on the next gate; gates are consumed in order.
pub fn gated(name: &str, calls: &Calls) -> (BoxedHandler, Gates) {
    let gates = Gates::default();
    let name = name.to_string();
    let calls = calls.clone();
    let pending = gates.clone();
    let handler = handler_fn(move |_| {
        calls.push(format!("{name}:start"));
        let (tx, rx) = oneshot::channel::<()>();
        pending.0.borrow_mut().push(tx);
        let calls = calls.clone();
        let name = name.clone();
        async move {
            let _ = rx.await;
            calls.push(format!("{name}:end"));
            Ok(())
        }
    });
    (handler, gates)
}

/// Release handles of a gated handler.
#[derive(Clone, Default)]
pub struct Gates(Rc<RefCell<Vec<oneshot::Sender<()>>>>);

impl Gates {
    /// Open the oldest waiting gate.
    pub fn open(&self) {
        let sender = self.0.borrow_mut().remove(0);
        let _ = sender.send(());
    }

    pub fn waiting(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Guard answering from a fixed table; unknown paths are allowed.
#[derive(Clone, Default)]
pub struct ScriptedGuard {
    decisions: Rc<RefCell<HashMap<String, GuardDecision>>>,
    pub checked: Calls,
}

impl ScriptedGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, path: &str, decision: GuardDecision) -> Self {
        self.decisions
            .borrow_mut()
            .insert(path.to_string(), decision);
        self
    }
}

impl RouteGuard for ScriptedGuard {
    fn check_route(&self, path: &str) -> LocalBoxFuture<'static, GuardDecision> {
        self.checked.push(path);
        let decision = self
            .decisions
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(GuardDecision::allow);
        future::ready(decision).boxed_local()
    }

    fn name(&self) -> &'static str {
        "ScriptedGuard"
    }
}

/// View loader recording `module.entry(args)`.
#[derive(Clone, Default)]
pub struct RecordingViews(pub Calls);

impl ViewLoader for RecordingViews {
    fn load(&self, view: &DefaultView, args: Vec<String>) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        self.0
            .push(format!("{}.{}({})", view.module, view.entry, args.join(", ")));
        future::ready(Ok(())).boxed_local()
    }
}

/// Errors seen by the router's reporter.
#[derive(Clone, Default)]
pub struct Reported(Rc<RefCell<Vec<NavigationError>>>);

impl Reported {
    pub fn reporter(&self) -> impl ErrorReporter {
        let sink = self.0.clone();
        move |error: &NavigationError| sink.borrow_mut().push(error.clone())
    }

    pub fn all(&self) -> Vec<NavigationError> {
        self.0.borrow().clone()
    }
}

/// A router over an in-memory location, with its change listener spawned on
/// a local pool.
pub struct Harness {
    pub router: Router,
    pub location: MemoryLocation,
    pub messages: MemoryMessageHost,
    pub surface: MemorySurface,
    pub reported: Reported,
    pub pool: LocalPool,
}

impl Harness {
    /// Build with `configure` applied to a builder that already carries the
    /// in-memory surfaces.
    pub fn new(configure: impl FnOnce(RouterBuilder) -> RouterBuilder) -> Self {
        Self::at("", configure)
    }

    /// Same as [`Harness::new`], starting at `fragment`.
    pub fn at(fragment: &str, configure: impl FnOnce(RouterBuilder) -> RouterBuilder) -> Self {
        init_logging();
        let (location, changes) = MemoryLocation::with_fragment(fragment);
        let messages = MemoryMessageHost::new();
        let surface = MemorySurface::new();
        let reported = Reported::default();

        let builder = Router::builder(location.clone())
            .message_host(messages.clone())
            .surface(surface.clone())
            .reporter(reported.reporter());
        let router = configure(builder).build();

        let pool = LocalPool::new();
        pool.spawner()
            .spawn_local(router.listen(changes))
            .expect("spawn listener");

        Self {
            router,
            location,
            messages,
            surface,
            reported,
            pool,
        }
    }

    /// Start a navigation on the pool without waiting for it.
    pub fn spawn_navigate(&self, target: &str) -> Rc<RefCell<Option<NavigationResult>>> {
        let slot = Rc::new(RefCell::new(None));
        let out = Rc::clone(&slot);
        let navigation = self.router.navigate(target);
        self.pool
            .spawner()
            .spawn_local(async move {
                *out.borrow_mut() = Some(navigation.await);
            })
            .expect("spawn navigation");
        slot
    }

    /// Navigate and run until nothing can make progress.
    pub fn navigate(&mut self, target: &str) -> NavigationResult {
        let result = self.pool.run_until(self.router.navigate(target));
        self.pool.run_until_stalled();
        result
    }

    /// Change the fragment as the user would (address bar, back button).
    pub fn visit(&mut self, fragment: &str) {
        self.location.set_fragment(fragment);
        self.pool.run_until_stalled();
    }

    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn current_path(&self) -> Option<String> {
        self.router.current_path()
    }

    pub fn message(&self) -> Option<String> {
        self.messages.visible_text()
    }
}

/// Assert that route parameters contain expected key-value pair
pub fn assert_param_equals(params: &RouteParams, key: &str, expected: &str) {
    let value = params.get(key);
    assert!(
        value.is_some(),
        "Parameter '{}' not found in RouteParams",
        key
    );
    assert_eq!(
        value.unwrap(),
        expected,
        "Parameter '{}' has wrong value",
        key
    );
}

/// Create RouteParams with multiple key-value pairs
pub fn params_with_multiple(pairs: Vec<(&str, &str)>) -> RouteParams {
    let mut params = RouteParams::new();
    for (key, value) in pairs {
        params.insert(key.to_string(), value.to_string());
    }
    params
}

/// Send router logs to the test output; `RUST_LOG=debug` shows the pipeline.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Handler that does nothing.
pub fn noop() -> BoxedHandler {
    handler_fn(|_| future::ready(Ok(())))
}
