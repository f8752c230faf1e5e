//! The route table: registered patterns and their activation callbacks.
//!
//! Pure data. The table stores one handler per pattern string, replacing an
//! earlier registration of the identical string. Lookup is by exact pattern
//! string; deciding which pattern a concrete path belongs to is done by the
//! [`resolve`](crate::resolve) module.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{handler_fn, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.add_route("/courses/:id", handler_fn(|_request| async { Ok(()) }));
//!
//! assert!(table.lookup("/courses/:id").is_some());
//! assert!(table.lookup("/courses/abc").is_none());
//! ```

use crate::info_log;
use crate::params::NavigationRequest;
use futures::future::{FutureExt, LocalBoxFuture};
use std::future::Future;
use std::rc::Rc;

// ============================================================================
// RouteHandler trait
// ============================================================================

/// An activation callback for a resolved route.
///
/// Handlers are view components: they locate their own mount point and
/// render into it. They run on the UI thread, so the returned future does not
/// need to be `Send`. A handler may call back into the router (for example
/// to navigate further); the router never holds internal borrows while a
/// handler runs.
///
/// Closures implement this trait directly; see [`handler_fn`].
pub trait RouteHandler: 'static {
    /// Activate the view for `request`.
    fn activate(&self, request: NavigationRequest) -> LocalBoxFuture<'static, anyhow::Result<()>>;
}

impl<F, Fut> RouteHandler for F
where
    F: Fn(NavigationRequest) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    fn activate(&self, request: NavigationRequest) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        self(request).boxed_local()
    }
}

/// Shared handle to a registered handler.
pub type BoxedHandler = Rc<dyn RouteHandler>;

/// Box a closure as a [`BoxedHandler`].
///
/// ```
/// use shell_navigator::handler_fn;
///
/// let show_course = handler_fn(|request| async move {
///     let _id = request.params.get("id").cloned();
///     Ok(())
/// });
/// # let _ = show_course;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(NavigationRequest) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    Rc::new(f)
}

// ============================================================================
// RouteTable
// ============================================================================

/// Mapping from pattern string to handler.
///
/// Registration order is kept only as a last tie-breaker for generic
/// matching; it never gives one pattern precedence over a more specific one.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, BoxedHandler)>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `pattern`.
    ///
    /// Registering the same pattern string again replaces the earlier
    /// handler.
    pub fn add_route(&mut self, pattern: impl Into<String>, handler: BoxedHandler) {
        let pattern = pattern.into();
        if let Some(slot) = self.routes.iter_mut().find(|(p, _)| *p == pattern) {
            info_log!("Replaced handler for route '{}'", pattern);
            slot.1 = handler;
        } else {
            info_log!("Registered route '{}'", pattern);
            self.routes.push((pattern, handler));
        }
    }

    /// Handler registered for exactly this pattern string.
    pub fn lookup(&self, pattern: &str) -> Option<BoxedHandler> {
        self.routes
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, handler)| Rc::clone(handler))
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}
