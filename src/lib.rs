//! # Shell Navigator
//!
//! A hash-fragment navigation engine for single-page learning-management
//! shells, with support for:
//!
//! - **Precedence Resolution** - An explicit priority table decides which
//!   handler owns structurally ambiguous paths (`/courses/my-courses` vs
//!   `/courses/:id`), independent of registration order
//! - **Route Guards** - Asynchronous allow / deny / redirect decisions with a
//!   user-facing message
//! - **Race-tolerant Transitions** - Duplicate navigations collapse, different
//!   targets supersede, the in-flight mark always resets
//! - **Default Views** - Resource families fall back to documented views when
//!   no handler is registered
//! - **Role Homes** - An unmatched root path continues at the user's home route
//!
//! The engine is headless: the location fragment, the message slot, the page
//! transition marks, and timers are traits implemented by the host.
//!
//! # Quick Start
//!
//! ```
//! use futures::executor::LocalPool;
//! use futures::task::LocalSpawnExt;
//! use shell_navigator::*;
//!
//! let (location, changes) = MemoryLocation::new();
//! let router = Router::builder(location)
//!     .route("/courses/:id", handler_fn(|request| async move {
//!         println!("showing course {:?}", request.params.get("id"));
//!         Ok(())
//!     }))
//!     .route("/login", handler_fn(|_| async { Ok(()) }))
//!     .guard(guard_fn(|path: String| async move {
//!         if path.starts_with("/courses") {
//!             GuardDecision::redirect_with_message("/login", "Please login to access this page")
//!         } else {
//!             GuardDecision::allow()
//!         }
//!     }))
//!     .build();
//!
//! let mut pool = LocalPool::new();
//! pool.spawner().spawn_local(router.listen(changes)).unwrap();
//!
//! pool.run_until(router.navigate("/courses/abc123"));
//! pool.run_until_stalled();
//!
//! assert_eq!(router.current_path().as_deref(), Some("/login"));
//! assert_eq!(router.message().as_deref(), Some("Please login to access this page"));
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache of path resolutions

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core routing modules
pub mod matching;
pub mod params;
pub mod resolve;
pub mod state;
pub mod table;

// Error handling
pub mod error;

// Guards
pub mod guards;

// Host surfaces
pub mod location;
pub mod message;
pub mod transition;

// Configuration and defaults
pub mod config;
pub mod defaults;

// Navigation controller
mod context;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolutionCache};
pub use config::RouterConfig;
pub use context::{Router, RouterBuilder};
pub use defaults::{DefaultRoute, RoleHome, UserRole};
pub use error::{ErrorReporter, LogReporter, NavigationError, NavigationResult};
pub use guards::{guard_fn, AllowAll, FnGuard, GuardBuilder, GuardDecision, Guards, RouteGuard};
pub use location::{Location, MemoryLocation};
pub use matching::{match_pattern, normalize_target, parse_fragment, PatternMatch};
pub use message::{MemoryMessageHost, MessageChannel, MessageHost, MessageSlot, NoMessageHost};
pub use params::{NavigationRequest, QueryParams, RouteParams};
pub use resolve::{
    resolve, DefaultView, Fallback, PrecedenceRule, PrecedenceTable, Resolution, RuleMatcher,
    Tier, ViewLoader,
};
pub use state::{CurrentRoute, PendingNotice, RouterState};
pub use table::{handler_fn, BoxedHandler, RouteHandler, RouteTable};
pub use transition::{
    MemorySurface, NoDelay, NoTransition, Timer, TransitionConfig, TransitionPhase,
    TransitionSurface,
};
