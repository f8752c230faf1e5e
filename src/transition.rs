//! Page transitions between views.
//!
//! The router marks the main container as *leaving* before it swaps the view,
//! waits [`TransitionConfig::leave_delay`], runs the handler, and then marks
//! the container as *entering*. The entering mark is cleared by the surface
//! after [`TransitionConfig::enter_hold`].
//!
//! Two navigations to different targets may interleave; their marks are then
//! applied in whatever order their handlers finish.

use futures::future::{self, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Visual state of the main container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No transition mark.
    #[default]
    Idle,
    /// Outgoing view is fading out.
    Leaving,
    /// Incoming view is fading in.
    Entering,
}

/// Timing of the page transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Pause between the leaving mark and the handler.
    pub leave_delay: Duration,
    /// How long the entering mark stays on.
    pub enter_hold: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            leave_delay: Duration::from_millis(150),
            enter_hold: Duration::from_millis(300),
        }
    }
}

// ============================================================================
// Surfaces
// ============================================================================

/// The main content container, as far as transitions are concerned.
pub trait TransitionSurface: 'static {
    /// Apply the leaving mark.
    fn leave(&self);

    /// Replace the leaving mark with the entering mark and drop it again
    /// after `hold`.
    fn enter(&self, hold: Duration);
}

/// Surface that ignores every mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransition;

impl TransitionSurface for NoTransition {
    fn leave(&self) {}

    fn enter(&self, _hold: Duration) {}
}

/// In-memory surface recording every phase change.
///
/// Clones share the same record.
///
/// ```
/// use shell_navigator::{MemorySurface, TransitionPhase, TransitionSurface};
/// use std::time::Duration;
///
/// let surface = MemorySurface::new();
/// surface.leave();
/// surface.enter(Duration::from_millis(300));
///
/// assert_eq!(surface.phase(), TransitionPhase::Entering);
/// assert_eq!(surface.history(), vec![TransitionPhase::Leaving, TransitionPhase::Entering]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    history: Rc<RefCell<Vec<TransitionPhase>>>,
}

impl MemorySurface {
    /// Create an idle surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.history.borrow().last().copied().unwrap_or_default()
    }

    /// Every phase applied so far, oldest first.
    pub fn history(&self) -> Vec<TransitionPhase> {
        self.history.borrow().clone()
    }
}

impl TransitionSurface for MemorySurface {
    fn leave(&self) {
        self.history.borrow_mut().push(TransitionPhase::Leaving);
    }

    fn enter(&self, _hold: Duration) {
        self.history.borrow_mut().push(TransitionPhase::Entering);
    }
}

// ============================================================================
// Timers
// ============================================================================

/// Source of delays. Hosts plug in their event loop's timer.
pub trait Timer: 'static {
    /// Complete after `duration`.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Timer that completes immediately, whatever the duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Timer for NoDelay {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

impl<F, Fut> Timer for F
where
    F: Fn(Duration) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self(duration).boxed_local()
    }
}
