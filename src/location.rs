//! The location fragment the router reads and writes.
//!
//! Assigning a different fragment makes the host fire a change notification
//! some time later; the router never sees that as a return value. Feed the
//! notifications to [`Router::listen`](crate::Router::listen).

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use std::cell::RefCell;
use std::rc::Rc;

/// The browser's `location.hash`, or anything standing in for it.
pub trait Location: 'static {
    /// Current fragment, without the leading `#`.
    fn fragment(&self) -> String;

    /// Assign the fragment. The host notifies listeners if it changed.
    fn set_fragment(&self, fragment: &str);
}

/// In-memory location with a change-notification channel.
///
/// Every assignment that changes the fragment sends one `()` on the
/// receiver returned by [`MemoryLocation::new`], mirroring a `hashchange`
/// event. Clones share the same fragment and channel.
///
/// ```
/// use futures::{FutureExt, StreamExt};
/// use shell_navigator::{Location, MemoryLocation};
///
/// let (location, mut changes) = MemoryLocation::new();
/// location.set_fragment("/courses");
/// location.set_fragment("/courses");
///
/// assert_eq!(location.fragment(), "/courses");
/// assert_eq!(pollster::block_on(changes.next()), Some(()));
/// assert_eq!(changes.next().now_or_never(), None);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    fragment: Rc<RefCell<String>>,
    notify: UnboundedSender<()>,
}

impl MemoryLocation {
    /// Empty fragment plus the stream of change notifications.
    pub fn new() -> (Self, UnboundedReceiver<()>) {
        Self::with_fragment("")
    }

    /// Start at `fragment`.
    pub fn with_fragment(fragment: &str) -> (Self, UnboundedReceiver<()>) {
        let (notify, changes) = mpsc::unbounded();
        let location = Self {
            fragment: Rc::new(RefCell::new(fragment.trim_start_matches('#').to_string())),
            notify,
        };
        (location, changes)
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    fn set_fragment(&self, fragment: &str) {
        let fragment = fragment.trim_start_matches('#');
        let changed = {
            let mut current = self.fragment.borrow_mut();
            if *current == fragment {
                false
            } else {
                *current = fragment.to_string();
                true
            }
        };
        if changed {
            // A dropped receiver only means nobody listens any more.
            let _ = self.notify.unbounded_send(());
        }
    }
}
