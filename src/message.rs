//! The transient advisory message shown next to the main container.
//!
//! There is a single slot. It is created on first use through a
//! [`MessageHost`], holds at most one message, and is emptied at the start of
//! every navigation attempt.

use crate::{trace_log, warn_log};
use std::cell::RefCell;
use std::rc::Rc;

/// A created message slot.
pub trait MessageSlot {
    /// Replace the slot's text.
    fn set_text(&self, text: &str);

    /// Show or hide the slot.
    fn set_visible(&self, visible: bool);
}

/// Creates the message slot adjacent to the main container.
pub trait MessageHost: 'static {
    /// Create the slot `slot_id` next to the container `container_id`.
    ///
    /// Returns `None` if the container does not exist (yet).
    fn create_slot(&self, container_id: &str, slot_id: &str) -> Option<Rc<dyn MessageSlot>>;
}

/// Host that never creates a slot; messages only reach the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMessageHost;

impl MessageHost for NoMessageHost {
    fn create_slot(&self, _container_id: &str, _slot_id: &str) -> Option<Rc<dyn MessageSlot>> {
        None
    }
}

// ============================================================================
// MessageChannel
// ============================================================================

/// Owner of the single advisory slot.
pub struct MessageChannel {
    host: Rc<dyn MessageHost>,
    container_id: String,
    slot_id: String,
    slot: Option<Rc<dyn MessageSlot>>,
    current: Option<String>,
}

impl MessageChannel {
    /// Channel whose slot will be created by `host` on first use.
    pub fn new(
        host: Rc<dyn MessageHost>,
        container_id: impl Into<String>,
        slot_id: impl Into<String>,
    ) -> Self {
        Self {
            host,
            container_id: container_id.into(),
            slot_id: slot_id.into(),
            slot: None,
            current: None,
        }
    }

    /// Show `text`, replacing whatever was shown.
    ///
    /// If the slot cannot be created the message is logged instead.
    pub fn show(&mut self, text: &str) {
        if self.slot.is_none() {
            self.slot = self.host.create_slot(&self.container_id, &self.slot_id);
        }
        match &self.slot {
            Some(slot) => {
                slot.set_text(text);
                slot.set_visible(true);
                trace_log!("Showing route message: {}", text);
            }
            None => {
                warn_log!("No message slot available, dropping message: {}", text);
            }
        }
        self.current = Some(text.to_string());
    }

    /// Hide and empty the slot.
    pub fn clear(&mut self) {
        if let Some(slot) = &self.slot {
            slot.set_text("");
            slot.set_visible(false);
        }
        self.current = None;
    }

    /// The message currently shown, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl std::fmt::Debug for MessageChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageChannel")
            .field("slot_id", &self.slot_id)
            .field("created", &self.slot.is_some())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// In-memory host
// ============================================================================

#[derive(Debug, Default)]
struct SlotState {
    text: String,
    visible: bool,
    created: usize,
}

/// In-memory host. Clones share the same slot.
///
/// ```
/// use shell_navigator::{MemoryMessageHost, MessageChannel};
/// use std::rc::Rc;
///
/// let host = MemoryMessageHost::new();
/// let mut channel = MessageChannel::new(Rc::new(host.clone()), "app-container", "route-message");
///
/// channel.show("Please login to access this page");
/// assert_eq!(host.visible_text().as_deref(), Some("Please login to access this page"));
///
/// channel.clear();
/// assert_eq!(host.visible_text(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryMessageHost {
    state: Rc<RefCell<SlotState>>,
}

impl MemoryMessageHost {
    /// Create a host with no slot yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the slot if it is visible.
    pub fn visible_text(&self) -> Option<String> {
        let state = self.state.borrow();
        state.visible.then(|| state.text.clone())
    }

    /// How many times a slot was created.
    pub fn slots_created(&self) -> usize {
        self.state.borrow().created
    }
}

impl MessageHost for MemoryMessageHost {
    fn create_slot(&self, _container_id: &str, _slot_id: &str) -> Option<Rc<dyn MessageSlot>> {
        self.state.borrow_mut().created += 1;
        Some(Rc::new(self.clone()))
    }
}

impl MessageSlot for MemoryMessageHost {
    fn set_text(&self, text: &str) {
        self.state.borrow_mut().text = text.to_string();
    }

    fn set_visible(&self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }
}
