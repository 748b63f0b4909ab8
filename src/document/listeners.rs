//! Event listeners and the guards that keep them attached.
//!
//! Every registration hands back a [`ListenerGuard`]. The listener stays
//! attached exactly as long as the guard is alive, so tying a guard to a
//! piece of state (an open dialog, say) detaches the listener on every exit
//! path of that state, including an early return or an unwinding panic.

use super::{Document, DocumentState, NodeId};
use crossterm::event::KeyEvent;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Document-level keyboard listener
pub type KeyListener = Rc<dyn Fn(&KeyEvent)>;

/// Per-node click handler
pub type ClickHandler = Rc<dyn Fn(&ClickEvent) -> Propagation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Whether a click keeps bubbling after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// A click travelling from its target towards the body.
pub struct ClickEvent {
    /// Deepest node that received the click
    pub target: NodeId,
    /// Node whose handler is currently running
    pub current: NodeId,
    pub(crate) document: Document,
}

impl ClickEvent {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Nodes from the target up to, but not including, `boundary`.
    ///
    /// Returns the whole ancestor chain when `boundary` is not an ancestor.
    pub fn path_to(&self, boundary: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(self.target);
        while let Some(node) = cursor {
            if node == boundary {
                break;
            }
            path.push(node);
            cursor = self.document.parent(node);
        }
        path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerSlot {
    Key,
    Click(NodeId),
}

/// Keeps a listener attached; dropping it detaches the listener.
///
/// Detaching is idempotent: a guard whose node was already removed, or whose
/// document is gone, drops without effect.
#[must_use = "dropping the guard detaches the listener immediately"]
pub struct ListenerGuard {
    state: Weak<RefCell<DocumentState>>,
    id: ListenerId,
    slot: ListenerSlot,
}

impl ListenerGuard {
    pub(crate) fn new(state: Weak<RefCell<DocumentState>>, id: ListenerId, slot: ListenerSlot) -> Self {
        Self { state, id, slot }
    }

    /// Detach now instead of at the end of the scope
    pub fn detach(self) {}
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().remove_listener(self.id, self.slot);
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .finish()
    }
}
