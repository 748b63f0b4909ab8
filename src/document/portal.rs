//! Shared attachment points for content rendered outside the host tree.

use super::{DocumentState, NodeId};
use std::cell::RefCell;
use std::rc::Weak;

#[derive(Debug)]
pub(crate) struct PortalEntry {
    pub node: NodeId,
    pub refs: usize,
    /// Created by the registry rather than adopted from the host
    pub owned: bool,
}

/// One reference to a portal anchor.
///
/// The anchor node is created under the body by the first acquisition and
/// removed when the last handle is dropped. An element the host created
/// with the same id is adopted and left in place on release.
#[must_use = "dropping the handle releases the anchor"]
#[derive(Debug)]
pub struct PortalHandle {
    state: Weak<RefCell<DocumentState>>,
    anchor_id: String,
    node: NodeId,
}

impl PortalHandle {
    pub(crate) fn new(state: Weak<RefCell<DocumentState>>, anchor_id: String, node: NodeId) -> Self {
        Self {
            state,
            anchor_id,
            node,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn anchor_id(&self) -> &str {
        &self.anchor_id
    }
}

impl Drop for PortalHandle {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().release_portal(&self.anchor_id);
        }
    }
}
