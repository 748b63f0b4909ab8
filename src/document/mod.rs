//! In-process document model that dialogs render into.
//!
//! A [`Document`] is a small element tree with a body, a focus slot, a body
//! overflow flag and two kinds of listeners (document-level key listeners and
//! per-node click handlers). It stands in for the browser document a web
//! dialog would portal into: hosts keep their own widgets, dialogs mount
//! their overlay under a portal anchor, and the terminal loop feeds crossterm
//! events through [`Document::dispatch_key`] and [`Document::dispatch_mouse`].
//!
//! The model is single threaded. Handles are cheap `Rc` clones, and no
//! internal borrow is held while user callbacks run, so callbacks are free to
//! query or mutate the document.
//!
//! # Module Components
//!
//! - [`node`] - node ids and the [`ElementSpec`] content builder
//! - [`listeners`] - listener types and the [`ListenerGuard`] scope guard
//! - [`portal`] - reference-counted portal anchors
//! - [`scroll_lock`] - nested body scroll locking

pub mod listeners;
pub mod node;
pub mod portal;
pub mod scroll_lock;

pub use listeners::{ClickEvent, ClickHandler, KeyListener, ListenerGuard, ListenerId, Propagation};
pub use node::{ElementSpec, NodeId};
pub use portal::PortalHandle;
pub use scroll_lock::{Overflow, ScrollLock};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use listeners::ListenerSlot;
use node::Node;
use portal::PortalEntry;
use ratatui::layout::{Position, Rect};
use scroll_lock::ScrollState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Errors raised by structural document operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not attached to the document")]
    Detached(NodeId),

    #[error("Appending {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("The body element cannot be removed")]
    RootRemoval,
}

/// Arena slot; the generation is bumped whenever its node is removed
struct Slot {
    generation: u32,
    node: Option<Node>,
}

pub(crate) struct DocumentState {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
    focused: Option<NodeId>,
    pub(crate) scroll: ScrollState,
    portals: HashMap<String, PortalEntry>,
    key_listeners: Vec<(ListenerId, KeyListener)>,
    next_listener: u64,
}

impl DocumentState {
    fn new() -> Self {
        Self {
            nodes: vec![Slot {
                generation: 0,
                node: Some(Node::new("body")),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
            focused: None,
            scroll: ScrollState::default(),
            portals: HashMap::new(),
            key_listeners: Vec::new(),
            next_listener: 0,
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.nodes
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(DocumentError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(DocumentError::NodeNotFound(id))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.nodes[index];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.nodes.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.nodes.len() - 1,
            generation: 0,
        }
    }

    /// Empties a slot and hands it back for reuse
    fn take(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.nodes.get_mut(id.index).filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// Slots currently holding a node
    fn live_nodes(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.node.is_some()).count()
    }

    fn next_listener_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    /// True when `node` is `ancestor` or sits somewhere below it
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.node(current).ok().and_then(|n| n.parent);
        }
        false
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_ok() && self.is_inclusive_ancestor(self.body, id)
    }

    /// Target first, body last
    fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.node(current).ok().and_then(|n| n.parent);
        }
        path
    }

    fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if let Ok(node) = self.node(current) {
                order.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.preorder(self.body).into_iter().find(|id| {
            self.node(*id)
                .map(|n| n.attributes.get("id").map(String::as_str) == Some(element_id))
                .unwrap_or(false)
        })
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Ok(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.node_mut(child).ok().and_then(|n| n.parent.take());
        if let Some(parent) = parent {
            if let Ok(node) = self.node_mut(parent) {
                node.children.retain(|c| *c != child);
            }
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DocumentError::CycleDetected { parent, child });
        }
        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    fn build(&mut self, spec: &ElementSpec) -> NodeId {
        let mut node = Node::new(&spec.tag);
        node.attributes = spec.attributes.clone();
        node.add_classes(&spec.classes);
        node.text = spec.text.clone();
        let id = self.insert(node);
        for child_spec in &spec.children {
            let child = self.build(child_spec);
            self.link(id, child);
        }
        id
    }

    fn remove_subtree(&mut self, id: NodeId) -> Result<(), DocumentError> {
        if id == self.body {
            return Err(DocumentError::RootRemoval);
        }
        self.node(id)?;
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.take(current) {
                stack.extend(node.children);
            }
            if self.focused == Some(current) {
                self.focused = None;
            }
        }
        Ok(())
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId, slot: ListenerSlot) {
        match slot {
            ListenerSlot::Key => self.key_listeners.retain(|(listener, _)| *listener != id),
            ListenerSlot::Click(node) => {
                if let Ok(node) = self.node_mut(node) {
                    node.click_handlers.retain(|(handler, _)| *handler != id);
                }
            }
        }
    }

    fn create_anchor(&mut self, anchor_id: &str) -> NodeId {
        let mut node = Node::new("div");
        node.attributes.insert("id".to_string(), anchor_id.to_string());
        let id = self.insert(node);
        let body = self.body;
        self.link(body, id);
        id
    }

    fn acquire_portal(&mut self, anchor_id: &str) -> NodeId {
        if let Some(existing) = self.portals.get(anchor_id).map(|entry| entry.node) {
            let node = if self.is_attached(existing) {
                existing
            } else {
                log::warn!("Portal anchor '{}' was removed externally, recreating it", anchor_id);
                self.create_anchor(anchor_id)
            };
            if let Some(entry) = self.portals.get_mut(anchor_id) {
                if entry.node != node {
                    entry.node = node;
                    entry.owned = true;
                }
                entry.refs += 1;
            }
            return node;
        }

        let (node, owned) = match self.element_by_id(anchor_id) {
            Some(node) => (node, false),
            None => (self.create_anchor(anchor_id), true),
        };
        self.portals.insert(anchor_id.to_string(), PortalEntry { node, refs: 1, owned });
        node
    }

    pub(crate) fn release_portal(&mut self, anchor_id: &str) {
        let Some(entry) = self.portals.get_mut(anchor_id) else {
            return;
        };
        entry.refs = entry.refs.saturating_sub(1);
        if entry.refs > 0 {
            return;
        }
        if let Some(entry) = self.portals.remove(anchor_id) {
            if entry.owned && self.node(entry.node).is_ok() {
                let _ = self.remove_subtree(entry.node);
                log::debug!("Removed portal anchor '{}'", anchor_id);
            }
        }
    }
}

/// Shared handle to a document.
#[derive(Clone)]
pub struct Document {
    state: Rc<RefCell<DocumentState>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DocumentState::new())),
        }
    }

    pub fn body(&self) -> NodeId {
        self.state.borrow().body
    }

    // Tree construction

    /// Creates a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.state.borrow_mut().insert(Node::new(tag))
    }

    /// Builds `spec` and appends it under `parent`, returning the new root
    pub fn mount(&self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId, DocumentError> {
        let mut state = self.state.borrow_mut();
        state.node(parent)?;
        let id = state.build(spec);
        state.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.state.borrow_mut().append_child(parent, child)
    }

    /// Removes a node and everything below it, dropping their click handlers
    pub fn remove(&self, id: NodeId) -> Result<(), DocumentError> {
        self.state.borrow_mut().remove_subtree(id)
    }

    pub fn set_attribute(&self, id: NodeId, name: &str, value: &str) -> Result<(), DocumentError> {
        self.state
            .borrow_mut()
            .node_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn set_text(&self, id: NodeId, text: &str) -> Result<(), DocumentError> {
        self.state.borrow_mut().node_mut(id)?.text = Some(text.to_string());
        Ok(())
    }

    // Queries

    /// Arena slots allocated so far, live or waiting for reuse
    pub fn slot_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.state.borrow().node(id).is_ok()
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.state.borrow().is_attached(id)
    }

    pub fn tag(&self, id: NodeId) -> Option<String> {
        self.state.borrow().node(id).ok().map(|n| n.tag.clone())
    }

    pub fn text(&self, id: NodeId) -> Option<String> {
        self.state.borrow().node(id).ok().and_then(|n| n.text.clone())
    }

    /// Concatenated text of a subtree, one line per text-bearing node
    pub fn text_content(&self, root: NodeId) -> String {
        let state = self.state.borrow();
        state
            .preorder(root)
            .into_iter()
            .filter_map(|id| state.node(id).ok().and_then(|n| n.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .node(id)
            .ok()
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.state
            .borrow()
            .node(id)
            .map(|n| n.attributes.contains_key(name))
            .unwrap_or(false)
    }

    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.state
            .borrow()
            .node(id)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.state.borrow().node(id).ok().and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.state
            .borrow()
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// True when `node` is `ancestor` itself or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.state.borrow().is_inclusive_ancestor(ancestor, node)
    }

    /// Attached nodes below `root`, in document order, `root` included
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.state.borrow().preorder(root)
    }

    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.state.borrow().element_by_id(element_id)
    }

    /// Every attached node whose trimmed text equals `text`
    pub fn find_all_by_text(&self, text: &str) -> Vec<NodeId> {
        let state = self.state.borrow();
        state
            .preorder(state.body)
            .into_iter()
            .filter(|id| {
                state
                    .node(*id)
                    .ok()
                    .and_then(|n| n.text.as_deref())
                    .map(|t| t.trim() == text)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn find_by_text(&self, text: &str) -> Option<NodeId> {
        self.find_all_by_text(text).into_iter().next()
    }

    pub fn find_all_by_attribute(&self, name: &str, value: &str) -> Vec<NodeId> {
        let state = self.state.borrow();
        state
            .preorder(state.body)
            .into_iter()
            .filter(|id| {
                state
                    .node(*id)
                    .map(|n| n.attributes.get(name).map(String::as_str) == Some(value))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn find_by_role(&self, role: &str) -> Option<NodeId> {
        self.find_all_by_attribute("role", role).into_iter().next()
    }

    /// Case-insensitive substring match on `aria-label`
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        let needle = label.to_lowercase();
        let state = self.state.borrow();
        state.preorder(state.body).into_iter().find(|id| {
            state
                .node(*id)
                .ok()
                .and_then(|n| n.attributes.get("aria-label"))
                .map(|l| l.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    // Focus

    pub fn focus(&self, id: NodeId) -> Result<(), DocumentError> {
        let mut state = self.state.borrow_mut();
        if !state.is_attached(id) {
            return Err(DocumentError::Detached(id));
        }
        state.focused = Some(id);
        Ok(())
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.state.borrow().focused
    }

    // Body scroll

    pub fn overflow(&self) -> Overflow {
        self.state.borrow().scroll.overflow
    }

    pub fn set_overflow(&self, overflow: Overflow) {
        self.state.borrow_mut().scroll.overflow = overflow;
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.overflow() == Overflow::Hidden
    }

    pub fn lock_scroll(&self) -> ScrollLock {
        ScrollLock::acquire(Rc::downgrade(&self.state))
    }

    // Portals

    /// Takes a reference on the anchor with the given id, creating it under
    /// the body when absent
    pub fn acquire_portal(&self, anchor_id: &str) -> PortalHandle {
        let node = self.state.borrow_mut().acquire_portal(anchor_id);
        PortalHandle::new(Rc::downgrade(&self.state), anchor_id.to_string(), node)
    }

    /// Current reference count of a portal anchor, zero when not registered
    pub fn portal_refs(&self, anchor_id: &str) -> usize {
        self.state
            .borrow()
            .portals
            .get(anchor_id)
            .map(|entry| entry.refs)
            .unwrap_or(0)
    }

    // Painted geometry

    pub fn set_area(&self, id: NodeId, area: Option<Rect>) -> Result<(), DocumentError> {
        self.state.borrow_mut().node_mut(id)?.area = area;
        Ok(())
    }

    pub fn area(&self, id: NodeId) -> Option<Rect> {
        self.state.borrow().node(id).ok().and_then(|n| n.area)
    }

    /// Deepest attached node painted at the given cell
    pub fn hit_test(&self, x: u16, y: u16) -> Option<NodeId> {
        let state = self.state.borrow();
        let position = Position::new(x, y);
        state
            .preorder(state.body)
            .into_iter()
            .rev()
            .find(|id| {
                state
                    .node(*id)
                    .ok()
                    .and_then(|n| n.area)
                    .map(|area| area.contains(position))
                    .unwrap_or(false)
            })
    }

    // Listeners

    pub fn add_key_listener(&self, listener: KeyListener) -> ListenerGuard {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener_id();
        state.key_listeners.push((id, listener));
        ListenerGuard::new(Rc::downgrade(&self.state), id, ListenerSlot::Key)
    }

    pub fn add_click_handler(&self, node: NodeId, handler: ClickHandler) -> Result<ListenerGuard, DocumentError> {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener_id();
        state.node_mut(node)?.click_handlers.push((id, handler));
        Ok(ListenerGuard::new(Rc::downgrade(&self.state), id, ListenerSlot::Click(node)))
    }

    pub fn key_listener_count(&self) -> usize {
        self.state.borrow().key_listeners.len()
    }

    pub fn click_handler_count(&self, node: NodeId) -> usize {
        self.state
            .borrow()
            .node(node)
            .map(|n| n.click_handlers.len())
            .unwrap_or(0)
    }

    fn has_key_listener(&self, id: ListenerId) -> bool {
        self.state.borrow().key_listeners.iter().any(|(l, _)| *l == id)
    }

    fn has_click_handler(&self, node: NodeId, id: ListenerId) -> bool {
        self.state
            .borrow()
            .node(node)
            .map(|n| n.click_handlers.iter().any(|(h, _)| *h == id))
            .unwrap_or(false)
    }

    // Dispatch

    /// Delivers a key press to the document listeners.
    ///
    /// Enter and Space then activate the focused element with a synthetic
    /// click, the way a focused button reacts in a browser.
    pub fn dispatch_key(&self, key: &KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let listeners: Vec<(ListenerId, KeyListener)> = self
            .state
            .borrow()
            .key_listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in listeners {
            // A listener detached by an earlier one must not fire
            if self.has_key_listener(id) {
                listener(key);
            }
        }

        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            if let Some(focused) = self.focused() {
                if let Err(e) = self.dispatch_click(focused) {
                    log::debug!("Activation of focused node {} skipped: {}", focused, e);
                }
            }
        }
    }

    /// Bubbles a click from `target` up to the body.
    ///
    /// All handlers on a node run; a `Propagation::Stop` from any of them
    /// keeps the click from reaching that node's ancestors.
    pub fn dispatch_click(&self, target: NodeId) -> Result<(), DocumentError> {
        let path = {
            let state = self.state.borrow();
            state.node(target)?;
            state.ancestors_inclusive(target)
        };

        for current in path {
            let handlers: Vec<(ListenerId, ClickHandler)> = match self.state.borrow().node(current) {
                Ok(node) => node
                    .click_handlers
                    .iter()
                    .map(|(id, handler)| (*id, Rc::clone(handler)))
                    .collect(),
                Err(_) => break,
            };

            let event = ClickEvent {
                target,
                current,
                document: self.clone(),
            };
            let mut stopped = false;
            for (id, handler) in handlers {
                if self.has_click_handler(current, id) && handler(&event) == Propagation::Stop {
                    stopped = true;
                }
            }
            if stopped {
                break;
            }
        }
        Ok(())
    }

    /// Routes a left-button press to the node painted under the pointer.
    ///
    /// Returns whether a node received the click.
    pub fn dispatch_mouse(&self, mouse: &MouseEvent) -> Result<bool, DocumentError> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(false);
        }
        match self.hit_test(mouse.column, mouse.row) {
            Some(target) => {
                self.dispatch_click(target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Document")
            .field("nodes", &state.live_nodes())
            .field("slots", &state.nodes.len())
            .field("focused", &state.focused)
            .field("overflow", &state.scroll.overflow)
            .field("key_listeners", &state.key_listeners.len())
            .finish()
    }
}
