//! Element nodes and the builder used to describe content.

use super::listeners::{ClickHandler, ListenerId};
use ratatui::layout::Rect;
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a node stored in a [`Document`](super::Document).
///
/// Slots are reused once a node is removed; the generation keeps an old id
/// from resolving to the node that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

pub(crate) struct Node {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Last painted area, used for mouse hit testing
    pub area: Option<Rect>,
    pub click_handlers: Vec<(ListenerId, ClickHandler)>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            area: None,
            click_handlers: Vec::new(),
        }
    }

    pub fn add_classes(&mut self, class_names: &str) {
        for class in class_names.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
    }
}

/// Declarative description of an element tree.
///
/// Hosts build content with this type and hand it to the dialog, which mounts
/// it into the document with [`Document::mount`](super::Document::mount).
///
/// ```
/// use modalist::document::ElementSpec;
///
/// let body = ElementSpec::new("div")
///     .child(ElementSpec::paragraph("Saved."))
///     .child(ElementSpec::button("Cancel").attr("data-modal-close", ""));
/// assert_eq!(body.children.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: String,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A `p` element holding a single line of text
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new("p").text(text)
    }

    /// A `button` element with the given label
    pub fn button(label: impl Into<String>) -> Self {
        Self::new("button").text(label)
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends whitespace-separated class names
    #[must_use]
    pub fn class(mut self, class_names: &str) -> Self {
        if !class_names.trim().is_empty() {
            if !self.classes.is_empty() {
                self.classes.push(' ');
            }
            self.classes.push_str(class_names.trim());
        }
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = ElementSpec>,
    {
        self.children.extend(children);
        self
    }
}
