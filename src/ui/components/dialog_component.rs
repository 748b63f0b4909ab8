//! Modal dialog component rendered through a portal anchor.
//!
//! The dialog is controlled: the host owns the open flag and passes it in on
//! every render pass together with a close callback. The dialog never closes
//! itself. Its dismissal channels (backdrop click, Escape, the close control,
//! and any element carrying [`DISMISS_MARKER`]) all funnel into one
//! [`DismissSignal`], which invokes the callback once per gesture.
//!
//! While open, the dialog holds three scoped resources: the listener guards,
//! a body [`ScrollLock`], and (for its whole lifetime, once first opened) a
//! [`PortalHandle`] on the shared anchor. Dropping the open session releases
//! the first two on every exit path; dropping the dialog releases the anchor.

use crate::config::DialogConfig;
use crate::constants::{
    ATTR_ARIA_LABEL, ATTR_ARIA_MODAL, ATTR_ROLE, CLOSE_LABEL, DISMISS_MARKER, PORTAL_ROOT_ID, ROLE_DIALOG,
    TITLE_ELEMENT_ID,
};
use crate::document::{
    ClickEvent, Document, DocumentError, ElementSpec, ListenerGuard, NodeId, PortalHandle, Propagation, ScrollLock,
};
use crate::icons::IconService;
use crossterm::event::{KeyCode, KeyEvent};
use std::fmt;
use std::rc::Rc;

/// Host callback asking for the dialog to be closed
pub type OnClose = Rc<dyn Fn()>;

/// Which channel produced a dismissal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Click on the backdrop outside the container
    Overlay,
    /// Escape pressed while open
    Escape,
    /// The built-in close control
    CloseControl,
    /// Any other element carrying the dismiss marker
    Marker,
}

/// Behaviour switches and presentation hooks for a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOptions {
    pub escape_close: bool,
    pub click_close: bool,
    pub show_close: bool,
    pub overlay_class_name: String,
    pub container_class_name: String,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            escape_close: true,
            click_close: true,
            show_close: true,
            overlay_class_name: String::new(),
            container_class_name: String::new(),
        }
    }
}

impl DialogOptions {
    #[must_use]
    pub fn escape_close(mut self, enabled: bool) -> Self {
        self.escape_close = enabled;
        self
    }

    #[must_use]
    pub fn click_close(mut self, enabled: bool) -> Self {
        self.click_close = enabled;
        self
    }

    #[must_use]
    pub fn show_close(mut self, enabled: bool) -> Self {
        self.show_close = enabled;
        self
    }

    #[must_use]
    pub fn overlay_class(mut self, class_names: impl Into<String>) -> Self {
        self.overlay_class_name = class_names.into();
        self
    }

    #[must_use]
    pub fn container_class(mut self, class_names: impl Into<String>) -> Self {
        self.container_class_name = class_names.into();
        self
    }
}

impl From<&DialogConfig> for DialogOptions {
    fn from(config: &DialogConfig) -> Self {
        Self {
            escape_close: config.escape_close,
            click_close: config.click_close,
            show_close: config.show_close,
            overlay_class_name: config.overlay_class.clone(),
            container_class_name: config.container_class.clone(),
        }
    }
}

/// Everything a host passes to [`Dialog::render`].
#[derive(Clone)]
pub struct DialogProps {
    pub is_open: bool,
    pub on_close: OnClose,
    pub title: Option<String>,
    pub children: Vec<ElementSpec>,
    pub options: DialogOptions,
}

impl DialogProps {
    pub fn new(is_open: bool, on_close: OnClose) -> Self {
        Self {
            is_open,
            on_close,
            title: None,
            children: Vec::new(),
            options: DialogOptions::default(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
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

    #[must_use]
    pub fn options(mut self, options: DialogOptions) -> Self {
        self.options = options;
        self
    }

    /// Same content, flags and callback; such a pass needs no remount
    fn renders_like(&self, other: &DialogProps) -> bool {
        self.is_open == other.is_open
            && Rc::ptr_eq(&self.on_close, &other.on_close)
            && self.title == other.title
            && self.children == other.children
            && self.options == other.options
    }
}

impl fmt::Debug for DialogProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogProps")
            .field("is_open", &self.is_open)
            .field("title", &self.title)
            .field("children", &self.children.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Single funnel for every dismissal channel.
#[derive(Clone)]
struct DismissSignal {
    on_close: OnClose,
}

impl DismissSignal {
    fn request(&self, reason: DismissReason) {
        log::debug!("Dialog dismissal requested via {:?}", reason);
        (self.on_close)();
    }
}

/// Resources held while the dialog is in the OPEN state.
struct OpenDialog {
    document: Document,
    overlay: NodeId,
    container: NodeId,
    close_control: Option<NodeId>,
    props: DialogProps,
    listeners: Vec<ListenerGuard>,
    scroll_lock: Option<ScrollLock>,
    restore_focus: Option<NodeId>,
}

impl Drop for OpenDialog {
    fn drop(&mut self) {
        self.listeners.clear();
        if self.document.exists(self.overlay) {
            if let Err(e) = self.document.remove(self.overlay) {
                log::warn!("Failed to remove dialog overlay {}: {}", self.overlay, e);
            }
        }
        self.scroll_lock.take();
        if let Some(node) = self.restore_focus.take() {
            if self.document.focused().is_none() && self.document.is_attached(node) {
                if let Err(e) = self.document.focus(node) {
                    log::debug!("Could not restore focus to {}: {}", node, e);
                }
            }
        }
    }
}

/// Modal dialog bound to a document.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use modalist::document::{Document, ElementSpec};
/// use modalist::ui::components::{Dialog, DialogProps};
///
/// let document = Document::new();
/// let mut dialog = Dialog::new(document.clone());
/// let closed = Rc::new(Cell::new(false));
/// let flag = closed.clone();
/// let props = DialogProps::new(true, Rc::new(move || flag.set(true)))
///     .child(ElementSpec::paragraph("Saved."));
///
/// dialog.render(&props).unwrap();
/// assert!(document.is_scroll_locked());
///
/// document.dispatch_click(dialog.overlay().unwrap()).unwrap();
/// assert!(closed.get());
/// ```
pub struct Dialog {
    document: Document,
    icons: IconService,
    portal: Option<PortalHandle>,
    open: Option<OpenDialog>,
}

impl Dialog {
    pub fn new(document: Document) -> Self {
        Self::with_icons(document, IconService::default())
    }

    pub fn with_icons(document: Document, icons: IconService) -> Self {
        Self {
            document,
            icons,
            portal: None,
            open: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Backdrop element, carrying the dialog role
    pub fn overlay(&self) -> Option<NodeId> {
        self.open.as_ref().map(|open| open.overlay)
    }

    pub fn container(&self) -> Option<NodeId> {
        self.open.as_ref().map(|open| open.container)
    }

    pub fn close_control(&self) -> Option<NodeId> {
        self.open.as_ref().and_then(|open| open.close_control)
    }

    /// Anchor node, once the dialog has been opened at least once
    pub fn portal_node(&self) -> Option<NodeId> {
        self.portal.as_ref().map(PortalHandle::node)
    }

    /// Runs one render pass.
    ///
    /// A closed pass tears down any open session. An open pass mounts the
    /// overlay on the CLOSED -> OPEN transition and remounts it when the
    /// props changed since the previous pass.
    pub fn render(&mut self, props: &DialogProps) -> Result<(), DocumentError> {
        if !props.is_open {
            if self.open.take().is_some() {
                log::info!("Dialog closed");
            }
            return Ok(());
        }

        match self.open.take() {
            None => {
                let anchor = self.ensure_portal();
                let restore_focus = self.document.focused();
                let scroll_lock = self.document.lock_scroll();
                let session = self.mount(anchor, props, Some(scroll_lock), restore_focus)?;
                if let Some(close_control) = session.close_control {
                    self.document.focus(close_control)?;
                }
                self.open = Some(session);
                log::info!("Dialog opened");
            }
            Some(mut previous) => {
                if previous.props.renders_like(props) && self.document.is_attached(previous.overlay) {
                    self.open = Some(previous);
                    return Ok(());
                }

                let focus_on_close = previous.close_control.is_some() && self.document.focused() == previous.close_control;
                let scroll_lock = previous.scroll_lock.take();
                let restore_focus = previous.restore_focus.take();
                // Old listeners go before the new ones are attached
                drop(previous);

                let anchor = self.ensure_portal();
                let session = self.mount(anchor, props, scroll_lock, restore_focus)?;
                if focus_on_close {
                    if let Some(close_control) = session.close_control {
                        self.document.focus(close_control)?;
                    }
                }
                self.open = Some(session);
                log::debug!("Dialog re-rendered with new props");
            }
        }
        Ok(())
    }

    /// Tears the dialog down, releasing its share of the portal anchor.
    pub fn unmount(self) {}

    fn ensure_portal(&mut self) -> NodeId {
        if let Some(portal) = &self.portal {
            if self.document.is_attached(portal.node()) {
                return portal.node();
            }
        }
        // Release the stale reference before taking a fresh one
        self.portal = None;
        let portal = self.document.acquire_portal(PORTAL_ROOT_ID);
        let node = portal.node();
        self.portal = Some(portal);
        node
    }

    fn mount(
        &self,
        anchor: NodeId,
        props: &DialogProps,
        scroll_lock: Option<ScrollLock>,
        restore_focus: Option<NodeId>,
    ) -> Result<OpenDialog, DocumentError> {
        let document = &self.document;
        let options = &props.options;

        let mut overlay_spec = ElementSpec::new("div")
            .attr(ATTR_ROLE, ROLE_DIALOG)
            .attr(ATTR_ARIA_MODAL, "true")
            .class(&options.overlay_class_name);
        if props.title.is_some() {
            overlay_spec = overlay_spec.attr("aria-labelledby", TITLE_ELEMENT_ID);
        }
        let overlay = document.mount(anchor, &overlay_spec)?;

        // From here on the session owns the overlay, so an early return
        // still removes it
        let mut session = OpenDialog {
            document: document.clone(),
            overlay,
            container: overlay,
            close_control: None,
            props: props.clone(),
            listeners: Vec::new(),
            scroll_lock,
            restore_focus,
        };

        let container = document.mount(overlay, &ElementSpec::new("div").class(&options.container_class_name))?;
        session.container = container;

        if options.show_close {
            let close_spec = ElementSpec::button(self.icons.close())
                .attr(ATTR_ARIA_LABEL, CLOSE_LABEL)
                .attr(DISMISS_MARKER, "");
            session.close_control = Some(document.mount(container, &close_spec)?);
        }

        let mut content = ElementSpec::new("div");
        if let Some(title) = &props.title {
            content = content.child(ElementSpec::new("h2").attr("id", TITLE_ELEMENT_ID).text(title.clone()));
        }
        document.mount(container, &content.children(props.children.iter().cloned()))?;

        let signal = DismissSignal {
            on_close: Rc::clone(&props.on_close),
        };
        session.listeners = self.wire_listeners(&session, &signal, options)?;
        Ok(session)
    }

    fn wire_listeners(
        &self,
        session: &OpenDialog,
        signal: &DismissSignal,
        options: &DialogOptions,
    ) -> Result<Vec<ListenerGuard>, DocumentError> {
        let mut listeners = Vec::with_capacity(3);

        let overlay_signal = signal.clone();
        let click_close = options.click_close;
        listeners.push(self.document.add_click_handler(
            session.overlay,
            Rc::new(move |_event: &ClickEvent| {
                if click_close {
                    overlay_signal.request(DismissReason::Overlay);
                }
                Propagation::Continue
            }),
        )?);

        let marker_signal = signal.clone();
        let container = session.container;
        let close_control = session.close_control;
        listeners.push(self.document.add_click_handler(
            container,
            Rc::new(move |event: &ClickEvent| {
                let marked = event
                    .path_to(container)
                    .into_iter()
                    .find(|node| event.document().has_attribute(*node, DISMISS_MARKER));
                if let Some(node) = marked {
                    let reason = if Some(node) == close_control {
                        DismissReason::CloseControl
                    } else {
                        DismissReason::Marker
                    };
                    marker_signal.request(reason);
                }
                // Clicks inside the container never reach the backdrop
                Propagation::Stop
            }),
        )?);

        let escape_signal = signal.clone();
        let escape_close = options.escape_close;
        listeners.push(self.document.add_key_listener(Rc::new(move |key: &KeyEvent| {
            if escape_close && key.code == KeyCode::Esc {
                escape_signal.request(DismissReason::Escape);
            }
        })));

        Ok(listeners)
    }
}

impl Drop for Dialog {
    fn drop(&mut self) {
        // Session first: its overlay lives under the anchor
        if self.open.take().is_some() {
            log::info!("Dialog unmounted while open");
        }
        self.portal.take();
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("open", &self.is_open())
            .field("overlay", &self.overlay())
            .field("portal", &self.portal_node())
            .finish()
    }
}
