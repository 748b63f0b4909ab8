use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use modalist::constants::{DISMISS_MARKER, PORTAL_ROOT_ID, TITLE_ELEMENT_ID};
use modalist::document::{Document, ElementSpec, Overflow};
use modalist::ui::components::{Dialog, DialogOptions, DialogProps, OnClose};
use std::cell::Cell;
use std::rc::Rc;

/// A dialog plus a counting close callback
struct Harness {
    document: Document,
    dialog: Dialog,
    calls: Rc<Cell<usize>>,
    on_close: OnClose,
}

impl Harness {
    fn new() -> Self {
        let document = Document::new();
        let dialog = Dialog::new(document.clone());
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        Self {
            document,
            dialog,
            calls,
            on_close: Rc::new(move || counter.set(counter.get() + 1)),
        }
    }

    fn props(&self, is_open: bool) -> DialogProps {
        DialogProps::new(is_open, Rc::clone(&self.on_close))
            .title("Employee Created!")
            .child(ElementSpec::paragraph("The new employee has been added."))
            .child(ElementSpec::button("OK").attr(DISMISS_MARKER, ""))
    }

    fn open_with(&mut self, options: DialogOptions) {
        let props = self.props(true).options(options);
        self.dialog.render(&props).unwrap();
    }

    fn open(&mut self) {
        self.open_with(DialogOptions::default());
    }

    fn close(&mut self) {
        let props = self.props(false);
        self.dialog.render(&props).unwrap();
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_closed_dialog_renders_nothing() {
    let mut h = Harness::new();
    h.close();

    assert!(!h.dialog.is_open());
    assert_eq!(h.document.find_by_role("dialog"), None);
    assert_eq!(h.document.find_by_text("Employee Created!"), None);
    assert_eq!(h.document.element_by_id(PORTAL_ROOT_ID), None);
    assert_eq!(h.document.overflow(), Overflow::Auto);
}

#[test]
fn test_open_dialog_mounts_into_portal_anchor() {
    let mut h = Harness::new();
    let host = h.document.mount(h.document.body(), &ElementSpec::new("main")).unwrap();
    h.open();

    let overlay = h.dialog.overlay().unwrap();
    let anchor = h.document.element_by_id(PORTAL_ROOT_ID).unwrap();
    assert_eq!(h.document.parent(overlay), Some(anchor));
    assert_eq!(h.document.parent(anchor), Some(h.document.body()));
    assert!(!h.document.contains(host, overlay));

    assert_eq!(h.document.find_all_by_attribute("role", "dialog"), vec![overlay]);
    assert_eq!(h.document.attribute(overlay, "aria-modal").as_deref(), Some("true"));
    assert_eq!(h.document.find_all_by_text("The new employee has been added.").len(), 1);
}

#[test]
fn test_title_renders_as_labelled_heading() {
    let mut h = Harness::new();
    h.open();

    let heading = h.document.find_by_text("Employee Created!").unwrap();
    assert_eq!(h.document.tag(heading).as_deref(), Some("h2"));
    assert_eq!(h.document.element_by_id(TITLE_ELEMENT_ID), Some(heading));
    assert_eq!(
        h.document.attribute(h.dialog.overlay().unwrap(), "aria-labelledby").as_deref(),
        Some(TITLE_ELEMENT_ID)
    );
}

#[test]
fn test_untitled_dialog_has_no_heading() {
    let mut h = Harness::new();
    let props = DialogProps::new(true, Rc::clone(&h.on_close)).child(ElementSpec::paragraph("Body only"));
    h.dialog.render(&props).unwrap();

    assert_eq!(h.document.element_by_id(TITLE_ELEMENT_ID), None);
    assert!(!h.document.has_attribute(h.dialog.overlay().unwrap(), "aria-labelledby"));
    assert!(h.document.find_by_text("Body only").is_some());
}

#[test]
fn test_children_keep_their_order() {
    let mut h = Harness::new();
    h.open();

    let container = h.dialog.container().unwrap();
    let order: Vec<String> = h
        .document
        .descendants(container)
        .into_iter()
        .filter_map(|node| h.document.text(node))
        .collect();
    assert_eq!(order, vec!["x", "Employee Created!", "The new employee has been added.", "OK"]);
}

#[test]
fn test_class_names_are_applied() {
    let mut h = Harness::new();
    h.open_with(DialogOptions::default().overlay_class("backdrop dimmed").container_class("card"));

    let overlay = h.dialog.overlay().unwrap();
    assert!(h.document.has_class(overlay, "backdrop"));
    assert!(h.document.has_class(overlay, "dimmed"));
    assert!(h.document.has_class(h.dialog.container().unwrap(), "card"));
}

#[test]
fn test_close_control_receives_focus() {
    let mut h = Harness::new();
    h.open();

    let close_control = h.dialog.close_control().unwrap();
    assert_eq!(h.document.focused(), Some(close_control));
    assert_eq!(h.document.find_by_label("close"), Some(close_control));
    assert!(h.document.has_attribute(close_control, DISMISS_MARKER));
}

#[test]
fn test_show_close_false_renders_no_close_control() {
    let mut h = Harness::new();
    h.open_with(DialogOptions::default().show_close(false));

    assert_eq!(h.dialog.close_control(), None);
    assert_eq!(h.document.find_by_label("close"), None);
    assert_eq!(h.document.focused(), None);
}

#[test]
fn test_overlay_click_respects_click_close() {
    let mut h = Harness::new();
    h.open();
    h.document.dispatch_click(h.dialog.overlay().unwrap()).unwrap();
    assert_eq!(h.calls(), 1);

    let mut h = Harness::new();
    h.open_with(DialogOptions::default().click_close(false));
    h.document.dispatch_click(h.dialog.overlay().unwrap()).unwrap();
    assert_eq!(h.calls(), 0);
}

#[test]
fn test_click_inside_container_does_not_dismiss() {
    let mut h = Harness::new();
    h.open();

    h.document.dispatch_click(h.dialog.container().unwrap()).unwrap();
    let paragraph = h.document.find_by_text("The new employee has been added.").unwrap();
    h.document.dispatch_click(paragraph).unwrap();
    let heading = h.document.find_by_text("Employee Created!").unwrap();
    h.document.dispatch_click(heading).unwrap();

    assert_eq!(h.calls(), 0);
}

#[test]
fn test_escape_respects_escape_close() {
    let mut h = Harness::new();
    h.open();
    h.document.dispatch_key(&press(KeyCode::Esc));
    assert_eq!(h.calls(), 1);

    let mut h = Harness::new();
    h.open_with(DialogOptions::default().escape_close(false));
    h.document.dispatch_key(&press(KeyCode::Esc));
    assert_eq!(h.calls(), 0);
}

#[test]
fn test_escape_while_closed_has_no_effect() {
    let mut h = Harness::new();
    h.document.dispatch_key(&press(KeyCode::Esc));
    assert_eq!(h.calls(), 0);

    h.open();
    h.close();
    h.document.dispatch_key(&press(KeyCode::Esc));
    assert_eq!(h.calls(), 0);
    assert_eq!(h.document.key_listener_count(), 0);
}

#[test]
fn test_other_keys_do_not_dismiss() {
    let mut h = Harness::new();
    h.open_with(DialogOptions::default().show_close(false));

    h.document.dispatch_key(&press(KeyCode::Char('q')));
    h.document.dispatch_key(&press(KeyCode::Enter));
    assert_eq!(h.calls(), 0);
}

#[test]
fn test_close_control_dismisses_exactly_once() {
    let mut h = Harness::new();
    h.open_with(DialogOptions::default().click_close(false).escape_close(false));

    h.document.dispatch_click(h.dialog.close_control().unwrap()).unwrap();
    assert_eq!(h.calls(), 1);
}

#[test]
fn test_enter_activates_focused_close_control() {
    let mut h = Harness::new();
    h.open();

    h.document.dispatch_key(&press(KeyCode::Enter));
    assert_eq!(h.calls(), 1);
}

#[test]
fn test_marker_click_dismisses_regardless_of_flags() {
    let mut h = Harness::new();
    h.open_with(
        DialogOptions::default()
            .click_close(false)
            .escape_close(false)
            .show_close(false),
    );

    let ok = h.document.find_by_text("OK").unwrap();
    h.document.dispatch_click(ok).unwrap();
    assert_eq!(h.calls(), 1);
}

#[test]
fn test_click_on_marker_descendant_dismisses_once() {
    let mut h = Harness::new();
    let props = DialogProps::new(true, Rc::clone(&h.on_close)).child(
        ElementSpec::new("div")
            .attr(DISMISS_MARKER, "")
            .child(ElementSpec::new("span").text("Dismiss")),
    );
    h.dialog.render(&props).unwrap();

    let span = h.document.find_by_text("Dismiss").unwrap();
    h.document.dispatch_click(span).unwrap();
    assert_eq!(h.calls(), 1);
}

#[test]
fn test_dialog_never_closes_itself() {
    let mut h = Harness::new();
    h.open();

    h.document.dispatch_click(h.dialog.overlay().unwrap()).unwrap();
    assert_eq!(h.calls(), 1);
    assert!(h.dialog.is_open());
    assert!(h.document.find_by_role("dialog").is_some());
    assert!(h.document.is_scroll_locked());
}

#[test]
fn test_scroll_lock_follows_open_state() {
    let mut h = Harness::new();
    h.open();
    assert_eq!(h.document.overflow(), Overflow::Hidden);
    h.close();
    assert_eq!(h.document.overflow(), Overflow::Auto);
    h.open();
    assert!(h.document.is_scroll_locked());
    h.close();
    assert_eq!(h.document.overflow(), Overflow::Auto);
}

#[test]
fn test_scroll_lock_restores_prior_overflow() {
    let mut h = Harness::new();
    h.document.set_overflow(Overflow::Hidden);
    h.open();
    h.close();
    assert_eq!(h.document.overflow(), Overflow::Hidden);
}

#[test]
fn test_close_restores_previous_focus() {
    let mut h = Harness::new();
    let trigger = h.document.mount(h.document.body(), &ElementSpec::button("New")).unwrap();
    h.document.focus(trigger).unwrap();

    h.open();
    assert_eq!(h.document.focused(), h.dialog.close_control());
    h.close();
    assert_eq!(h.document.focused(), Some(trigger));
}

#[test]
fn test_unchanged_props_do_not_remount() {
    let mut h = Harness::new();
    let props = h.props(true);
    h.dialog.render(&props).unwrap();
    let overlay = h.dialog.overlay().unwrap();

    h.dialog.render(&props).unwrap();
    assert_eq!(h.dialog.overlay(), Some(overlay));
    assert_eq!(h.document.key_listener_count(), 1);
}

#[test]
fn test_changed_props_remount_in_place() {
    let mut h = Harness::new();
    h.open();
    let first = h.dialog.overlay().unwrap();

    let props = DialogProps::new(true, Rc::clone(&h.on_close)).title("Updated");
    h.dialog.render(&props).unwrap();

    assert!(!h.document.exists(first));
    assert_eq!(h.document.find_all_by_attribute("role", "dialog").len(), 1);
    assert!(h.document.find_by_text("Updated").is_some());
    assert_eq!(h.document.focused(), h.dialog.close_control());
    assert_eq!(h.document.key_listener_count(), 1);
    assert!(h.document.is_scroll_locked());

    h.document.dispatch_key(&press(KeyCode::Esc));
    assert_eq!(h.calls(), 1);
}

#[test]
fn test_unmount_while_open_releases_everything() {
    let mut h = Harness::new();
    h.open();
    assert!(h.document.element_by_id(PORTAL_ROOT_ID).is_some());

    let Harness {
        document,
        dialog,
        calls,
        ..
    } = h;
    dialog.unmount();

    assert_eq!(document.element_by_id(PORTAL_ROOT_ID), None);
    assert_eq!(document.find_by_role("dialog"), None);
    assert_eq!(document.overflow(), Overflow::Auto);
    assert_eq!(document.key_listener_count(), 0);
    document.dispatch_key(&press(KeyCode::Esc));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_anchor_outlives_close_until_unmount() {
    let mut h = Harness::new();
    h.open();
    let anchor = h.dialog.portal_node().unwrap();
    h.close();

    assert!(h.document.is_attached(anchor));
    assert!(h.document.children(anchor).is_empty());
    assert_eq!(h.document.portal_refs(PORTAL_ROOT_ID), 1);

    let document = h.document.clone();
    drop(h);
    assert!(!document.exists(anchor));
    assert_eq!(document.portal_refs(PORTAL_ROOT_ID), 0);
}

#[test]
fn test_concurrent_dialogs_share_the_anchor() {
    let mut first = Harness::new();
    let document = first.document.clone();
    let mut second = Dialog::new(document.clone());

    first.open();
    let props = DialogProps::new(true, Rc::new(|| {})).child(ElementSpec::paragraph("Second"));
    second.render(&props).unwrap();

    let anchor = document.element_by_id(PORTAL_ROOT_ID).unwrap();
    assert_eq!(second.portal_node(), Some(anchor));
    assert_eq!(document.portal_refs(PORTAL_ROOT_ID), 2);
    assert_eq!(document.children(anchor).len(), 2);

    second.unmount();
    assert!(document.is_attached(anchor));
    assert!(document.is_scroll_locked());
    assert!(first.dialog.is_open());

    first.close();
    assert_eq!(document.overflow(), Overflow::Auto);
}

#[test]
fn test_host_provided_anchor_is_kept() {
    let mut h = Harness::new();
    let anchor = h
        .document
        .mount(h.document.body(), &ElementSpec::new("div").attr("id", PORTAL_ROOT_ID))
        .unwrap();
    h.open();
    assert_eq!(h.dialog.portal_node(), Some(anchor));

    let document = h.document.clone();
    drop(h);
    assert!(document.is_attached(anchor));
    assert!(document.children(anchor).is_empty());
}

#[test]
fn test_anchor_removed_externally_is_recreated() {
    let mut h = Harness::new();
    h.open();
    let stale = h.dialog.portal_node().unwrap();
    h.close();
    h.document.remove(stale).unwrap();

    h.open();
    let anchor = h.dialog.portal_node().unwrap();
    assert_ne!(anchor, stale);
    assert_eq!(h.document.parent(h.dialog.overlay().unwrap()), Some(anchor));
    assert_eq!(h.document.portal_refs(PORTAL_ROOT_ID), 1);
}

#[test]
fn test_concrete_open_dismiss_close_sequence() {
    let mut h = Harness::new();
    h.close();
    assert_eq!(h.document.find_by_role("dialog"), None);

    h.open_with(DialogOptions::default().show_close(true));
    let dialogs = h.document.find_all_by_attribute("role", "dialog");
    assert_eq!(dialogs.len(), 1);
    assert_eq!(h.document.attribute(dialogs[0], "aria-modal").as_deref(), Some("true"));
    assert_eq!(h.document.focused(), h.dialog.close_control());

    h.document.dispatch_click(dialogs[0]).unwrap();
    assert_eq!(h.calls(), 1);

    h.close();
    assert_eq!(h.document.find_by_role("dialog"), None);
    assert!(!h.document.is_scroll_locked());
}

#[test]
fn test_repeated_open_close_reuses_node_slots() {
    let mut h = Harness::new();
    h.open();
    h.close();
    let slots = h.document.slot_count();

    for _ in 0..10 {
        h.open();
        let props = DialogProps::new(true, Rc::clone(&h.on_close)).title("Remounted");
        h.dialog.render(&props).unwrap();
        h.close();
    }
    assert_eq!(h.document.slot_count(), slots);
}
