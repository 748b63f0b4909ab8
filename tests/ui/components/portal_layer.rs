use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use modalist::config::{ClassStyle, Config};
use modalist::constants::DISMISS_MARKER;
use modalist::document::{Document, ElementSpec};
use modalist::ui::components::{Dialog, DialogOptions, DialogProps, PortalLayer};
use ratatui::{backend::TestBackend, style::Color, Terminal};
use std::cell::Cell;
use std::rc::Rc;

fn left_click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn buffer_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| (area.left()..area.right()).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}

fn open_dialog(options: DialogOptions) -> (Document, Dialog, Rc<Cell<usize>>) {
    let document = Document::new();
    let mut dialog = Dialog::new(document.clone());
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let props = DialogProps::new(true, Rc::new(move || counter.set(counter.get() + 1)))
        .title("Saved")
        .child(ElementSpec::paragraph("All changes stored."))
        .child(ElementSpec::button("OK").attr(DISMISS_MARKER, ""))
        .options(options);
    dialog.render(&props).unwrap();
    (document, dialog, calls)
}

fn paint(document: &Document) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    terminal
        .draw(|f| f.render_widget(PortalLayer::new(document), f.area()))
        .unwrap();
    terminal
}

#[test]
fn test_paints_title_content_and_close_glyph() {
    let (document, dialog, _calls) = open_dialog(DialogOptions::default());
    let terminal = paint(&document);
    let lines = buffer_lines(&terminal);

    assert!(lines.iter().any(|line| line.contains("Saved")));
    assert!(lines.iter().any(|line| line.contains("All changes stored.")));
    assert!(lines.iter().any(|line| line.contains("[ OK ]")));

    let close_area = document.area(dialog.close_control().unwrap()).unwrap();
    let container_area = document.area(dialog.container().unwrap()).unwrap();
    assert_eq!(close_area.y, container_area.y);
    assert!(lines[close_area.y as usize].contains(" x "));
}

#[test]
fn test_closed_dialog_paints_nothing() {
    let document = Document::new();
    let mut dialog = Dialog::new(document.clone());
    dialog.render(&DialogProps::new(false, Rc::new(|| {}))).unwrap();

    let terminal = paint(&document);
    assert!(buffer_lines(&terminal).iter().all(|line| line.trim().is_empty()));
}

#[test]
fn test_mouse_on_painted_close_control_dismisses() {
    let (document, dialog, calls) = open_dialog(DialogOptions::default());
    let _terminal = paint(&document);

    let area = document.area(dialog.close_control().unwrap()).unwrap();
    assert!(document.dispatch_mouse(&left_click(area.x + 1, area.y)).unwrap());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_mouse_on_backdrop_and_content() {
    let (document, dialog, calls) = open_dialog(DialogOptions::default());
    let _terminal = paint(&document);

    // Top-left corner is outside the centered container
    assert_eq!(document.hit_test(0, 0), dialog.overlay());
    document.dispatch_mouse(&left_click(0, 0)).unwrap();
    assert_eq!(calls.get(), 1);

    let paragraph = document.find_by_text("All changes stored.").unwrap();
    let area = document.area(paragraph).unwrap();
    document.dispatch_mouse(&left_click(area.x, area.y)).unwrap();
    assert_eq!(calls.get(), 1);

    let ok = document.find_by_text("OK").unwrap();
    let area = document.area(ok).unwrap();
    document.dispatch_mouse(&left_click(area.x, area.y)).unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_backdrop_click_ignored_without_click_close() {
    let (document, _dialog, calls) = open_dialog(DialogOptions::default().click_close(false));
    let _terminal = paint(&document);

    document.dispatch_mouse(&left_click(0, 0)).unwrap();
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_other_mouse_events_are_not_clicks() {
    let (document, _dialog, calls) = open_dialog(DialogOptions::default());
    let _terminal = paint(&document);

    let moved = MouseEvent {
        kind: MouseEventKind::Moved,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    assert!(!document.dispatch_mouse(&moved).unwrap());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_config_width_and_class_styles() {
    let (document, dialog, _calls) = open_dialog(DialogOptions::default().container_class("card"));
    let mut config = Config::default();
    config.dialog.width_percent = 80;
    config.styles.insert(
        "card".to_string(),
        ClassStyle {
            fg: Some("yellow".to_string()),
            ..ClassStyle::default()
        },
    );

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    terminal
        .draw(|f| f.render_widget(PortalLayer::new(&document).config(&config), f.area()))
        .unwrap();

    let area = document.area(dialog.container().unwrap()).unwrap();
    assert_eq!(area.width, 48);
    let buffer = terminal.backend().buffer();
    assert_eq!(buffer[(area.x, area.y)].fg, Color::Yellow);
}

#[test]
fn test_long_text_wraps_instead_of_clipping() {
    let document = Document::new();
    let mut dialog = Dialog::new(document.clone());
    let text = "This sentence is far too long to fit on a single row of a narrow dialog box";
    dialog
        .render(&DialogProps::new(true, Rc::new(|| {})).child(ElementSpec::paragraph(text)))
        .unwrap();

    let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
    terminal
        .draw(|f| f.render_widget(PortalLayer::new(&document), f.area()))
        .unwrap();

    let paragraph = document.find_by_text(text).unwrap();
    let area = document.area(paragraph).unwrap();
    let container = document.area(dialog.container().unwrap()).unwrap();
    assert!(area.height >= 4);
    assert_eq!(container.height, area.height + 2);

    let lines = buffer_lines(&terminal);
    let painted: Vec<String> = (area.top()..area.bottom())
        .map(|y| {
            lines[y as usize]
                .chars()
                .skip(area.left() as usize)
                .take(area.width as usize)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect();
    assert_eq!(painted.join(" "), text);

    // Every wrapped row belongs to the paragraph for hit testing
    assert_eq!(document.hit_test(area.x, area.bottom() - 1), Some(paragraph));
}
