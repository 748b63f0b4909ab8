//! Demo host: an employee roster that confirms new hires with a dialog.
//!
//! The host owns the dialog's open flag. Pressing `n` records a new employee
//! and opens the confirmation dialog; the dialog only ever asks to be closed
//! through its callback, and the host applies that request on its next
//! update. Background scrolling is refused while the document scroll lock
//! is held.

use super::dialog_component::{Dialog, DialogOptions, DialogProps, OnClose};
use super::dialogs::common::{create_instructions_paragraph, shortcuts};
use super::dialogs::PortalLayer;
use crate::config::Config;
use crate::constants::{
    DIALOG_BUTTON_OK, DIALOG_MESSAGE_EMPLOYEE_CREATED, DIALOG_TITLE_EMPLOYEE_CREATED, DISMISS_MARKER, HOST_TITLE,
};
use crate::document::{Document, ElementSpec, NodeId};
use crate::icons::IconService;
use crate::logger::Logger;
use crate::ui::core::{Action, Component};
use crate::ui::layout::LayoutManager;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use std::cell::Cell;
use std::rc::Rc;

/// A roster entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub start_date: String,
}

impl Employee {
    pub fn new(first_name: &str, last_name: &str, department: &str, start_date: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            department: department.to_string(),
            start_date: start_date.to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

const SAMPLE_ROSTER: &[(&str, &str, &str, &str)] = &[
    ("Ada", "Lovelace", "Engineering", "2021-03-01"),
    ("Grace", "Hopper", "Engineering", "2020-11-16"),
    ("Alan", "Turing", "Legal", "2022-01-10"),
    ("Katherine", "Johnson", "Sales", "2019-07-22"),
    ("Edsger", "Dijkstra", "Marketing", "2023-05-02"),
    ("Barbara", "Liskov", "Human Resources", "2018-09-03"),
];

pub struct HostComponent {
    document: Document,
    dialog: Dialog,
    config: Config,
    icons: IconService,
    logger: Logger,
    host_root: NodeId,
    employees: Vec<Employee>,
    scroll_offset: usize,
    dialog_open: bool,
    close_requested: Rc<Cell<bool>>,
    on_close: OnClose,
}

impl HostComponent {
    pub fn new(config: Config, logger: Logger) -> Self {
        let document = Document::new();
        // The host's own subtree; the dialog must never render in here
        let host_root = document.create_element("main");
        let icons = IconService::new(config.ui.icon_theme);
        let dialog = Dialog::with_icons(document.clone(), icons.clone());
        let close_requested = Rc::new(Cell::new(false));
        let flag = Rc::clone(&close_requested);

        Self {
            document,
            dialog,
            config,
            icons,
            logger,
            host_root,
            employees: SAMPLE_ROSTER
                .iter()
                .map(|(first, last, department, start)| Employee::new(first, last, department, start))
                .collect(),
            scroll_offset: 0,
            dialog_open: false,
            close_requested,
            on_close: Rc::new(move || flag.set(true)),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn host_root(&self) -> NodeId {
        self.host_root
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Props for the confirmation dialog in the current host state
    pub fn dialog_props(&self) -> DialogProps {
        DialogProps::new(self.dialog_open, Rc::clone(&self.on_close))
            .title(DIALOG_TITLE_EMPLOYEE_CREATED)
            .child(ElementSpec::paragraph(DIALOG_MESSAGE_EMPLOYEE_CREATED))
            .child(ElementSpec::button(DIALOG_BUTTON_OK).attr(DISMISS_MARKER, ""))
            .options(DialogOptions::from(&self.config.dialog))
    }

    /// Render pass for the dialog, kept separate from painting
    pub fn sync_dialog(&mut self) {
        let props = self.dialog_props();
        if let Err(e) = self.dialog.render(&props) {
            log::error!("Dialog render failed: {}", e);
        }
    }

    fn take_close_request(&self) -> Action {
        if self.close_requested.replace(false) {
            Action::CloseDialog
        } else {
            Action::None
        }
    }

    fn add_employee(&mut self) {
        let (first, last, department, start) = SAMPLE_ROSTER[self.employees.len() % SAMPLE_ROSTER.len()];
        let employee = Employee::new(first, last, department, start);
        log::info!(
            "{} Employee created: {} ({})",
            self.icons.success(),
            employee.display_name(),
            employee.department
        );
        self.employees.push(employee);
    }

    fn scroll_by(&mut self, delta: isize) {
        if self.document.is_scroll_locked() {
            log::debug!("Scroll ignored while the dialog holds the scroll lock");
            return;
        }
        let max_offset = self.employees.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max_offset);
    }

    fn render_roster(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .employees
            .iter()
            .skip(self.scroll_offset)
            .map(|employee| {
                ListItem::new(Line::from(format!(
                    "{} {:<24} {:<18} {}",
                    self.icons.list_item(),
                    employee.display_name(),
                    employee.department,
                    employee.start_date
                )))
            })
            .collect();

        let title = if self.document.is_scroll_locked() {
            format!(" {} {} ", HOST_TITLE, self.icons.locked())
        } else {
            format!(" {} ", HOST_TITLE)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(List::new(items).block(block), area);

        let visible = area.height.saturating_sub(2) as usize;
        if self.employees.len() > visible {
            let mut state = ScrollbarState::new(self.employees.len())
                .viewport_content_length(visible)
                .position(self.scroll_offset);
            let scrollbar_area = Rect::new(
                area.right().saturating_sub(1),
                area.y.saturating_add(1),
                1,
                area.height.saturating_sub(2),
            );
            f.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight).style(Style::default().fg(Color::DarkGray)),
                scrollbar_area,
                &mut state,
            );
        }
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let status = if self.dialog_open {
            create_instructions_paragraph(&[shortcuts::ESC_CLOSE, shortcuts::SEPARATOR, shortcuts::ENTER_CONFIRM])
        } else if let Some(latest) = self.logger.latest_at(log::Level::Info) {
            Paragraph::new(format!("{} {}", self.icons.info(), latest)).style(Style::default().fg(Color::Gray))
        } else {
            create_instructions_paragraph(&[
                shortcuts::NEW_EMPLOYEE,
                shortcuts::SEPARATOR,
                shortcuts::SCROLL,
                shortcuts::SEPARATOR,
                shortcuts::QUIT,
            ])
        };
        f.render_widget(status, area);
    }
}

impl Component for HostComponent {
    fn init(&mut self) -> anyhow::Result<()> {
        let body = self.document.body();
        self.document.append_child(body, self.host_root)?;
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        self.document.dispatch_key(&key);
        if let Action::CloseDialog = self.take_close_request() {
            return Action::CloseDialog;
        }
        if self.dialog_open {
            return Action::None;
        }

        match key.code {
            KeyCode::Char('n') => Action::OpenDialog,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Home | KeyCode::Char('g') => Action::ScrollToTop,
            KeyCode::End | KeyCode::Char('G') => Action::ScrollToBottom,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Action {
        match self.document.dispatch_mouse(&mouse) {
            Ok(_) => {}
            Err(e) => log::warn!("Mouse dispatch failed: {}", e),
        }
        if let Action::CloseDialog = self.take_close_request() {
            return Action::CloseDialog;
        }

        match mouse.kind {
            MouseEventKind::ScrollDown => Action::ScrollDown,
            MouseEventKind::ScrollUp => Action::ScrollUp,
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::OpenDialog => {
                self.add_employee();
                self.dialog_open = true;
                self.sync_dialog();
                Action::None
            }
            Action::CloseDialog => {
                self.dialog_open = false;
                self.sync_dialog();
                Action::None
            }
            Action::ScrollUp => {
                self.scroll_by(-1);
                Action::None
            }
            Action::ScrollDown => {
                self.scroll_by(1);
                Action::None
            }
            Action::ScrollToTop => {
                self.scroll_by(isize::MIN);
                Action::None
            }
            Action::ScrollToBottom => {
                self.scroll_by(isize::MAX);
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let [list_area, status_area] = LayoutManager::main_layout(rect);
        self.render_roster(f, list_area);
        self.render_status(f, status_area);

        self.sync_dialog();
        f.render_widget(PortalLayer::new(&self.document).config(&self.config), rect);
    }
}
