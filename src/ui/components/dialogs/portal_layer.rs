//! Paints portal-mounted dialogs on top of the host frame.

use super::common::{button_label, close_control_style, create_dialog_block};
use crate::config::Config;
use crate::constants::{ATTR_ARIA_LABEL, CLOSE_LABEL, DIALOG_DEFAULT_WIDTH_PERCENT, PORTAL_ROOT_ID};
use crate::document::{Document, NodeId};
use crate::ui::layout::LayoutManager;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Clear, Paragraph, Widget, Wrap},
};

/// Widget drawing every overlay mounted under a portal anchor.
///
/// Painting records each node's area back into the document so that
/// [`Document::dispatch_mouse`] can hit-test the next click.
pub struct PortalLayer<'a> {
    document: &'a Document,
    width_percent: u16,
    config: Option<&'a Config>,
}

impl<'a> PortalLayer<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            width_percent: DIALOG_DEFAULT_WIDTH_PERCENT,
            config: None,
        }
    }

    /// Use the class styles and dialog width from a configuration
    #[must_use]
    pub fn config(mut self, config: &'a Config) -> Self {
        self.width_percent = config.dialog.width_percent;
        self.config = Some(config);
        self
    }

    fn class_style(&self, node: NodeId) -> Style {
        match self.config {
            Some(config) => config.style_for_classes(&self.document.classes(node)),
            None => Style::default(),
        }
    }

    fn record(&self, node: NodeId, area: Rect) {
        if let Err(e) = self.document.set_area(node, Some(area)) {
            log::debug!("Skipping area for {}: {}", node, e);
        }
    }

    fn is_close_control(&self, node: NodeId) -> bool {
        self.document.tag(node).as_deref() == Some("button")
            && self.document.attribute(node, ATTR_ARIA_LABEL).as_deref() == Some(CLOSE_LABEL)
    }

    fn paragraph(&self, node: NodeId, text: String) -> Paragraph<'static> {
        let tag = self.document.tag(node).unwrap_or_default();
        let (label, base) = match tag.as_str() {
            "button" => (button_label(&text), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            "h1" | "h2" | "h3" => (text, Style::default().add_modifier(Modifier::BOLD)),
            _ => (text, Style::default()),
        };
        let mut style = base.patch(self.class_style(node));
        if self.document.focused() == Some(node) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Paragraph::new(label).style(style).wrap(Wrap { trim: true })
    }

    /// Rows a subtree needs once its text is wrapped to `width`
    fn measure(&self, node: NodeId, width: u16) -> u16 {
        let own = match self.document.text(node) {
            Some(text) => self.text_rows(node, text, width),
            None => 0,
        };
        self.document
            .children(node)
            .into_iter()
            .fold(own, |rows, child| rows.saturating_add(self.measure(child, width)))
    }

    fn text_rows(&self, node: NodeId, text: String, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let rows = self.paragraph(node, text).line_count(width);
        u16::try_from(rows.max(1)).unwrap_or(u16::MAX)
    }

    fn render_overlay(&self, overlay: NodeId, area: Rect, buf: &mut Buffer) {
        buf.set_style(
            area,
            Style::default().add_modifier(Modifier::DIM).patch(self.class_style(overlay)),
        );
        self.record(overlay, area);

        let Some(container) = self.document.children(overlay).first().copied() else {
            return;
        };
        let (close_controls, content): (Vec<NodeId>, Vec<NodeId>) = self
            .document
            .children(container)
            .into_iter()
            .partition(|node| self.is_close_control(*node));

        let dialog_width = LayoutManager::centered_rect_lines(self.width_percent, area.height, area).width;
        let inner_width = dialog_width.saturating_sub(4);
        let content_rows = content
            .iter()
            .fold(0u16, |rows, node| rows.saturating_add(self.measure(*node, inner_width)));
        let height = content_rows.saturating_add(2).min(area.height);
        let dialog_area = LayoutManager::centered_rect_lines(self.width_percent, height, area);

        Clear.render(dialog_area, buf);
        let container_style = Style::default().fg(Color::White).patch(self.class_style(container));
        create_dialog_block(container_style).render(dialog_area, buf);
        self.record(container, dialog_area);

        for close_control in close_controls {
            self.render_close_control(close_control, dialog_area, buf);
        }

        let inner = Rect::new(
            dialog_area.x.saturating_add(2),
            dialog_area.y.saturating_add(1),
            dialog_area.width.saturating_sub(4),
            dialog_area.height.saturating_sub(2),
        );
        let mut y = inner.y;
        for node in content {
            y = y.saturating_add(self.render_node(node, inner, y, buf));
        }
    }

    fn render_close_control(&self, node: NodeId, dialog_area: Rect, buf: &mut Buffer) {
        let glyph = self.document.text(node).unwrap_or_default();
        let label = format!(" {} ", glyph);
        let width = (Span::raw(label.as_str()).width() as u16).min(dialog_area.width.saturating_sub(2));
        if width == 0 {
            return;
        }
        let x = dialog_area.right().saturating_sub(width + 2);
        let focused = self.document.focused() == Some(node);
        buf.set_stringn(x, dialog_area.y, &label, width as usize, close_control_style(focused));
        self.record(node, Rect::new(x, dialog_area.y, width, 1));
    }

    /// Paints `node` starting at row `y`, returning the rows it used
    fn render_node(&self, node: NodeId, inner: Rect, y: u16, buf: &mut Buffer) -> u16 {
        let bottom = inner.bottom();
        let mut row = y;

        if let Some(text) = self.document.text(node) {
            let rows = self.text_rows(node, text.clone(), inner.width);
            let visible = rows.min(bottom.saturating_sub(row));
            if visible > 0 && inner.width > 0 {
                let text_area = Rect::new(inner.x, row, inner.width, visible);
                let paragraph = self.paragraph(node, text);
                // Single-line buttons are only clickable on their label
                let hit_width = if rows == 1 && self.document.tag(node).as_deref() == Some("button") {
                    (paragraph.line_width() as u16).min(inner.width)
                } else {
                    inner.width
                };
                paragraph.render(text_area, buf);
                self.record(node, Rect::new(inner.x, row, hit_width, visible));
            } else if let Err(e) = self.document.set_area(node, None) {
                log::debug!("Skipping area for {}: {}", node, e);
            }
            row = row.saturating_add(rows);
            for child in self.document.children(node) {
                row = row.saturating_add(self.render_node(child, inner, row, buf));
            }
            return row - y;
        }

        for child in self.document.children(node) {
            row = row.saturating_add(self.render_node(child, inner, row, buf));
        }
        let visible = row.min(bottom).saturating_sub(y.min(bottom));
        self.record(node, Rect::new(inner.x, y.min(bottom), inner.width, visible));
        row - y
    }
}

impl Widget for PortalLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(anchor) = self.document.element_by_id(PORTAL_ROOT_ID) else {
            return;
        };
        for overlay in self.document.children(anchor) {
            self.render_overlay(overlay, area, buf);
        }
    }
}
