//! NotificationPanel component: the dropdown drawn under the bell.
//!
//! Layout inside the border:
//!   row 0       unread summary, "mark all read" control on the right
//!   rows 1..    the body: loading / empty / error line, or two rows per item
//!
//! Every draw records where the control and the item rows landed so the App
//! can hand them to the widget as anchors.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use bell_proto::protocol::NotificationId;
use bell_proto::view::{ItemView, PanelBody, WidgetView};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{
        style_item_title, style_mark_all, style_muted, style_secondary, style_selected, C_ERROR,
        C_KIND, C_LINK, C_UNREAD,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

const ITEM_HEIGHT: u16 = 2;
const PANEL_WIDTH: u16 = 56;
/// Narrowest / shortest body the panel can be anchored in.
const MIN_WIDTH: u16 = 32;
const MIN_HEIGHT: u16 = 6;
const MARK_ALL_LABEL: &str = "✓ mark all read";

pub struct NotificationPanel {
    selected: usize,
    offset: usize,
    mark_all_area: Option<Rect>,
    item_areas: Vec<(NotificationId, Rect)>,
}

impl NotificationPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            offset: 0,
            mark_all_area: None,
            item_areas: Vec::new(),
        }
    }

    /// Where the panel may open inside `body`, right-aligned under `bell`.
    /// `None` if the body is too small to anchor it.
    pub fn slot(body: Rect, bell: Rect) -> Option<Rect> {
        if body.width < MIN_WIDTH || body.height < MIN_HEIGHT || bell.width == 0 {
            return None;
        }
        let width = PANEL_WIDTH.min(body.width);
        let right = (bell.x + bell.width).clamp(body.x + width, body.x + body.width);
        Some(Rect {
            x: right - width,
            y: body.y,
            width,
            height: body.height,
        })
    }

    /// Height the panel wants for `view`: border, summary row, body rows.
    pub fn desired_height(view: &WidgetView) -> u16 {
        let body_rows = match &view.body {
            PanelBody::Items(items) => (items.len() as u16).saturating_mul(ITEM_HEIGHT),
            _ => 1,
        };
        body_rows.saturating_add(3)
    }

    /// Actual panel area for `view` within `slot`.
    pub fn area(slot: Rect, view: &WidgetView) -> Rect {
        Rect {
            height: Self::desired_height(view).min(slot.height),
            ..slot
        }
    }

    pub fn mark_all_area(&self) -> Option<Rect> {
        self.mark_all_area
    }

    pub fn item_areas(&self) -> &[(NotificationId, Rect)] {
        &self.item_areas
    }

    /// Forget drawn regions (panel hidden this frame).
    pub fn clear_regions(&mut self) {
        self.mark_all_area = None;
        self.item_areas.clear();
    }

    pub fn selected_id(&self, state: &AppState) -> Option<NotificationId> {
        items(state).get(self.selected).map(|item| item.id)
    }

    fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

fn items(state: &AppState) -> &[ItemView] {
    match state.view.as_ref().map(|v| &v.body) {
        Some(PanelBody::Items(items)) => items,
        _ => &[],
    }
}

impl Component for NotificationPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectUp(1)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectDown(1)],
            KeyCode::Enter => self
                .selected_id(state)
                .map(Action::OpenItem)
                .into_iter()
                .collect(),
            KeyCode::Char('a') if state.view.as_ref().is_some_and(|v| v.mark_all_visible) => {
                vec![Action::MarkAllRead]
            }
            KeyCode::Esc => vec![Action::ClosePanel],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => vec![Action::SelectUp(1)],
            MouseEventKind::ScrollDown => vec![Action::SelectDown(1)],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        let len = items(state).len();
        match action {
            Action::SelectUp(n) => self.selected = self.selected.saturating_sub(*n),
            Action::SelectDown(n) => {
                self.selected = self.selected.saturating_add(*n);
                self.clamp_selection(len);
            }
            Action::TogglePanel if !state.panel_open() => {
                // About to open: start from the top.
                self.selected = 0;
                self.offset = 0;
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.clear_regions();
        let Some(view) = state.view.as_ref() else {
            return;
        };
        if area.height < 3 || area.width < 4 {
            return;
        }
        frame.render_widget(Clear, area);

        let badge = view.badge.as_ref().map(|text| Badge {
            text: text.as_str(),
            color: C_UNREAD,
        });
        let block = pane_chrome("notifications", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        // ── Summary row ──────────────────────────────────────────────────────
        let summary = Rect { height: 1, ..inner };
        let unread = items(state).iter().filter(|i| !i.read).count();
        let summary_text = match &view.body {
            PanelBody::Items(_) if unread > 0 => format!(" {unread} unread here"),
            PanelBody::Items(_) => " all read".to_string(),
            _ => String::new(),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(summary_text, style_secondary())),
            summary,
        );
        if view.mark_all_visible {
            let w = (MARK_ALL_LABEL.width() as u16 + 2).min(summary.width);
            let control = Rect {
                x: summary.x + summary.width - w,
                width: w,
                ..summary
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {MARK_ALL_LABEL} "),
                    style_mark_all(),
                )),
                control,
            );
            self.mark_all_area = Some(control);
        }

        // ── Body ─────────────────────────────────────────────────────────────
        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        if body.height == 0 {
            return;
        }
        let line = |text: String, style: Style| Paragraph::new(Span::styled(text, style));
        match &view.body {
            PanelBody::Loading => frame.render_widget(line("  loading…".into(), style_muted()), body),
            PanelBody::Empty => {
                frame.render_widget(line("  no notifications".into(), style_muted()), body)
            }
            PanelBody::Error(message) => frame.render_widget(
                line(format!("  {message}"), Style::default().fg(C_ERROR)),
                body,
            ),
            PanelBody::Items(list) => {
                self.clamp_selection(list.len());
                let rows = ((body.height / ITEM_HEIGHT) as usize).max(1);
                if self.selected < self.offset {
                    self.offset = self.selected;
                } else if self.selected >= self.offset + rows {
                    self.offset = self.selected + 1 - rows;
                }
                self.offset = self.offset.min(list.len().saturating_sub(rows));

                for (slot, (index, item)) in list
                    .iter()
                    .enumerate()
                    .skip(self.offset)
                    .take(rows)
                    .enumerate()
                {
                    let y = body.y + slot as u16 * ITEM_HEIGHT;
                    let height = ITEM_HEIGHT.min(body.y + body.height - y);
                    let row = Rect {
                        y,
                        height,
                        ..body
                    };
                    let selected = focused && index == self.selected;
                    frame.render_widget(Paragraph::new(item_lines(item, row.width, selected)), row);
                    self.item_areas.push((item.id, row));
                }
            }
        }
    }
}

fn item_lines(item: &ItemView, width: u16, selected: bool) -> Vec<Line<'static>> {
    let width = width as usize;
    let base = if selected {
        style_selected()
    } else {
        Style::default()
    };

    let dot = if item.unread_dot {
        Span::styled(" ● ", base.fg(C_UNREAD))
    } else {
        Span::styled("   ", base)
    };
    let kind = format!("{} ", item.kind.label());
    let time = format!(" {} ", item.relative_time);
    let link = if item.navigable { " ↗" } else { "" };
    let fixed = 3 + kind.width() + time.width() + link.width();
    let title_style = base.patch(style_item_title(item.read));
    let title = truncate(&item.title, width.saturating_sub(fixed));
    let pad = width.saturating_sub(fixed + title.width());

    let first = Line::from(vec![
        dot,
        Span::styled(kind, base.fg(C_KIND)),
        Span::styled(title, title_style),
        Span::styled(link, base.fg(C_LINK)),
        Span::styled(" ".repeat(pad), base),
        Span::styled(time, base.patch(style_muted())),
    ]);
    let message = truncate(&item.message, width.saturating_sub(4));
    let second = Line::from(vec![
        Span::styled("    ", base),
        Span::styled(message.clone(), base.patch(style_secondary())),
        Span::styled(" ".repeat(width.saturating_sub(4 + message.width())), base),
    ]);
    vec![first, second]
}

/// Cut `s` to at most `max` display cells, ending in `…` when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
