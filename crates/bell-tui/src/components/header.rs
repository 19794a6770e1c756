//! Header component: one-row top bar.
//!
//! Left: app title and server.  Right: the bell toggle with its badge.
//! Not focusable; the App reads `bell_area()` after drawing for hit-testing.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_FOCUS, C_MUTED, C_PRIMARY, C_SECONDARY, C_UNREAD},
};

const BELL: &str = "🔔";

pub struct Header {
    bell_area: Rect,
}

impl Header {
    pub fn new() -> Self {
        Self {
            bell_area: Rect::default(),
        }
    }

    /// Where the toggle was last drawn; empty if it did not fit.
    pub fn bell_area(&self) -> Rect {
        self.bell_area
    }
}

/// Spans for `[🔔 badge]`, plus their display width.
fn bell_spans(badge: Option<&str>, open: bool, inert: bool) -> (Vec<Span<'static>>, u16) {
    let bracket_style = if open {
        Style::default()
            .fg(C_FOCUS)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_SECONDARY)
    };
    let bell_style = if inert {
        Style::default().fg(C_MUTED)
    } else {
        Style::default().fg(C_PRIMARY)
    };
    let mut spans = vec![
        Span::styled("[", bracket_style),
        Span::styled(BELL, bell_style),
    ];
    let mut width = 1 + BELL.width();
    if let Some(text) = badge {
        let text = format!(" {text}");
        width += text.width();
        spans.push(Span::styled(
            text,
            Style::default()
                .fg(C_UNREAD)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled("]", bracket_style));
    width += 1;
    (spans, width as u16)
}

impl Component for Header {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.height == 0 {
            self.bell_area = Rect::default();
            return;
        }
        let row = Rect { height: 1, ..area };

        let badge = state.view.as_ref().and_then(|v| v.badge.as_deref());
        let (bell, bell_width) = bell_spans(badge, state.panel_open(), state.view.is_none());

        let title = vec![
            Span::styled(" bell ", Style::default().fg(C_UNREAD).add_modifier(Modifier::BOLD)),
            Span::styled("· ", Style::default().fg(C_MUTED)),
            Span::styled(state.server.clone(), Style::default().fg(C_SECONDARY)),
        ];
        frame.render_widget(Paragraph::new(Line::from(title)), row);

        // One cell of margin on the right.
        if row.width < bell_width + 2 {
            self.bell_area = Rect::default();
            return;
        }
        self.bell_area = Rect {
            x: row.x + row.width - bell_width - 1,
            y: row.y,
            width: bell_width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(bell)), self.bell_area);
    }
}
