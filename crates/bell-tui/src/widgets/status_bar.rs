//! Status bar: bottom line with the input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_BUSY, C_ERROR, C_MUTED, C_RULE, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Panel closed.
    Normal,
    /// Panel open; arrows move the selection.
    Panel,
    /// Terminal too small for the bell; only the log works.
    Inert,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "LOG",
            Self::Panel => "NOTIFICATIONS",
            Self::Inert => "INERT",
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => " n notifications  ↑↓/jk scroll log  q quit",
            Self::Panel => " ↑↓/jk select  Enter open  a mark all read  Esc/n close  q quit",
            Self::Inert => " terminal too small for notifications  ↑↓/jk scroll log  q quit",
        }
    }
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, in_flight: usize) {
    let color = match mode {
        InputMode::Normal => C_SECONDARY,
        InputMode::Panel => C_BUSY,
        InputMode::Inert => C_ERROR,
    };
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if in_flight > 0 {
        spans.push(Span::styled("⋯", Style::default().fg(C_BUSY)));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(mode.keys(), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Horizontal rule under the header.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_RULE),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
