//! LogPanel component: activity log of failed requests.
//!
//! Fills the body behind the notification panel.  Follows the newest entry
//! unless the user has scrolled up.

use chrono::{DateTime, Local};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use bell_proto::diagnostics::DiagnosticReport;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ERROR, C_MUTED, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct LogPanel {
    scroll: usize,
    /// Entry count at the last draw, to detect new entries for auto-scroll.
    last_count: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            scroll: usize::MAX,
            last_count: 0,
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        };
    }
}

impl Component for LogPanel {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let delta = match key.code {
            KeyCode::Up | KeyCode::Char('k') => -1,
            KeyCode::Down | KeyCode::Char('j') => 1,
            KeyCode::PageUp => -10,
            KeyCode::PageDown => 10,
            KeyCode::Home | KeyCode::Char('g') => isize::MIN,
            KeyCode::End | KeyCode::Char('G') => isize::MAX,
            _ => return vec![],
        };
        vec![Action::ScrollLog(delta)]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => vec![Action::ScrollLog(-1)],
            MouseEventKind::ScrollDown => vec![Action::ScrollLog(1)],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ScrollLog(delta) = action {
            self.scroll_by(*delta);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);

        let count = state.reports.len();
        let badge_text = format!("{count} errors");
        let badge = (count > 0).then(|| Badge {
            text: &badge_text,
            color: C_ERROR,
        });
        let block = pane_chrome("activity", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if count == 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no failed requests",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let max_scroll = count.saturating_sub(height);
        if count > self.last_count && self.scroll >= self.last_count.saturating_sub(height) {
            self.scroll = max_scroll;
        }
        self.last_count = count;
        self.scroll = self.scroll.min(max_scroll);

        let now = Local::now();
        let lines: Vec<Line> = state
            .reports
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|r| report_line(r, now))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn report_line(report: &DiagnosticReport, now: DateTime<Local>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {} ", compact_timestamp(report.at, now)),
            Style::default().fg(C_MUTED),
        ),
        Span::styled(
            format!("{}: ", report.operation.describe()),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(report.message.clone(), Style::default().fg(C_ERROR)),
    ])
}

fn compact_timestamp(at: DateTime<Local>, now: DateTime<Local>) -> String {
    let fmt = if at.date_naive() == now.date_naive() {
        "%H:%M:%S"
    } else {
        "%m-%d %H:%M"
    };
    at.format(fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_drops_date_for_today() {
        let now = Local.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap();
        let today = Local.with_ymd_and_hms(2024, 5, 2, 9, 3, 7).unwrap();
        let earlier = Local.with_ymd_and_hms(2024, 4, 30, 9, 3, 7).unwrap();
        assert_eq!(compact_timestamp(today, now), "09:03:07");
        assert_eq!(compact_timestamp(earlier, now), "04-30 09:03");
    }

    #[test]
    fn test_scroll_saturates() {
        let mut panel = LogPanel::new();
        panel.on_action(&Action::ScrollLog(isize::MIN), &AppState::new(String::new()));
        assert_eq!(panel.scroll, 0);
        panel.scroll_by(-3);
        assert_eq!(panel.scroll, 0);
        panel.scroll_by(isize::MAX);
        assert_eq!(panel.scroll, isize::MAX as usize);
    }
}
