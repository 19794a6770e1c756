//! Toasts: transient one-line status messages (navigation results and the like).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_ERROR, C_INFO, C_OK};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 3,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        // Same message twice: keep only the newest.
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Drop expired toasts.  Returns `true` if anything was removed.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Render toasts in the bottom-right corner of `area`, newest lowest.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() || area.height < 2 {
            return;
        }
        let max_width = (area.width / 2).clamp(30.min(area.width), 70);
        let visible: Vec<&Toast> = self.toasts.iter().rev().take(self.max_visible).collect();

        // Keep clear of the bottom row (keys bar).
        let mut y = area.y + area.height.saturating_sub(2);
        for toast in visible {
            let msg_len = toast.message.chars().count() as u16;
            let w = (msg_len + 4).min(max_width);
            let x = area.x + area.width.saturating_sub(w + 1);

            let (color, icon) = match toast.severity {
                Severity::Info => (C_INFO, "·"),
                Severity::Success => (C_OK, "✓"),
                Severity::Error => (C_ERROR, "✗"),
            };

            let toast_area = Rect {
                x,
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(
                Paragraph::new(Line::from(vec![Span::styled(
                    format!(" {} {} ", icon, &toast.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )])),
                toast_area,
            );

            if y <= area.y + 1 {
                break;
            }
            y -= 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse_and_queue_is_capped() {
        let mut toasts = ToastManager::new();
        toasts.info("opened");
        toasts.info("opened");
        assert_eq!(toasts.toasts.len(), 1);
        for i in 0..20 {
            toasts.error(format!("failure {i}"));
        }
        assert_eq!(toasts.toasts.len(), toasts.max_visible * 2);
        assert_eq!(toasts.toasts.back().unwrap().message, "failure 19");
    }

    #[test]
    fn test_tick_drops_expired() {
        let mut toasts = ToastManager::new();
        toasts.push("gone", Severity::Info, Duration::ZERO);
        toasts.push("stays", Severity::Info, Duration::from_secs(60));
        assert!(toasts.tick());
        assert_eq!(toasts.toasts.len(), 1);
        assert!(!toasts.tick());
    }
}
