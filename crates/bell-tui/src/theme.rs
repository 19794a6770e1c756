//! Palette and styles for the bell TUI.
//!
//! Red is reserved for unread state and failures; everything else stays in
//! greys so the badge is what stands out.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 16, 22);
pub const C_PRIMARY: Color = Color::Rgb(214, 214, 226);
pub const C_SECONDARY: Color = Color::Rgb(118, 118, 140);
pub const C_MUTED: Color = Color::Rgb(70, 70, 86);
/// Borders and the header rule.
pub const C_RULE: Color = Color::Rgb(42, 42, 54);
pub const C_FOCUS: Color = Color::Rgb(122, 104, 204);
pub const C_SELECTION_BG: Color = Color::Rgb(30, 30, 44);

pub const C_UNREAD: Color = Color::Rgb(255, 92, 92);
pub const C_ERROR: Color = Color::Rgb(240, 84, 84);
pub const C_OK: Color = Color::Rgb(84, 198, 124);
pub const C_INFO: Color = Color::Rgb(82, 158, 218);
pub const C_KIND: Color = Color::Rgb(84, 138, 198);
pub const C_LINK: Color = Color::Rgb(102, 162, 132);
/// Requests in flight, panel mode.
pub const C_BUSY: Color = Color::Rgb(250, 198, 84);

// ── Styles ────────────────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_border(focused: bool) -> Style {
    Style::default().fg(if focused { C_FOCUS } else { C_RULE })
}

pub fn style_selected() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Unread titles are bright and bold; read ones recede.
pub fn style_item_title(read: bool) -> Style {
    if read {
        style_secondary()
    } else {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    }
}

pub fn style_mark_all() -> Style {
    Style::default().fg(C_OK).add_modifier(Modifier::BOLD)
}
