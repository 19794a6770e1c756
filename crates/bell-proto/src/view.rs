//! View model: a pure function of widget state.
//!
//! Front-ends draw a `WidgetView` and nothing else, so everything visible can
//! be asserted without a terminal.

use crate::dropdown::DropdownVisibility;
use crate::list::ListContent;
use crate::protocol::{NotificationId, NotificationKind, NotificationRecord};
use crate::state::NotificationState;

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    /// Badge text; `None` = hidden.
    pub badge: Option<String>,
    pub panel_open: bool,
    pub body: PanelBody,
    pub mark_all_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    Loading,
    /// Empty-state placeholder; the list itself is hidden.
    Empty,
    Error(String),
    Items(Vec<ItemView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub relative_time: String,
    pub read: bool,
    /// Unread dot; gone as soon as the row is confirmed read.
    pub unread_dot: bool,
    pub navigable: bool,
}

impl ItemView {
    fn from_record(record: &NotificationRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            title: plain_text(&record.title),
            message: plain_text(&record.message),
            relative_time: plain_text(&record.relative_time),
            read: record.read,
            unread_dot: !record.read,
            navigable: record.navigation_target().is_some(),
        }
    }
}

pub fn render(state: &NotificationState, visibility: DropdownVisibility) -> WidgetView {
    let (body, mark_all_visible) = match state.list.content() {
        ListContent::NotLoaded => (PanelBody::Loading, false),
        ListContent::Failed(message) => (PanelBody::Error(message.clone()), false),
        ListContent::Loaded(items) if items.is_empty() => (PanelBody::Empty, false),
        ListContent::Loaded(items) => (
            PanelBody::Items(items.iter().map(ItemView::from_record).collect()),
            state.list.has_unread(),
        ),
    };
    WidgetView {
        badge: state.badge.label(),
        panel_open: visibility == DropdownVisibility::Open,
        body,
        mark_all_visible,
    }
}

/// Server text is untrusted: keep it as literal text and drop anything a
/// terminal would interpret (escape sequences, carriage returns, ...).
pub fn plain_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_space = false;
    for ch in raw.chars() {
        if ch.is_control() || ch.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ListResponse, MarkResponse};

    fn record(id: u64, read: bool) -> NotificationRecord {
        NotificationRecord {
            id: NotificationId(id),
            kind: NotificationKind::Chat,
            title: "Nova mensagem".into(),
            message: "Ana enviou uma mensagem".into(),
            relative_time: "há 2 minutos".into(),
            read,
            target_url: Some("/chat/ana/".into()),
        }
    }

    #[test]
    fn test_scenario_a_three_items_with_badge() {
        let mut state = NotificationState::new();
        state.apply_list(ListResponse {
            unread_total: 3,
            items: vec![record(1, false), record(2, true), record(3, false)],
        });
        let view = render(&state, DropdownVisibility::Open);
        assert_eq!(view.badge.as_deref(), Some("3"));
        assert!(view.mark_all_visible);
        let PanelBody::Items(items) = &view.body else {
            panic!("expected items, got {:?}", view.body);
        };
        assert_eq!(items.len(), 3);
        assert!(items[0].unread_dot);
        assert!(!items[1].unread_dot);
    }

    #[test]
    fn test_scenario_b_mark_read_patch() {
        let mut state = NotificationState::new();
        state.apply_list(ListResponse {
            unread_total: 3,
            items: vec![record(1, false), record(2, true), record(3, false)],
        });
        state.apply_mark_read(
            NotificationId(3),
            MarkResponse {
                unread_total: 2,
                success: true,
            },
        );
        let view = render(&state, DropdownVisibility::Open);
        assert_eq!(view.badge.as_deref(), Some("2"));
        let PanelBody::Items(items) = &view.body else {
            panic!("expected items");
        };
        assert!(items[2].read);
        assert!(!items[2].unread_dot);
        // Item 1 still unread, so the control stays.
        assert!(view.mark_all_visible);
    }

    #[test]
    fn test_scenario_c_empty_list() {
        let mut state = NotificationState::new();
        state.apply_list(ListResponse {
            unread_total: 0,
            items: Vec::new(),
        });
        let view = render(&state, DropdownVisibility::Open);
        assert_eq!(view.body, PanelBody::Empty);
        assert!(!view.mark_all_visible);
        assert_eq!(view.badge, None);
    }

    #[test]
    fn test_all_read_hides_mark_all() {
        let mut state = NotificationState::new();
        state.apply_list(ListResponse {
            unread_total: 0,
            items: vec![record(1, true)],
        });
        assert!(!render(&state, DropdownVisibility::Open).mark_all_visible);
    }

    #[test]
    fn test_not_loaded_and_failed() {
        let mut state = NotificationState::new();
        let view = render(&state, DropdownVisibility::Closed);
        assert_eq!(view.body, PanelBody::Loading);
        assert!(!view.panel_open);
        state.apply_list_failure();
        let view = render(&state, DropdownVisibility::Open);
        assert!(matches!(view.body, PanelBody::Error(_)));
        assert!(!view.mark_all_visible);
    }

    #[test]
    fn test_plain_text_strips_terminal_controls() {
        assert_eq!(plain_text("<b>hi</b>"), "<b>hi</b>");
        assert_eq!(plain_text("a\u{1b}[31mred\r\nline"), "a [31mred line");
        assert_eq!(plain_text("  spaced\t\tout  "), "spaced out");
    }
}
