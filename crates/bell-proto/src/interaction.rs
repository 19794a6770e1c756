//! User actions on the panel and the requests they turn into.

use crate::list::ListState;
use crate::protocol::NotificationId;

/// Side effects the widget asks its host runtime to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchList,
    FetchCount,
    MarkRead(NotificationId),
    MarkAllRead,
    /// Open a navigation target (as sent by the server, possibly relative).
    Navigate(String),
}

/// Click on a row.  Mark-read (if unread) and navigation (if any) are both
/// dispatched at once; navigation never waits on the mark-read result.
pub fn item_click(list: &ListState, id: NotificationId) -> Vec<Effect> {
    let Some(record) = list.get(id) else {
        return Vec::new();
    };
    let mut effects = Vec::with_capacity(2);
    if !record.read {
        effects.push(Effect::MarkRead(id));
    }
    if let Some(target) = record.navigation_target() {
        effects.push(Effect::Navigate(target.to_string()));
    }
    effects
}

/// Click on "mark all read".
pub fn mark_all_click() -> Vec<Effect> {
    vec![Effect::MarkAllRead]
}
