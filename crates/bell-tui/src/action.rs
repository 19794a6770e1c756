//! Action enum: user intents produced by components, dispatched by the App.

use bell_proto::protocol::NotificationId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Notifications ────────────────────────────────────────────────────────
    TogglePanel,
    ClosePanel,
    OpenItem(NotificationId),
    MarkAllRead,

    // ── Navigation ───────────────────────────────────────────────────────────
    SelectUp(usize),
    SelectDown(usize),
    ScrollLog(isize),

    // ── App ──────────────────────────────────────────────────────────────────
    Quit,
}
