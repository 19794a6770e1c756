//! Reconciliation of server results into the badge and the list.
//!
//! Rules:
//! - The badge only ever shows a count the server reported.  It is never
//!   derived from the list nor decremented locally.
//! - The list changes only after a call succeeded.
//! - Results are applied in completion order, whatever the issue order was.

use crate::badge::BadgeState;
use crate::list::{ListState, LOAD_ERROR_MESSAGE};
use crate::protocol::{CountResponse, ListResponse, MarkResponse, NotificationId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationState {
    pub badge: BadgeState,
    pub list: ListState,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful `listar/`: replace the list and take the total from the
    /// same response.
    pub fn apply_list(&mut self, response: ListResponse) {
        self.badge.apply_count(response.unread_total);
        self.list.replace_all(response.items);
    }

    /// Failed `listar/`: the list area shows an error; the badge is untouched.
    pub fn apply_list_failure(&mut self) {
        self.list.fail(LOAD_ERROR_MESSAGE);
    }

    /// Successful `contar/` poll.
    pub fn apply_count(&mut self, response: CountResponse) -> bool {
        self.badge.apply_count(response.unread_total)
    }

    /// Successful mark-read of `id`: patch that row and assert the server total.
    pub fn apply_mark_read(&mut self, id: NotificationId, response: MarkResponse) {
        self.list.mark_item_read(id);
        self.badge.apply_count(response.unread_total);
    }

    /// Successful mark-all.  The badge drops to zero right away; the list
    /// catches up when the follow-up `listar/` lands.
    pub fn apply_mark_all(&mut self) {
        self.badge.apply_count(0);
    }
}
