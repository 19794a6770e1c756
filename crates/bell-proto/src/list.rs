//! Locally cached notification list.
//!
//! Rebuilt wholesale from each successful `listar/` response and patched in
//! place after a confirmed mark-read.  Never mutated speculatively.

use crate::protocol::{NotificationId, NotificationRecord};

/// Message shown in place of the list when a fetch fails.
pub const LOAD_ERROR_MESSAGE: &str = "Could not load notifications";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListContent {
    /// No fetch has completed yet.
    #[default]
    NotLoaded,
    Loaded(Vec<NotificationRecord>),
    /// The last fetch failed; the list area shows this message instead.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListState {
    content: ListContent,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, items: Vec<NotificationRecord>) {
        self.content = ListContent::Loaded(items);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.content = ListContent::Failed(message.into());
    }

    /// Flip one record to read.  Returns `true` only if something changed:
    /// absent ids and already-read records are left alone.
    pub fn mark_item_read(&mut self, id: NotificationId) -> bool {
        let ListContent::Loaded(items) = &mut self.content else {
            return false;
        };
        match items.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.read => {
                record.read = true;
                true
            }
            _ => false,
        }
    }

    pub fn content(&self) -> &ListContent {
        &self.content
    }

    /// Records currently loaded (empty when not loaded or failed).
    pub fn records(&self) -> &[NotificationRecord] {
        match &self.content {
            ListContent::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn get(&self, id: NotificationId) -> Option<&NotificationRecord> {
        self.records().iter().find(|r| r.id == id)
    }

    pub fn has_unread(&self) -> bool {
        self.records().iter().any(|r| !r.read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::NotificationKind;

    fn record(id: u64, read: bool) -> NotificationRecord {
        NotificationRecord {
            id: NotificationId(id),
            kind: NotificationKind::Chat,
            title: format!("title {id}"),
            message: format!("message {id}"),
            relative_time: "agora".into(),
            read,
            target_url: None,
        }
    }

    #[test]
    fn test_starts_not_loaded() {
        let list = ListState::new();
        assert_eq!(list.content(), &ListContent::NotLoaded);
        assert!(list.records().is_empty());
        assert!(!list.has_unread());
    }

    #[test]
    fn test_mark_item_read_flips_unread_once() {
        let mut list = ListState::new();
        list.replace_all(vec![record(1, false), record(2, true)]);
        assert!(list.mark_item_read(NotificationId(1)));
        assert!(list.get(NotificationId(1)).unwrap().read);
        assert!(!list.mark_item_read(NotificationId(1)));
        assert!(!list.has_unread());
    }

    #[test]
    fn test_mark_item_read_ignores_absent_and_read() {
        let mut list = ListState::new();
        list.replace_all(vec![record(1, false), record(2, true)]);
        let before = list.clone();
        assert!(!list.mark_item_read(NotificationId(2)));
        assert!(!list.mark_item_read(NotificationId(99)));
        assert_eq!(list, before);
    }

    #[test]
    fn test_failure_drops_records() {
        let mut list = ListState::new();
        list.replace_all(vec![record(1, false)]);
        list.fail(LOAD_ERROR_MESSAGE);
        assert!(list.records().is_empty());
        assert!(!list.mark_item_read(NotificationId(1)));
        assert_eq!(
            list.content(),
            &ListContent::Failed(LOAD_ERROR_MESSAGE.to_string())
        );
    }
}
