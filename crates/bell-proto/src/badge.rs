//! Unread badge: one integer and its display rule.

/// Largest count shown as exact digits; anything above renders as `"99+"`.
pub const BADGE_CAP: u64 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BadgeState {
    unread_count: u64,
}

impl BadgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a count reported by the server.  Negative values are treated as
    /// zero.  Returns `true` if the displayed badge changed.
    pub fn apply_count(&mut self, n: i64) -> bool {
        let next = n.max(0) as u64;
        if next == self.unread_count {
            return false;
        }
        self.unread_count = next;
        true
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    /// Text to show on the badge, or `None` when the badge is hidden.
    pub fn label(&self) -> Option<String> {
        badge_label(self.unread_count)
    }
}

pub fn badge_label(n: u64) -> Option<String> {
    match n {
        0 => None,
        n if n > BADGE_CAP => Some(format!("{}+", BADGE_CAP)),
        n => Some(n.to_string()),
    }
}
