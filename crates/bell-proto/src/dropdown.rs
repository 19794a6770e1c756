//! Dropdown visibility and pointer hit-testing.
//!
//! The host lays out the bell toggle, the panel and the rows inside it, and
//! hands us the resulting `Anchors`.  Pointer events are resolved against
//! those regions into a `PointerTarget`; the controller only sees targets.

use crate::protocol::NotificationId;

/// Rectangular screen region in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.width > 0
            && self.height > 0
            && col >= self.x
            && col < self.x.saturating_add(self.width)
            && row >= self.y
            && row < self.y.saturating_add(self.height)
    }
}

/// Host-provided regions the widget reacts to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Anchors {
    pub toggle: Option<Region>,
    pub panel: Option<Region>,
    /// "Mark all read" control, when currently drawn.
    pub mark_all: Option<Region>,
    /// Rows drawn in the panel, topmost first.
    pub items: Vec<(NotificationId, Region)>,
}

impl Anchors {
    /// The toggle and the panel are required; everything else is optional.
    pub fn is_complete(&self) -> bool {
        self.toggle.is_some() && self.panel.is_some()
    }

    /// Resolve a pointer position, most specific region first.
    pub fn target_at(&self, col: u16, row: u16) -> PointerTarget {
        if self.toggle.is_some_and(|r| r.contains(col, row)) {
            return PointerTarget::Toggle;
        }
        if self.mark_all.is_some_and(|r| r.contains(col, row)) {
            return PointerTarget::MarkAll;
        }
        if let Some((id, _)) = self.items.iter().find(|(_, r)| r.contains(col, row)) {
            return PointerTarget::Item(*id);
        }
        if self.panel.is_some_and(|r| r.contains(col, row)) {
            return PointerTarget::Panel;
        }
        PointerTarget::Outside
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Toggle,
    MarkAll,
    Item(NotificationId),
    /// Inside the panel but on nothing actionable.
    Panel,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownVisibility {
    #[default]
    Closed,
    Open,
}

/// Result of feeding an input to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed,
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    visibility: DropdownVisibility,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> DropdownVisibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility == DropdownVisibility::Open
    }

    /// Trigger click.
    pub fn toggle(&mut self) -> Transition {
        match self.visibility {
            DropdownVisibility::Closed => {
                self.visibility = DropdownVisibility::Open;
                Transition::Opened
            }
            DropdownVisibility::Open => {
                self.visibility = DropdownVisibility::Closed;
                Transition::Closed
            }
        }
    }

    /// Document-level pointer-down that was not handled by the toggle or by
    /// a control inside the panel.
    pub fn pointer_down(&mut self, target: PointerTarget) -> Transition {
        match (self.visibility, target) {
            (DropdownVisibility::Open, PointerTarget::Outside) => {
                self.visibility = DropdownVisibility::Closed;
                Transition::Closed
            }
            _ => Transition::Unchanged,
        }
    }
}
