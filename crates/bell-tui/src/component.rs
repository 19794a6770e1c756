//! Component trait: the interface every UI panel implements.
//!
//! - Components own their local state (selection, scroll) and render themselves.
//! - They read `AppState` for everything else, and never mutate it.
//! - They answer input with `Vec<Action>`; the App dispatches those.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Only called while this component has the keyboard.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Wheel events over `area`.  Clicks are hit-tested by the App.
    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Receive an action dispatched by the App.
    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action>;

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
