//! AppState: read-only data shared with every component during render/event.
//!
//! Only the App event loop writes to it, once per redraw.

use bell_proto::diagnostics::DiagnosticReport;
use bell_proto::view::WidgetView;

use crate::widgets::status_bar::InputMode;

#[derive(Debug, Clone)]
pub struct AppState {
    /// `host:port` of the notification server.
    pub server: String,
    /// `None` while the widget is inert.
    pub view: Option<WidgetView>,
    /// Logged diagnostics, oldest first.
    pub reports: Vec<DiagnosticReport>,
    pub in_flight: usize,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(server: String) -> Self {
        Self {
            server,
            view: None,
            reports: Vec::new(),
            in_flight: 0,
            input_mode: InputMode::Inert,
        }
    }

    pub fn panel_open(&self) -> bool {
        self.view.as_ref().is_some_and(|v| v.panel_open)
    }
}
