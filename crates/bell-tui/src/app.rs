//! App: component-based event loop hosting the notification widget.
//!
//! Architecture:
//! - `App` owns the components, the widget and `AppState` (read-only data for components).
//! - Terminal events arrive on an `AppMessage` channel from a blocking reader task.
//! - Request completions and poll ticks arrive on the runtime's own channel.
//! - The loop redraws only when something changed, then awaits the next message.
//! - Components return `Vec<Action>`; the App dispatches them to the widget.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use bell_proto::config::UiConfig;
use bell_proto::diagnostics::TracingSink;
use bell_proto::dropdown::{Anchors, PointerTarget, Region};
use bell_proto::interaction::Effect;
use bell_proto::runtime::{Navigation, Runtime, RuntimeMessage, SystemNavigator};
use bell_proto::{NotificationClient, NotificationWidget};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{header::Header, log_panel::LogPanel, notification_panel::NotificationPanel},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
}

pub struct App {
    client: Arc<NotificationClient>,
    ui: UiConfig,
    diagnostics: TracingSink,
    /// `None` while inert (anchors missing).
    widget: Option<NotificationWidget<TracingSink>>,
    state: AppState,

    header: Header,
    panel: NotificationPanel,
    log_panel: LogPanel,
    toast: ToastManager,

    /// Regions drawn in the last frame, for pointer hit-testing.
    anchors: Anchors,
    /// Where the panel can open with the current terminal size.
    panel_slot: Option<Rect>,
    should_quit: bool,
}

/// Terminal rect to widget region; empty rects count as absent.
fn region(r: Rect) -> Option<Region> {
    (r.width > 0 && r.height > 0).then(|| Region::new(r.x, r.y, r.width, r.height))
}

fn server_label(client: &NotificationClient) -> String {
    let site = client.site();
    match (site.host_str(), site.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => site.to_string(),
    }
}

impl App {
    pub fn new(client: Arc<NotificationClient>, ui: UiConfig) -> Self {
        let state = AppState::new(server_label(&client));
        Self {
            client,
            ui,
            diagnostics: TracingSink::new(),
            widget: None,
            state,
            header: Header::new(),
            panel: NotificationPanel::new(),
            log_panel: LogPanel::new(),
            toast: ToastManager::new(),
            anchors: Anchors::default(),
            panel_slot: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        let (runtime_tx, mut runtime_rx) = mpsc::channel::<RuntimeMessage>(1024);
        let navigator = SystemNavigator::from_config(&self.ui);
        info!("navigation via {}", navigator.program());
        let mut runtime = Runtime::new(Arc::clone(&self.client), Box::new(navigator), runtime_tx);

        // Polling waits for the first frame to be on screen.
        let (first_frame_tx, first_frame_rx) = oneshot::channel::<()>();
        let mut first_frame_tx = Some(first_frame_tx);
        let mut first_frame_rx = Some(first_frame_rx);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // Toast expiry.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(250));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.sync_state(&runtime);
                terminal.draw(|f| self.draw(f))?;
                if let Some(ready) = first_frame_tx.take() {
                    let _ = ready.send(());
                }
                // A fresh attach changes the bell, so draw once more.
                needs_redraw = self.try_attach(&mut runtime, &mut first_frame_rx);
                if needs_redraw {
                    continue;
                }
            }

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg, &mut runtime);
                }

                Some(msg) = runtime_rx.recv() => {
                    self.on_runtime_message(msg, &mut runtime);
                    // Drain whatever else completed meanwhile before redrawing.
                    while let Ok(next) = runtime_rx.try_recv() {
                        self.on_runtime_message(next, &mut runtime);
                    }
                    needs_redraw = true;
                }

                _ = toast_tick.tick() => {
                    needs_redraw = self.toast.tick();
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        runtime.shutdown();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("bell stopped");

        Ok(())
    }

    /// Bind the widget once the layout provides both the toggle and the panel.
    /// Returns `true` if it attached now.
    fn try_attach(
        &mut self,
        runtime: &mut Runtime,
        first_frame: &mut Option<oneshot::Receiver<()>>,
    ) -> bool {
        if self.widget.is_some() {
            return false;
        }
        let anchors = Anchors {
            toggle: region(self.header.bell_area()),
            panel: self.panel_slot.and_then(region),
            ..Anchors::default()
        };
        let Some(widget) = NotificationWidget::attach(&anchors, self.diagnostics.clone()) else {
            return false;
        };
        info!("notification widget attached");
        self.widget = Some(widget);
        self.toast.info("notifications ready, press n");
        if let Some(ready) = first_frame.take() {
            runtime.start_polling(async move {
                let _ = ready.await;
            });
        }
        true
    }

    // ── State sync ────────────────────────────────────────────────────────────

    fn sync_view(&mut self) {
        self.state.view = self.widget.as_ref().map(|w| w.view());
        self.state.input_mode = match &self.state.view {
            None => InputMode::Inert,
            Some(v) if v.panel_open => InputMode::Panel,
            Some(_) => InputMode::Normal,
        };
    }

    fn sync_state(&mut self, runtime: &Runtime) {
        self.sync_view();
        self.state.reports = self.diagnostics.history();
        self.state.in_flight = runtime.in_flight();
    }

    // ── Message handling ──────────────────────────────────────────────────────

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage, runtime: &mut Runtime) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                self.sync_view();
                let actions = self.handle_key(key);
                for action in actions {
                    self.dispatch(action, runtime);
                }
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => self.handle_mouse(mouse, runtime),
            AppMessage::Event(Event::Resize(w, h)) => {
                debug!("terminal resized to {}x{}", w, h);
                true
            }
            AppMessage::Event(_) => false,
        }
    }

    fn on_runtime_message(&mut self, msg: RuntimeMessage, runtime: &mut Runtime) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        let navigations = runtime.dispatch(widget, msg);
        self.report_navigations(navigations);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return vec![Action::Quit],
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('n') if self.widget.is_some() => return vec![Action::TogglePanel],
            _ => {}
        }
        if self.state.panel_open() {
            self.panel.handle_key(key, &self.state)
        } else {
            self.log_panel.handle_key(key, &self.state)
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, runtime: &mut Runtime) -> bool {
        let (col, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(_) => {
                let Some(widget) = self.widget.as_mut() else {
                    return false;
                };
                let target = self.anchors.target_at(col, row);
                debug!(?target, col, row, "pointer down");
                if target == PointerTarget::Toggle {
                    self.sync_view();
                    self.dispatch(Action::TogglePanel, runtime);
                } else {
                    let effects = widget.pointer_down(target);
                    self.execute(effects, runtime);
                }
                true
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let over_panel = self.anchors.panel.is_some_and(|r| r.contains(col, row));
                let actions = if over_panel {
                    self.panel.handle_mouse(event, Rect::default(), &self.state)
                } else {
                    self.log_panel.handle_mouse(event, Rect::default(), &self.state)
                };
                for action in actions {
                    self.dispatch(action, runtime);
                }
                true
            }
            _ => false,
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action, runtime: &mut Runtime) {
        let effects = match &action {
            Action::TogglePanel => {
                self.panel.on_action(&action, &self.state);
                self.widget.as_mut().map(|w| w.toggle_clicked())
            }
            // Esc only ever closes.
            Action::ClosePanel if self.state.panel_open() => {
                self.widget.as_mut().map(|w| w.toggle_clicked())
            }
            Action::ClosePanel => None,
            Action::OpenItem(id) => self.widget.as_mut().map(|w| w.item_clicked(*id)),
            Action::MarkAllRead => self.widget.as_mut().map(|w| w.mark_all_clicked()),
            Action::SelectUp(_) | Action::SelectDown(_) => {
                self.panel.on_action(&action, &self.state);
                None
            }
            Action::ScrollLog(_) => {
                self.log_panel.on_action(&action, &self.state);
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
        };
        if let Some(effects) = effects {
            self.execute(effects, runtime);
        }
        self.sync_view();
    }

    fn execute(&mut self, effects: Vec<Effect>, runtime: &mut Runtime) {
        let navigations = runtime.execute_all(effects);
        self.report_navigations(navigations);
    }

    fn report_navigations(&mut self, navigations: Vec<Navigation>) {
        for navigation in navigations {
            match navigation {
                Navigation::Opened(url) => self.toast.success(format!("opened {url}")),
                Navigation::Failed { target, error } => {
                    self.toast.error(format!("could not open {target}: {error}"))
                }
            }
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | separator | body | keys bar ───────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        let (header_area, sep_area, body_area, keys_area) = (outer[0], outer[1], outer[2], outer[3]);

        self.header.draw(frame, header_area, false, &self.state);
        status_bar::draw_separator(frame, sep_area);

        let panel_open = self.state.panel_open();
        self.log_panel
            .draw(frame, body_area, !panel_open, &self.state);

        // ── Notification panel overlay ────────────────────────────────────────
        self.panel_slot = NotificationPanel::slot(body_area, self.header.bell_area());
        let mut panel_area = None;
        match (self.panel_slot, self.state.view.as_ref()) {
            (Some(slot), Some(view)) if panel_open => {
                let area = NotificationPanel::area(slot, view);
                self.panel.draw(frame, area, true, &self.state);
                panel_area = Some(area);
            }
            _ => self.panel.clear_regions(),
        }

        status_bar::draw_keys_bar(frame, keys_area, self.state.input_mode, self.state.in_flight);
        self.toast.draw(frame, area);

        self.anchors = Anchors {
            toggle: region(self.header.bell_area()),
            panel: panel_area.and_then(region),
            mark_all: self.panel.mark_all_area().and_then(region),
            items: self
                .panel
                .item_areas()
                .iter()
                .filter_map(|(id, r)| region(*r).map(|g| (*id, g)))
                .collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bell_proto::config::ServerConfig;

    #[test]
    fn test_empty_rects_are_not_regions() {
        assert_eq!(region(Rect::default()), None);
        assert_eq!(region(Rect::new(1, 2, 0, 4)), None);
        assert_eq!(region(Rect::new(1, 2, 3, 4)), Some(Region::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_server_label_keeps_explicit_port() {
        let client = NotificationClient::new(&ServerConfig {
            base_url: "http://127.0.0.1:8000".into(),
            ..ServerConfig::default()
        })
        .unwrap();
        assert_eq!(server_label(&client), "127.0.0.1:8000");

        let client = NotificationClient::new(&ServerConfig {
            base_url: "https://example.org".into(),
            ..ServerConfig::default()
        })
        .unwrap();
        assert_eq!(server_label(&client), "example.org");
    }

    #[test]
    fn test_keys_route_to_log_until_attached() {
        let client = NotificationClient::new(&ServerConfig::default()).unwrap();
        let mut app = App::new(Arc::new(client), UiConfig::default());
        assert_eq!(
            app.handle_key(KeyEvent::from(KeyCode::Char('n'))),
            Vec::<Action>::new()
        );
        assert_eq!(
            app.handle_key(KeyEvent::from(KeyCode::Up)),
            vec![Action::ScrollLog(-1)]
        );
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            vec![Action::Quit]
        );
    }
}
