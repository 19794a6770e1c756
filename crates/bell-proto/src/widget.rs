//! The notification widget: one explicit instance per host.
//!
//! Inputs (clicks, poll ticks, request completions) go in, `Effect`s come
//! out.  The widget never performs I/O itself; the host's runtime executes
//! the effects and feeds back a `Completion` for each request.

use tracing::debug;

use crate::diagnostics::{DiagnosticReport, DiagnosticsSink, Disposition, Operation};
use crate::dropdown::{Anchors, Dropdown, DropdownVisibility, PointerTarget, Transition};
use crate::error::ClientError;
use crate::interaction::{self, Effect};
use crate::protocol::{CountResponse, ListResponse, MarkResponse, NotificationId};
use crate::state::NotificationState;
use crate::view::{self, WidgetView};

/// Outcome of a request issued for an `Effect`.
#[derive(Debug)]
pub enum Completion {
    List(Result<ListResponse, ClientError>),
    Count(Result<CountResponse, ClientError>),
    MarkRead(NotificationId, Result<MarkResponse, ClientError>),
    MarkAll(Result<MarkResponse, ClientError>),
}

pub struct NotificationWidget<D: DiagnosticsSink> {
    state: NotificationState,
    dropdown: Dropdown,
    diagnostics: D,
}

impl<D: DiagnosticsSink> NotificationWidget<D> {
    /// Bind to the host's layout.  Returns `None` (inert widget: no input
    /// handling, no polling) when the toggle or the panel is missing.
    pub fn attach(anchors: &Anchors, diagnostics: D) -> Option<Self> {
        if !anchors.is_complete() {
            debug!("notification widget inert: toggle or panel anchor missing");
            return None;
        }
        Some(Self {
            state: NotificationState::new(),
            dropdown: Dropdown::new(),
            diagnostics,
        })
    }

    pub fn toggle_clicked(&mut self) -> Vec<Effect> {
        match self.dropdown.toggle() {
            Transition::Opened => vec![Effect::FetchList],
            Transition::Closed | Transition::Unchanged => Vec::new(),
        }
    }

    /// Route a pointer-down resolved against the current anchors.
    pub fn pointer_down(&mut self, target: PointerTarget) -> Vec<Effect> {
        match target {
            PointerTarget::Toggle => self.toggle_clicked(),
            PointerTarget::MarkAll => self.mark_all_clicked(),
            PointerTarget::Item(id) => self.item_clicked(id),
            PointerTarget::Panel | PointerTarget::Outside => {
                self.dropdown.pointer_down(target);
                Vec::new()
            }
        }
    }

    pub fn item_clicked(&mut self, id: NotificationId) -> Vec<Effect> {
        interaction::item_click(&self.state.list, id)
    }

    pub fn mark_all_clicked(&mut self) -> Vec<Effect> {
        interaction::mark_all_click()
    }

    pub fn poll_tick(&mut self) -> Vec<Effect> {
        vec![Effect::FetchCount]
    }

    /// Apply a finished request.  May ask for follow-up work (mark-all is
    /// confirmed by a fresh list fetch).
    pub fn on_completion(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::List(Ok(response)) => {
                debug!(
                    items = response.items.len(),
                    unread = response.unread_total,
                    "notification list loaded"
                );
                self.state.apply_list(response);
            }
            Completion::List(Err(err)) => {
                self.report(Operation::List, Disposition::Logged, &err);
                self.state.apply_list_failure();
            }
            Completion::Count(Ok(response)) => {
                if self.state.apply_count(response) {
                    debug!(unread = self.state.badge.unread_count(), "badge updated");
                }
            }
            Completion::Count(Err(err)) => {
                let disposition = if err.is_expected_for_background_poll() {
                    Disposition::Suppressed
                } else {
                    Disposition::Logged
                };
                self.report(Operation::Count, disposition, &err);
            }
            Completion::MarkRead(id, Ok(response)) => {
                if !response.success {
                    debug!(%id, "mark read answered without success flag, taking total anyway");
                }
                self.state.apply_mark_read(id, response);
            }
            Completion::MarkRead(id, Err(err)) => {
                debug!(%id, "mark read failed, leaving row as is");
                self.report(Operation::MarkRead, Disposition::Logged, &err);
            }
            Completion::MarkAll(Ok(response)) => {
                if !response.success {
                    debug!("mark all answered without success flag, refetching anyway");
                }
                self.state.apply_mark_all();
                return vec![Effect::FetchList];
            }
            Completion::MarkAll(Err(err)) => {
                self.report(Operation::MarkAllRead, Disposition::Logged, &err);
            }
        }
        Vec::new()
    }

    fn report(&self, operation: Operation, disposition: Disposition, err: &ClientError) {
        self.diagnostics
            .report(DiagnosticReport::new(operation, disposition, err));
    }

    pub fn view(&self) -> WidgetView {
        view::render(&self.state, self.dropdown.visibility())
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn visibility(&self) -> DropdownVisibility {
        self.dropdown.visibility()
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}
