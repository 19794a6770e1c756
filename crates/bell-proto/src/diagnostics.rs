//! Where failed requests are reported.
//!
//! The widget never logs directly; it hands every failure to a
//! `DiagnosticsSink` together with the decision it took (log or suppress).
//! Production uses `TracingSink`; tests can plug in their own recorder.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tracing::{debug, error};

use crate::error::ClientError;

/// Which operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Count,
    MarkRead,
    MarkAllRead,
}

impl Operation {
    pub fn describe(self) -> &'static str {
        match self {
            Self::List => "loading notifications",
            Self::Count => "refreshing unread count",
            Self::MarkRead => "marking notification as read",
            Self::MarkAllRead => "marking all notifications as read",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Worth a log line.
    Logged,
    /// Expected failure; kept out of the logs.
    Suppressed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    pub at: DateTime<Local>,
    pub operation: Operation,
    pub disposition: Disposition,
    pub status: Option<u16>,
    pub message: String,
}

impl DiagnosticReport {
    pub fn new(operation: Operation, disposition: Disposition, err: &ClientError) -> Self {
        Self {
            at: Local::now(),
            operation,
            disposition,
            status: err.status(),
            message: err.to_string(),
        }
    }
}

pub trait DiagnosticsSink {
    fn report(&self, report: DiagnosticReport);
}

/// How many logged reports `TracingSink` keeps for display.
const HISTORY_LEN: usize = 200;

/// Emits through `tracing` and remembers the most recent logged reports.
#[derive(Clone, Default)]
pub struct TracingSink {
    history: Arc<Mutex<VecDeque<DiagnosticReport>>>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged reports, oldest first.
    pub fn history(&self) -> Vec<DiagnosticReport> {
        self.history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for TracingSink {
    fn report(&self, report: DiagnosticReport) {
        match report.disposition {
            Disposition::Suppressed => {
                debug!(
                    "suppressed error while {}: {}",
                    report.operation.describe(),
                    report.message
                );
            }
            Disposition::Logged => {
                error!("error while {}: {}", report.operation.describe(), report.message);
                if let Ok(mut history) = self.history.lock() {
                    history.push_back(report);
                    while history.len() > HISTORY_LEN {
                        history.pop_front();
                    }
                }
            }
        }
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<S> {
    fn report(&self, report: DiagnosticReport) {
        (**self).report(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_keeps_only_logged_reports() {
        let sink = TracingSink::new();
        sink.report(DiagnosticReport::new(
            Operation::Count,
            Disposition::Suppressed,
            &ClientError::Http { status: 404 },
        ));
        sink.report(DiagnosticReport::new(
            Operation::Count,
            Disposition::Logged,
            &ClientError::Http { status: 500 },
        ));
        let history = sink.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, Some(500));
        assert_eq!(history[0].operation, Operation::Count);
    }

    #[test]
    fn test_history_is_bounded() {
        let sink = TracingSink::new();
        for _ in 0..(HISTORY_LEN + 25) {
            sink.report(DiagnosticReport::new(
                Operation::MarkRead,
                Disposition::Logged,
                &ClientError::Http { status: 500 },
            ));
        }
        assert_eq!(sink.history().len(), HISTORY_LEN);
    }

    #[test]
    fn test_clones_share_history() {
        let sink = TracingSink::new();
        let other = sink.clone();
        other.report(DiagnosticReport::new(
            Operation::List,
            Disposition::Logged,
            &ClientError::Http { status: 502 },
        ));
        assert_eq!(sink.history().len(), 1);
    }
}
