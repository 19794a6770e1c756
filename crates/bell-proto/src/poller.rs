//! Periodic unread-count polling.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::runtime::RuntimeMessage;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// A running poll timer.  The first tick fires as soon as `ready` resolves,
/// then one every `POLL_INTERVAL` until `stop` (or drop).
pub struct PollingSession {
    handle: Option<JoinHandle<()>>,
}

impl PollingSession {
    pub fn start<F>(ready: F, tx: mpsc::Sender<RuntimeMessage>) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::start_with_period(ready, POLL_INTERVAL, tx)
    }

    pub fn start_with_period<F>(
        ready: F,
        period: Duration,
        tx: mpsc::Sender<RuntimeMessage>,
    ) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            ready.await;
            debug!(period_secs = period.as_secs(), "count polling started");
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(RuntimeMessage::PollTick).await.is_err() {
                    debug!("runtime gone, count polling ends");
                    break;
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the timer.  Only the first call does anything.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                debug!("count polling stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
