//! Executes widget effects against the server.
//!
//! Every request runs as its own tokio task and reports back through the
//! host's `RuntimeMessage` channel; the host's event loop hands the message
//! to `Runtime::dispatch`, which applies it to the widget.  Nothing here
//! blocks the loop.

use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::Context;
use reqwest::Url;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::NotificationClient;
use crate::config::UiConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::interaction::Effect;
use crate::platform;
use crate::poller::PollingSession;
use crate::tasks::{RequestKey, RequestKind, TaskRegistry};
use crate::widget::{Completion, NotificationWidget};

#[derive(Debug)]
pub enum RuntimeMessage {
    PollTick,
    Finished {
        key: RequestKey,
        completion: Completion,
    },
}

/// What happened to a navigation request, for the host to display.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Opened(Url),
    Failed { target: String, error: String },
}

/// Opens a resolved navigation target.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &Url) -> anyhow::Result<()>;
}

/// Hands URLs to an external program (browser or desktop opener).
pub struct SystemNavigator {
    program: String,
    args: Vec<String>,
}

impl SystemNavigator {
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut words = ui.open_command.split_whitespace().map(str::to_string);
        match words.next() {
            Some(program) => Self {
                program,
                args: words.collect(),
            },
            None => {
                let (program, args) = platform::default_open_command();
                Self {
                    program: program.to_string(),
                    args: args.iter().map(|a| a.to_string()).collect(),
                }
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Navigator for SystemNavigator {
    fn open(&self, url: &Url) -> anyhow::Result<()> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.program))?;
        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    warn!("{} exited with {}", program, status);
                }
                Ok(_) => {}
                Err(e) => warn!("waiting for {} failed: {}", program, e),
            }
        });
        Ok(())
    }
}

pub struct Runtime {
    client: Arc<NotificationClient>,
    navigator: Box<dyn Navigator>,
    tasks: TaskRegistry,
    tx: mpsc::Sender<RuntimeMessage>,
    polling: Option<PollingSession>,
}

impl Runtime {
    pub fn new(
        client: Arc<NotificationClient>,
        navigator: Box<dyn Navigator>,
        tx: mpsc::Sender<RuntimeMessage>,
    ) -> Self {
        Self {
            client,
            navigator,
            tasks: TaskRegistry::new(),
            tx,
            polling: None,
        }
    }

    /// Start count polling once `ready` resolves.  A second call while a
    /// session exists is ignored.
    pub fn start_polling<F>(&mut self, ready: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.polling.is_some() {
            return false;
        }
        self.polling = Some(PollingSession::start(ready, self.tx.clone()));
        true
    }

    /// Run a batch of effects; returns the navigation outcomes among them.
    pub fn execute_all(&mut self, effects: Vec<Effect>) -> Vec<Navigation> {
        effects
            .into_iter()
            .filter_map(|effect| self.execute(effect))
            .collect()
    }

    pub fn execute(&mut self, effect: Effect) -> Option<Navigation> {
        match effect {
            Effect::FetchList => self.spawn_request(RequestKind::List),
            Effect::FetchCount => self.spawn_request(RequestKind::Count),
            Effect::MarkRead(id) => self.spawn_request(RequestKind::MarkRead(id)),
            Effect::MarkAllRead => self.spawn_request(RequestKind::MarkAll),
            Effect::Navigate(target) => return Some(self.navigate(target)),
        }
        None
    }

    /// Apply a message from the channel to `widget`, running whatever
    /// follow-up effects it produces.
    pub fn dispatch<D: DiagnosticsSink>(
        &mut self,
        widget: &mut NotificationWidget<D>,
        message: RuntimeMessage,
    ) -> Vec<Navigation> {
        let effects = match message {
            RuntimeMessage::PollTick => widget.poll_tick(),
            RuntimeMessage::Finished { key, completion } => {
                if !self.tasks.finish(key) {
                    debug!(%key, "completion for unregistered request");
                }
                widget.on_completion(completion)
            }
        };
        self.execute_all(effects)
    }

    fn spawn_request(&mut self, kind: RequestKind) {
        let key = self.tasks.next_key(kind);
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        debug!(%key, "request issued");
        let handle = tokio::spawn(async move {
            let completion = match kind {
                RequestKind::List => Completion::List(client.list_notifications().await),
                RequestKind::Count => Completion::Count(client.count_unread().await),
                RequestKind::MarkRead(id) => Completion::MarkRead(id, client.mark_read(id).await),
                RequestKind::MarkAll => Completion::MarkAll(client.mark_all_read().await),
            };
            let _ = tx.send(RuntimeMessage::Finished { key, completion }).await;
        });
        self.tasks.register(key, handle.abort_handle());
    }

    fn navigate(&self, target: String) -> Navigation {
        let Some(url) = self.client.resolve(&target) else {
            warn!("cannot resolve navigation target {:?}", target);
            return Navigation::Failed {
                target,
                error: "invalid link".to_string(),
            };
        };
        match self.navigator.open(&url) {
            Ok(()) => {
                info!("opened {}", url);
                Navigation::Opened(url)
            }
            Err(e) => {
                warn!("failed to open {}: {:#}", url, e);
                Navigation::Failed {
                    target,
                    error: format!("{:#}", e),
                }
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.in_flight()
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().is_some_and(PollingSession::is_running)
    }

    /// Teardown: stop the poll timer and abort outstanding requests.
    pub fn shutdown(&mut self) {
        if let Some(mut polling) = self.polling.take() {
            polling.stop();
        }
        let aborted = self.tasks.cancel_all();
        if aborted > 0 {
            info!("aborted {} in-flight notification request(s)", aborted);
        }
    }
}
