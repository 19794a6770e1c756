pub mod badge;
pub mod client;
pub mod config;
pub mod csrf;
pub mod diagnostics;
pub mod dropdown;
pub mod error;
pub mod interaction;
pub mod list;
pub mod platform;
pub mod poller;
pub mod protocol;
pub mod runtime;
pub mod state;
pub mod tasks;
pub mod view;
pub mod widget;

pub use client::NotificationClient;
pub use config::Config;
pub use error::ClientError;
pub use widget::{Completion, NotificationWidget};
