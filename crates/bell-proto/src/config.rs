use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "BELL_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the notification API lives and how to authenticate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Site root; navigation targets are resolved against it too.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the notification API under `base_url`.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,
    /// Session cookie value copied from a logged-in browser.  Empty = anonymous.
    #[serde(default)]
    pub session_cookie: String,
    #[serde(default = "default_csrf_cookie_name")]
    pub csrf_cookie_name: String,
    /// Page scraped for `csrfmiddlewaretoken` when the CSRF cookie is missing.
    /// Empty disables the fallback.
    #[serde(default = "default_csrf_form_page")]
    pub csrf_form_page: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Command used to open notification links, e.g. `"firefox --new-tab"`.
    /// Empty uses the platform opener.
    #[serde(default)]
    pub open_command: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_base: default_api_base(),
            session_cookie_name: default_session_cookie_name(),
            session_cookie: String::new(),
            csrf_cookie_name: default_csrf_cookie_name(),
            csrf_form_page: default_csrf_form_page(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_api_base() -> String {
    "/notificacoes/".to_string()
}

fn default_session_cookie_name() -> String {
    "sessionid".to_string()
}

fn default_csrf_cookie_name() -> String {
    "csrftoken".to_string()
}

fn default_csrf_form_page() -> String {
    "/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => platform::config_dir().join("config.toml"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}
