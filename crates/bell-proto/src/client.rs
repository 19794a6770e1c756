//! Notification API client.
//!
//! Four calls, each a plain request/response: no retries, no caching of
//! results.  Callers cancel by dropping (or aborting) the returned future.

use std::sync::{Arc, Mutex};

use anyhow::Context;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::csrf;
use crate::error::ClientError;
use crate::protocol::{paths, CountResponse, ListResponse, MarkResponse, NotificationId};

pub struct NotificationClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    /// Site root, used for cookies and for resolving navigation targets.
    site: Url,
    /// API base, always ending in `/`.
    api: Url,
    csrf_cookie_name: String,
    form_page: Option<Url>,
    /// Token scraped from `form_page`, kept once found.
    form_token: Mutex<Option<String>>,
}

impl NotificationClient {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let site = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base_url {:?}", config.base_url))?;
        let mut api_base = config.api_base.clone();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }
        let api = site
            .join(&api_base)
            .with_context(|| format!("invalid api_base {:?}", config.api_base))?;

        let jar = Arc::new(Jar::default());
        if !config.session_cookie.is_empty() {
            jar.add_cookie_str(
                &format!("{}={}; Path=/", config.session_cookie_name, config.session_cookie),
                &site,
            );
        }

        let form_page = if config.csrf_form_page.trim().is_empty() {
            None
        } else {
            Some(
                site.join(config.csrf_form_page.trim())
                    .with_context(|| format!("invalid csrf_form_page {:?}", config.csrf_form_page))?,
            )
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("bell/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.request_timeout())
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            http,
            jar,
            site,
            api,
            csrf_cookie_name: config.csrf_cookie_name.clone(),
            form_page,
            form_token: Mutex::new(None),
        })
    }

    /// Full notification list plus the authoritative unread total.
    pub async fn list_notifications(&self) -> Result<ListResponse, ClientError> {
        self.get_json(paths::LIST).await
    }

    /// Unread total only; the cheap call used by the poller.
    pub async fn count_unread(&self) -> Result<CountResponse, ClientError> {
        self.get_json(paths::COUNT).await
    }

    pub async fn mark_read(&self, id: NotificationId) -> Result<MarkResponse, ClientError> {
        self.post_json(&paths::mark_read(id)).await
    }

    pub async fn mark_all_read(&self) -> Result<MarkResponse, ClientError> {
        self.post_json(paths::MARK_ALL).await
    }

    /// Resolve a (usually site-relative) navigation target to an absolute URL.
    pub fn resolve(&self, target: &str) -> Option<Url> {
        self.site.join(target).ok()
    }

    pub fn site(&self) -> &Url {
        &self.site
    }

    // ── Request plumbing ──────────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.api.clone();
        url.set_path(&format!("{}{}", self.api.path(), path));
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        let mut request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        match self.csrf_token().await {
            Some(token) => request = request.header(csrf::HEADER, token),
            None => warn!("no CSRF token available for POST {}", path),
        }
        let response = request.send().await?;
        decode(response).await
    }

    // ── CSRF token ────────────────────────────────────────────────────────────

    /// Cookie first, then the cached form token, then a fresh scrape.
    async fn csrf_token(&self) -> Option<String> {
        if let Some(token) = self.cookie_token() {
            return Some(token);
        }
        let cached = self.form_token.lock().ok().and_then(|t| t.clone());
        if cached.is_some() {
            return cached;
        }
        let page = self.form_page.as_ref()?;
        match self.scrape_form_token(page).await {
            Ok(Some(token)) => {
                if let Ok(mut slot) = self.form_token.lock() {
                    *slot = Some(token.clone());
                }
                Some(token)
            }
            // The page itself may have set the cookie.
            Ok(None) => self.cookie_token(),
            Err(e) => {
                debug!("CSRF form page {} unavailable: {}", page, e);
                self.cookie_token()
            }
        }
    }

    fn cookie_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.api)?;
        let header = header.to_str().ok()?;
        csrf::cookie_value(header, &self.csrf_cookie_name)
    }

    async fn scrape_form_token(&self, page: &Url) -> Result<Option<String>, ClientError> {
        let response = self
            .http
            .get(page.clone())
            .header(ACCEPT, "text/html")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
            });
        }
        let html = response.text().await?;
        Ok(csrf::form_field_token(&html))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
