#![allow(dead_code)]

//! In-process stand-in for the notification API, bound to an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bell_proto::config::ServerConfig;
use bell_proto::protocol::{NotificationId, NotificationKind, NotificationRecord};
use bell_proto::NotificationClient;
use serde_json::json;

pub const SESSION: &str = "test-session";
pub const CSRF_TOKEN: &str = "tok+en/42";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    List,
    Count,
    MarkRead,
    MarkAll,
    FormPage,
}

pub struct FakeState {
    pub items: Vec<NotificationRecord>,
    /// Forced failures, by endpoint.
    pub failures: HashMap<Endpoint, StatusCode>,
    /// Raw body returned by `contar/` instead of JSON.
    pub count_body: Option<String>,
    pub list_delay: Option<Duration>,
    /// Set the `csrftoken` cookie on API responses (as a rendered page would).
    pub csrf_cookie_on_api: bool,
    /// Serve `csrfmiddlewaretoken` on the form page.
    pub form_field: bool,
    pub hits: HashMap<Endpoint, usize>,
    /// `X-CSRFToken` header of every POST, in arrival order.
    pub csrf_headers: Vec<Option<String>>,
}

impl FakeState {
    fn unread(&self) -> i64 {
        self.items.iter().filter(|r| !r.read).count() as i64
    }

    fn hit(&mut self, endpoint: Endpoint) {
        *self.hits.entry(endpoint).or_default() += 1;
    }

    /// Forced failure, missing session or bad CSRF header.
    fn reject(&mut self, endpoint: Endpoint, headers: &HeaderMap, is_post: bool) -> Option<Response> {
        if let Some(status) = self.failures.get(&endpoint) {
            return Some((*status).into_response());
        }
        let has_session = headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|c| c.split(';').any(|p| p.trim() == format!("sessionid={SESSION}")));
        if !has_session {
            return Some(StatusCode::FORBIDDEN.into_response());
        }
        if is_post {
            let token = headers
                .get("X-CSRFToken")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let ok = token.as_deref() == Some(CSRF_TOKEN);
            self.csrf_headers.push(token);
            if !ok {
                return Some(StatusCode::FORBIDDEN.into_response());
            }
        }
        None
    }

    fn decorate(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.csrf_cookie_on_api {
            let cookie = format!("csrftoken={}; Path=/", urlencoding::encode(CSRF_TOKEN));
            if let Ok(value) = cookie.parse() {
                response.headers_mut().insert(SET_COOKIE, value);
            }
        }
        response
    }
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeApi {
    pub addr: SocketAddr,
    state: Shared,
}

impl FakeApi {
    pub async fn start(items: Vec<NotificationRecord>) -> Result<Self> {
        let state = Arc::new(Mutex::new(FakeState {
            items,
            failures: HashMap::new(),
            count_body: None,
            list_delay: None,
            csrf_cookie_on_api: false,
            form_field: true,
            hits: HashMap::new(),
            csrf_headers: Vec::new(),
        }));

        let app = Router::new()
            .route("/", get(form_page))
            .route("/notificacoes/listar/", get(listar))
            .route("/notificacoes/contar/", get(contar))
            .route("/notificacoes/:id/marcar-lida/", post(marcar_lida))
            .route("/notificacoes/marcar-todas-lidas/", post(marcar_todas_lidas))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("binding fake API")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { addr, state })
    }

    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            base_url: format!("http://{}", self.addr),
            session_cookie: SESSION.to_string(),
            request_timeout_secs: 5,
            ..ServerConfig::default()
        }
    }

    pub fn client(&self) -> NotificationClient {
        NotificationClient::new(&self.config()).expect("client for fake API")
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake API state")
    }

    pub fn fail(&self, endpoint: Endpoint, status: StatusCode) {
        self.state().failures.insert(endpoint, status);
    }

    pub fn heal(&self, endpoint: Endpoint) {
        self.state().failures.remove(&endpoint);
    }

    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.state().hits.get(&endpoint).copied().unwrap_or(0)
    }
}

pub fn record(id: u64, read: bool, url: Option<&str>) -> NotificationRecord {
    NotificationRecord {
        id: NotificationId(id),
        kind: NotificationKind::Chat,
        title: format!("Nova mensagem {id}"),
        message: format!("Mensagem número {id}"),
        relative_time: "há 5 minutos".into(),
        read,
        target_url: url.map(str::to_string),
    }
}

/// Scenario A: three notifications, two unread.
pub fn scenario_a_items() -> Vec<NotificationRecord> {
    vec![
        record(1, false, Some("/chat/ana/")),
        record(2, true, Some("/chat/bruno/")),
        record(3, false, Some("/evento/9/")),
    ]
}

/// A base URL nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

async fn form_page(State(state): State<Shared>) -> Response {
    let mut st = state.lock().expect("state");
    st.hit(Endpoint::FormPage);
    if let Some(status) = st.failures.get(&Endpoint::FormPage) {
        return (*status).into_response();
    }
    let field = if st.form_field {
        format!(r#"<input type="hidden" name="csrfmiddlewaretoken" value="{CSRF_TOKEN}">"#)
    } else {
        String::new()
    };
    Html(format!("<html><body><form method=\"post\">{field}</form></body></html>")).into_response()
}

async fn listar(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let delay = state.lock().expect("state").list_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let mut st = state.lock().expect("state");
    st.hit(Endpoint::List);
    if let Some(rejection) = st.reject(Endpoint::List, &headers, false) {
        return rejection;
    }
    let body = json!({
        "total_nao_lidas": st.unread(),
        "notificacoes": st.items,
    });
    st.decorate(Json(body))
}

async fn contar(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut st = state.lock().expect("state");
    st.hit(Endpoint::Count);
    if let Some(rejection) = st.reject(Endpoint::Count, &headers, false) {
        return rejection;
    }
    if let Some(raw) = st.count_body.clone() {
        return st.decorate(raw);
    }
    st.decorate(Json(json!({ "total_nao_lidas": st.unread() })))
}

async fn marcar_lida(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut st = state.lock().expect("state");
    st.hit(Endpoint::MarkRead);
    if let Some(rejection) = st.reject(Endpoint::MarkRead, &headers, true) {
        return rejection;
    }
    let Some(item) = st.items.iter_mut().find(|r| r.id == NotificationId(id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    item.read = true;
    st.decorate(Json(json!({ "success": true, "total_nao_lidas": st.unread() })))
}

async fn marcar_todas_lidas(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut st = state.lock().expect("state");
    st.hit(Endpoint::MarkAll);
    if let Some(rejection) = st.reject(Endpoint::MarkAll, &headers, true) {
        return rejection;
    }
    for item in &mut st.items {
        item.read = true;
    }
    st.decorate(Json(json!({ "success": true, "total_nao_lidas": 0 })))
}
