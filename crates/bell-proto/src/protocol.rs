//! Wire types for the notification API.
//!
//! Field names on the wire follow the server (`total_nao_lidas`, `lida`, ...);
//! the Rust side uses English names through `serde(rename)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque notification identifier, stable across fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a notification is about.  Presentation only; never changes behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NotificationKind {
    #[serde(rename = "chat")]
    Chat,
    #[serde(rename = "pergunta")]
    Question,
    #[serde(rename = "resposta")]
    Answer,
    #[serde(rename = "avaliacao")]
    Rating,
    #[serde(rename = "compromisso")]
    Appointment,
    #[serde(rename = "orcamento")]
    Quote,
    #[serde(rename = "comentario_servico")]
    ServiceComment,
    /// `outro`, and anything the server sends that we don't recognise.
    #[default]
    #[serde(rename = "outro", other)]
    Other,
}

impl NotificationKind {
    /// Short label shown next to each row.
    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Rating => "rating",
            Self::Appointment => "agenda",
            Self::Quote => "quote",
            Self::ServiceComment => "comment",
            Self::Other => "note",
        }
    }
}

/// One notification as returned by `listar/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    #[serde(rename = "tipo", default)]
    pub kind: NotificationKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "mensagem")]
    pub message: String,
    /// Pre-formatted by the server ("há 5 minutos"); never parsed here.
    #[serde(rename = "tempo_relativo", default)]
    pub relative_time: String,
    #[serde(rename = "lida")]
    pub read: bool,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

impl NotificationRecord {
    /// Navigation target, if any.  `"#"` and the empty string mean "stay put".
    pub fn navigation_target(&self) -> Option<&str> {
        match self.target_url.as_deref().map(str::trim) {
            None | Some("") | Some("#") => None,
            Some(url) => Some(url),
        }
    }
}

/// Response of `GET listar/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "total_nao_lidas")]
    pub unread_total: i64,
    #[serde(rename = "notificacoes")]
    pub items: Vec<NotificationRecord>,
}

/// Response of `GET contar/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(rename = "total_nao_lidas")]
    pub unread_total: i64,
}

/// Response of both mark-read endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkResponse {
    #[serde(rename = "total_nao_lidas")]
    pub unread_total: i64,
    #[serde(default)]
    pub success: bool,
}

/// Relative paths under the API base.
pub mod paths {
    use super::NotificationId;

    pub const LIST: &str = "listar/";
    pub const COUNT: &str = "contar/";
    pub const MARK_ALL: &str = "marcar-todas-lidas/";

    pub fn mark_read(id: NotificationId) -> String {
        format!("{}/marcar-lida/", id)
    }
}
