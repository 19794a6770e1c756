use reqwest::StatusCode;

/// Request-level failure of the notification API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never completed (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// The server answered outside the 2xx range.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// The body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    Parse(#[source] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// 403 (no session) and 404 (endpoint absent) are expected for viewers
    /// without notifications and are not worth reporting from a background poll.
    pub fn is_expected_for_background_poll(&self) -> bool {
        matches!(
            self.status().and_then(|s| StatusCode::from_u16(s).ok()),
            Some(StatusCode::FORBIDDEN) | Some(StatusCode::NOT_FOUND)
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
