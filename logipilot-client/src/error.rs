use logipilot_model::ModelError;
use thiserror::Error;

/// Unified error taxonomy for everything that crosses the gateway.
///
/// Three failure families matter to callers: the request never got an HTTP
/// response (`Transport`), the server answered with a failure
/// (`Unauthorized`, `Http`, `Rejected`), or the response was 2xx but unusable
/// (`MissingData`, `Decode`). Nothing here is process-fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced an HTTP response (DNS, refused, timeout).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authentication is missing or stale. The stored token has already
    /// been cleared; callers prompt for login and retry.
    #[error("unauthorized, please log in again")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose envelope carried an application-level error.
    #[error("server rejected the request: {0}")]
    Rejected(String),

    /// 2xx response with no payload where one is required. Callers treat
    /// this as "entity does not exist", distinct from an HTTP 404.
    #[error("empty response from server")]
    MissingData,

    /// Payload did not match the expected wire shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid identifier or value supplied locally.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// True when the failure means the entity does not exist, whichever
    /// layer reported it.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::MissingData | ApiError::Http { status: 404, .. }
        )
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
