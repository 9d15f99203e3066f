use serde::{Deserialize, Serialize};

use crate::page::PageInfo;

/// Standard response wrapper used by every LogiPilot endpoint.
///
/// A 2xx response may still carry `data: null`; callers that require a
/// payload treat that as "entity does not exist", distinct from an HTTP
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        ApiEnvelope {
            data: Some(data),
            pagination: None,
            error: None,
            message: None,
        }
    }

    pub fn success_page(data: T, pagination: PageInfo) -> Self {
        ApiEnvelope {
            data: Some(data),
            pagination: Some(pagination),
            error: None,
            message: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        ApiEnvelope {
            data: None,
            pagination: None,
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
