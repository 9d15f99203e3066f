use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Bearer token as issued by `POST /auth/login`. Field spellings follow the
/// OAuth2 convention the backend uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

impl AuthToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        AuthToken {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
        }
    }

    /// Value for the `Authorization` request header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Public profile of the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Successful login payload: token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub user: SessionUser,
}

impl AuthSession {
    pub fn token(&self) -> AuthToken {
        AuthToken {
            access_token: self.access_token.clone(),
            token_type: self.token_type.clone(),
        }
    }
}
