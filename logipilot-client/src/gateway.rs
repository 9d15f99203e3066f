use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info};

use logipilot_model::{ApiEnvelope, AuthSession, AuthToken, Credentials};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// HTTP gateway to the LogiPilot REST API with bearer-token support.
///
/// Cloning is cheap and clones share the token store, so one login covers
/// every handle.
#[derive(Clone, Debug)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
    api_version: String,
    token_store: Arc<RwLock<Option<AuthToken>>>,
}

impl ApiGateway {
    /// Create a new gateway against the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        let base_url = base_url.into();
        info!("creating API gateway for {base_url}");

        Self {
            client,
            base_url,
            api_version: "v1".to_string(),
            token_store: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.server_url.clone())
    }

    /// Build a versioned API URL.
    pub fn build_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/api/{}/{}", self.base_url, self.api_version, path)
    }

    /// Set or clear the stored authentication token.
    pub async fn set_token(&self, token: Option<AuthToken>) {
        *self.token_store.write().await = token;
    }

    pub async fn token(&self) -> Option<AuthToken> {
        self.token_store.read().await.clone()
    }

    /// Authenticate and store the bearer token for subsequent requests.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        let session: AuthSession = self.post("auth/login", credentials).await?;
        self.set_token(Some(session.token())).await;
        info!("logged in as {}", session.user.email);
        Ok(session)
    }

    /// Drop the stored token; subsequent requests go out anonymous.
    pub async fn logout(&self) {
        self.set_token(None).await;
        debug!("cleared stored auth token");
    }

    /// Attach the Authorization header when a token is stored. Anonymous
    /// requests are legal; the server decides what they may see.
    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.header("Authorization", token.header_value())
        } else {
            builder
        }
    }

    async fn execute_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<ApiEnvelope<T>> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Token might be expired, clear it
            self.set_token(None).await;
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;
        decode_envelope(status, &body)
    }

    async fn execute_data<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let envelope = self.execute_envelope(request).await?;
        envelope.into_data().ok_or(ApiError::MissingData)
    }

    /// Execute a request whose response body carries nothing we need.
    async fn execute_no_content(&self, request: RequestBuilder) -> ApiResult<()> {
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::CREATED => Ok(()),
            StatusCode::UNAUTHORIZED => {
                // Token might be expired, clear it
                self.set_token(None).await;
                Err(ApiError::Unauthorized)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::http(status.as_u16(), error_message(&body)))
            }
        }
    }

    // Public API methods

    /// GET request returning the envelope's required payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!("GET {}", path);
        let request = self.client.get(self.build_url(path));
        let request = self.build_request(request).await;
        self.execute_data(request).await
    }

    /// GET request with query parameters.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {} (with query)", path);
        let request = self.client.get(self.build_url(path)).query(query);
        let request = self.build_request(request).await;
        self.execute_data(request).await
    }

    /// GET request returning the whole envelope, for callers that need the
    /// pagination block alongside the data.
    pub async fn get_envelope_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> ApiResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {} (with query, paged)", path);
        let request = self.client.get(self.build_url(path)).query(query);
        let request = self.build_request(request).await;
        self.execute_envelope(request).await
    }

    /// POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let request = self.client.post(self.build_url(path)).json(body);
        let request = self.build_request(request).await;
        self.execute_data(request).await
    }

    /// POST request with an empty body where only success matters.
    pub async fn post_no_content(&self, path: &str) -> ApiResult<()> {
        debug!("POST {} (no content)", path);
        let request = self
            .client
            .post(self.build_url(path))
            .json(&serde_json::json!({}));
        let request = self.build_request(request).await;
        self.execute_no_content(request).await
    }

    /// PUT request with a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug!("PUT {}", path);
        let request = self.client.put(self.build_url(path)).json(body);
        let request = self.build_request(request).await;
        self.execute_data(request).await
    }

    /// PUT request with an empty body where only success matters.
    pub async fn put_no_content(&self, path: &str) -> ApiResult<()> {
        debug!("PUT {} (no content)", path);
        let request = self
            .client
            .put(self.build_url(path))
            .json(&serde_json::json!({}));
        let request = self.build_request(request).await;
        self.execute_no_content(request).await
    }

    /// DELETE request where only success matters.
    pub async fn delete_no_content(&self, path: &str) -> ApiResult<()> {
        debug!("DELETE {}", path);
        let request = self.client.delete(self.build_url(path));
        let request = self.build_request(request).await;
        self.execute_no_content(request).await
    }
}

/// Map one response (status plus body text) onto the error taxonomy.
///
/// Success statuses parse the standard envelope; an envelope-level `error`
/// on a 2xx is an application rejection. Failure statuses prefer the
/// envelope's error string when the body carries one, falling back to the
/// raw body text.
fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> ApiResult<ApiEnvelope<T>> {
    if status.is_success() {
        let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
        if let Some(error) = envelope.error {
            return Err(ApiError::Rejected(error));
        }
        Ok(envelope)
    } else {
        Err(ApiError::http(status.as_u16(), error_message(body)))
    }
}

fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        if let Some(error) = envelope.error {
            return error;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use logipilot_model::{Alert, PageInfo};

    #[test]
    fn test_success_envelope_decodes_payload_and_pagination() {
        let body = r#"{
            "data": [],
            "pagination": {"page": 1, "pageSize": 20, "totalItems": 0, "totalPages": 0}
        }"#;

        let envelope: ApiEnvelope<Vec<Alert>> =
            decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(envelope.data, Some(vec![]));
        assert_eq!(
            envelope.pagination,
            Some(PageInfo {
                page: 1,
                page_size: 20,
                total_items: 0,
                total_pages: Some(0),
            })
        );
    }

    #[test]
    fn test_two_hundred_with_envelope_error_is_a_rejection() {
        let body = r#"{"data": null, "error": "shipment is locked"}"#;
        let result: ApiResult<ApiEnvelope<Vec<Alert>>> =
            decode_envelope(StatusCode::OK, body);
        assert!(matches!(
            result,
            Err(ApiError::Rejected(message)) if message == "shipment is locked"
        ));
    }

    #[test]
    fn test_two_hundred_with_null_data_is_not_an_error_here() {
        // Absent data only becomes MissingData at call sites that require a
        // payload; the envelope itself decodes fine.
        let body = r#"{"data": null}"#;
        let envelope: ApiEnvelope<Vec<Alert>> =
            decode_envelope(StatusCode::OK, body).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_http_failure_prefers_envelope_error_string() {
        let body = r#"{"data": null, "error": "shipment not found"}"#;
        let result: ApiResult<ApiEnvelope<Vec<Alert>>> =
            decode_envelope(StatusCode::NOT_FOUND, body);
        assert!(matches!(
            result,
            Err(ApiError::Http { status: 404, message }) if message == "shipment not found"
        ));
    }

    #[test]
    fn test_http_failure_with_unparseable_body_falls_back_to_text() {
        let result: ApiResult<ApiEnvelope<Vec<Alert>>> =
            decode_envelope(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(
            result,
            Err(ApiError::Http { status: 502, message }) if message == "upstream down"
        ));

        let empty: ApiResult<ApiEnvelope<Vec<Alert>>> =
            decode_envelope(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(
            empty,
            Err(ApiError::Http { message, .. }) if message == "Unknown error"
        ));
    }

    #[test]
    fn test_malformed_success_body_is_a_decode_error() {
        let result: ApiResult<ApiEnvelope<Vec<Alert>>> =
            decode_envelope(StatusCode::OK, "<html>oops</html>");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_versioned_url_building() {
        let gateway = ApiGateway::new("http://localhost:8000");
        assert_eq!(
            gateway.build_url("/alerts"),
            "http://localhost:8000/api/v1/alerts"
        );
        assert_eq!(
            gateway.build_url("tracking/SH001"),
            "http://localhost:8000/api/v1/tracking/SH001"
        );
    }
}
