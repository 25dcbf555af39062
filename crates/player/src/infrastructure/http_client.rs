//! HTTP adapter for `RawApiPort`
//!
//! Every request goes through `send`, which reads the body as text, always
//! tries to parse it as JSON (even on an error status) and folds any failure
//! into `ApiError`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use textquest_protocol::ErrorBody;

use crate::ports::outbound::{ApiError, RawApiPort};

/// Default backend base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";

/// reqwest-backed client for the game backend
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, method: &'static str, path: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        let result = interpret_response(status, &body);
        if let Err(e) = &result {
            tracing::debug!(method, path, status, error = %e, "Backend request failed");
        }
        result
    }
}

impl Default for HttpApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, Duration::from_secs(30))
    }
}

#[async_trait]
impl RawApiPort for HttpApiClient {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.client.get(self.url(path));
        self.send("GET", path, request).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        self.send("POST", path, request).await
    }
}

/// Turn a status code and raw body into a JSON value or an `ApiError`.
///
/// Non-2xx: the message comes from the body's `message`, then `error`, then
/// `"Request failed with status N"`.
pub fn interpret_response(status: u16, body: &str) -> Result<Value, ApiError> {
    let parsed = serde_json::from_str::<Value>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|value| serde_json::from_value::<ErrorBody>(value).ok())
            .and_then(|error_body| error_body.best_message().map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(ApiError::HttpError { status, message });
    }

    parsed.map_err(|e| ApiError::ParseError(e.to_string()))
}

/// Classify a reqwest failure. Connect errors mean the request never reached
/// the server, which is what makes a POST safe to retry.
pub fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::Connect(e.to_string())
    } else if e.is_decode() {
        ApiError::ParseError(e.to_string())
    } else {
        ApiError::RequestFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_is_returned_as_json() {
        let value = interpret_response(200, r#"{"game_id": 42}"#).unwrap();
        assert_eq!(value, json!({"game_id": 42}));
    }

    #[test]
    fn error_status_prefers_message_field() {
        let err = interpret_response(
            404,
            r#"{"error": "Not Found", "message": "Game session not found."}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::HttpError {
                status: 404,
                message: "Game session not found.".into()
            }
        );
    }

    #[test]
    fn error_status_falls_back_to_error_field() {
        let err = interpret_response(400, r#"{"error": "Invalid request data"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid request data");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn unparsable_error_body_uses_status_text() {
        let err = interpret_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn error_body_with_blank_fields_uses_status_text() {
        let err = interpret_response(500, r#"{"message": "  "}"#).unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn malformed_success_body_is_a_parse_error() {
        let err = interpret_response(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::ParseError(_)));
    }

    #[test]
    fn paths_join_onto_base_url() {
        let client = HttpApiClient::new("http://localhost:5001/api/", Duration::from_secs(1));
        assert_eq!(client.url("/game/start"), "http://localhost:5001/api/game/start");
        assert_eq!(client.url("game/state/3"), "http://localhost:5001/api/game/state/3");
    }
}
