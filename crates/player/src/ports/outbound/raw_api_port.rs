//! Raw API Port - Object-safe HTTP boundary
//!
//! Typed request/response handling needs generic methods, which are not
//! object-safe. The composition root stores an `Arc<dyn RawApiPort>` that
//! speaks `serde_json::Value`; the application layer provides the typed
//! wrapper (`application::api::Api`) on top.

use serde_json::Value;

use super::ApiError;

#[async_trait::async_trait]
pub trait RawApiPort: Send + Sync {
    /// `GET` a JSON document. Safe to repeat.
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    /// `POST` a JSON body and read a JSON document back. Not idempotent.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}
