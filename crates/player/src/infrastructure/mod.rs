//! Infrastructure adapters: HTTP transport, retry wrapper and platform
//! providers.

pub mod http_client;
pub mod platform;
pub mod resilient_api;

pub use http_client::{HttpApiClient, DEFAULT_API_BASE_URL};
pub use resilient_api::{ResilientApiClient, RetryPolicy};
