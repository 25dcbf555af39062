//! Platform abstraction ports
//!
//! These traits abstract platform-specific operations so that:
//! 1. The session store remains platform-agnostic
//! 2. Platform-specific code is isolated in infrastructure
//! 3. Code becomes easily testable with in-memory implementations
//!
//! NOTE: The `Platform` struct (DI container) that aggregates these traits
//! lives in `state/platform.rs`, not here.

use chrono::{DateTime, Utc};

/// Persistent key/value storage (file-based on desktop)
pub trait StorageProvider: Send + Sync {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Wall clock, used for log entry timestamps
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Asks the player to confirm a destructive action.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Returns `true` only on an explicit yes.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Storage key constants
///
/// Only settings and the session identifier are persisted. Stats, inventory
/// and the log never are: a reload must not resurrect unconfirmed state.
pub mod storage_keys {
    pub const SESSION_ID: &str = "textquest_session_id";
    pub const ANIMATION_SPEED: &str = "textquest_animation_speed";
    pub const MASTER_VOLUME: &str = "textquest_master_volume";
    pub const EFFECTS_VOLUME: &str = "textquest_effects_volume";
}
