//! Platform DI Container
//!
//! `Platform` aggregates the platform-specific services the session store
//! needs (storage, clock, confirmation prompt) behind port traits.
//!
//! Usage:
//! - Created by `create_platform()` in `infrastructure/platform/desktop.rs`
//! - Tests build one from the in-memory providers in `infrastructure/platform/mock.rs`

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::ports::outbound::{ClockPort, ConfirmationPort, StorageProvider};

/// Unified platform services container
#[derive(Clone)]
pub struct Platform {
    storage: Arc<dyn StorageProvider>,
    clock: Arc<dyn ClockPort>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl Platform {
    /// Create a new Platform with the given providers
    pub fn new<S, C, P>(storage: S, clock: C, confirmation: P) -> Self
    where
        S: StorageProvider + 'static,
        C: ClockPort + 'static,
        P: ConfirmationPort + 'static,
    {
        Self {
            storage: Arc::new(storage),
            clock: Arc::new(clock),
            confirmation: Arc::new(confirmation),
        }
    }

    // -------------------------------------------------------------------------
    // Storage operations
    // -------------------------------------------------------------------------

    pub fn storage(&self) -> &dyn StorageProvider {
        self.storage.as_ref()
    }

    // -------------------------------------------------------------------------
    // Time and prompts
    // -------------------------------------------------------------------------

    /// Current wall-clock time
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Ask the player to confirm; anything but an explicit yes is a no.
    pub async fn confirm(&self, prompt: &str) -> bool {
        self.confirmation.confirm(prompt).await
    }
}
