//! In-memory platform providers for tests and headless runs.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::outbound::{ClockPort, ConfirmationPort, StorageProvider};
use crate::state::Platform;

/// Storage backed by a shared map. Clones see the same values, which lets a
/// test build a second store over the "same disk".
#[derive(Clone, Default)]
pub struct InMemoryStorageProvider {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageProvider for InMemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default())
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Confirmation prompt with a canned answer that counts how often it was asked
#[derive(Clone)]
pub struct StaticConfirmation {
    answer: bool,
    asked: Arc<AtomicUsize>,
}

impl StaticConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ConfirmationPort for StaticConfirmation {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// Platform over in-memory storage, a fixed clock and a canned confirmation
pub fn create_mock_platform(
    storage: InMemoryStorageProvider,
    confirmation: StaticConfirmation,
) -> Platform {
    Platform::new(storage, FixedClock::default(), confirmation)
}
