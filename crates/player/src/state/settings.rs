//! Client-local settings that survive a restart.
//!
//! Each field lives under its own storage key (see `storage_keys`). Values are
//! stored as plain decimal strings; anything unparsable falls back to the
//! default with a warning.

use std::str::FromStr;

use textquest_protocol::GameId;

use crate::ports::outbound::{storage_keys, StorageProvider};

pub const DEFAULT_ANIMATION_SPEED: u32 = 40;
pub const MAX_ANIMATION_SPEED: u32 = 1000;
pub const DEFAULT_MASTER_VOLUME: u8 = 70;
pub const DEFAULT_EFFECTS_VOLUME: u8 = 80;
pub const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedSettings {
    pub session_id: Option<GameId>,
    /// Characters per second for narration reveal; 0 = instant
    pub animation_speed: u32,
    pub master_volume: u8,
    pub effects_volume: u8,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            session_id: None,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            master_volume: DEFAULT_MASTER_VOLUME,
            effects_volume: DEFAULT_EFFECTS_VOLUME,
        }
    }
}

impl PersistedSettings {
    /// Rehydrate from storage; missing or bad values keep their defaults.
    pub fn load(storage: &dyn StorageProvider) -> Self {
        let defaults = Self::default();
        Self {
            session_id: load_value::<GameId>(storage, storage_keys::SESSION_ID)
                .filter(|id| id.get() > 0),
            animation_speed: load_value::<u32>(storage, storage_keys::ANIMATION_SPEED)
                .map(clamp_speed)
                .unwrap_or(defaults.animation_speed),
            master_volume: load_value::<u8>(storage, storage_keys::MASTER_VOLUME)
                .map(clamp_volume)
                .unwrap_or(defaults.master_volume),
            effects_volume: load_value::<u8>(storage, storage_keys::EFFECTS_VOLUME)
                .map(clamp_volume)
                .unwrap_or(defaults.effects_volume),
        }
    }

    /// Write every field; an absent session id removes its key.
    pub fn save(&self, storage: &dyn StorageProvider) {
        match self.session_id {
            Some(id) => storage.save(storage_keys::SESSION_ID, &id.to_string()),
            None => storage.remove(storage_keys::SESSION_ID),
        }
        storage.save(
            storage_keys::ANIMATION_SPEED,
            &self.animation_speed.to_string(),
        );
        storage.save(storage_keys::MASTER_VOLUME, &self.master_volume.to_string());
        storage.save(
            storage_keys::EFFECTS_VOLUME,
            &self.effects_volume.to_string(),
        );
    }

    /// Effects volume scaled by the master volume, 0..=100
    pub fn effective_effects_volume(&self) -> u8 {
        let scaled = u16::from(self.master_volume) * u16::from(self.effects_volume) / 100;
        // Both factors are <= 100, so the product fits back into u8.
        u8::try_from(scaled).unwrap_or(MAX_VOLUME)
    }
}

pub fn clamp_speed(cps: u32) -> u32 {
    cps.min(MAX_ANIMATION_SPEED)
}

pub fn clamp_volume(volume: u8) -> u8 {
    volume.min(MAX_VOLUME)
}

fn load_value<T: FromStr>(storage: &dyn StorageProvider, key: &str) -> Option<T> {
    let raw = storage.load(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unreadable persisted setting");
            None
        }
    }
}
