//! Session store: the single owner of client-side game state.
//!
//! Every operation follows the same shape: guard and interim update under the
//! lock, gateway call with the lock released, then reconcile under the lock
//! again. Subscribers are notified after the lock is dropped.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use textquest_protocol::{Difficulty, GameId};

use crate::application::dto::{
    CommandOutcome, Inventory, ItemAction, LogKind, SessionData, SessionSnapshot, StartedSession,
};
use crate::application::GatewayError;
use crate::ports::outbound::GameGatewayPort;
use crate::state::settings::{clamp_speed, clamp_volume, PersistedSettings};
use crate::state::store_events::{StoreEvent, StoreEventBus, SubscriptionId, Toast};
use crate::state::Platform;

const NO_SESSION_MESSAGE: &str = "No active session. Start a new game first.";
const BUSY_MESSAGE: &str = "Please wait for the current command to finish.";

/// Which panels of the presentation are open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub inventory_open: bool,
    pub settings_open: bool,
}

/// Read-only copy of the store's state
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub session: SessionData,
    pub settings: PersistedSettings,
    pub view: ViewState,
    pub starting: bool,
    pub command_in_flight: bool,
}

struct StoreInner {
    session: SessionData,
    settings: PersistedSettings,
    view: ViewState,
    starting: bool,
    in_flight: bool,
}

impl StoreInner {
    fn log(&mut self, kind: LogKind, text: impl Into<String>, at: DateTime<Utc>) {
        self.session.log.push(kind, text, at);
    }

    fn install_started(&mut self, started: StartedSession, at: DateTime<Utc>) {
        self.session.clear();
        self.session.session_id = Some(started.session_id);
        self.session.stats = Some(started.stats);
        self.session.inventory = started.inventory;
        self.session.room_title = started.room_title;
        self.session.suggested_actions = started.suggested_actions;
        self.session.pending_sound_cue = started.sound_cue;
        if !started.welcome_message.trim().is_empty() {
            self.log(LogKind::System, started.welcome_message, at);
        }
        self.log(LogKind::Narration, started.description.clone(), at);
        self.session.room_description = started.description;
    }

    fn install_snapshot(&mut self, snapshot: SessionSnapshot, at: DateTime<Utc>) {
        self.session.clear();
        self.session.session_id = Some(snapshot.session_id);
        self.session.stats = Some(snapshot.stats);
        self.session.inventory = snapshot.inventory;
        self.session.room_title = snapshot.room_title;
        self.session.pending_sound_cue = snapshot.sound_cue;
        let notice = snapshot
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Session restored.".to_string());
        self.log(LogKind::System, notice, at);
        self.log(LogKind::Narration, snapshot.description.clone(), at);
        self.session.room_description = snapshot.description;
    }

    /// Guard for item actions; returns the item name on success.
    fn check_item_action(&self, item_id: &str, action: ItemAction) -> Result<String, String> {
        if !self.session.is_active() {
            return Err(NO_SESSION_MESSAGE.to_string());
        }
        let item = self
            .session
            .inventory
            .get(item_id)
            .ok_or_else(|| format!("You don't have '{item_id}'."))?;
        if !item.permits(action) {
            return Err(format!("You can't {} {}.", action.verb(), item.name));
        }
        if self.in_flight {
            return Err(BUSY_MESSAGE.to_string());
        }
        Ok(item.name.clone())
    }
}

/// Side effects collected while the lock is held
struct Effects {
    now: DateTime<Utc>,
    toasts: Vec<Toast>,
    changed: bool,
}

impl Effects {
    fn toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Nothing observable changed
    fn quiet(&mut self) {
        self.changed = false;
    }
}

/// What a command remembers so it can be reconciled or rolled back
struct PendingCommand {
    session_id: GameId,
    command: String,
    action: Option<(ItemAction, String)>,
    previous_description: String,
    previous_title: Option<String>,
    previous_suggestions: Option<Vec<String>>,
    previous_inventory: Option<Inventory>,
}

impl PendingCommand {
    /// Mark the command as in flight: echo it, clear suggestions and remember
    /// what a failure has to restore.
    fn begin(
        inner: &mut StoreInner,
        session_id: GameId,
        command: String,
        action: Option<(ItemAction, String)>,
        at: DateTime<Utc>,
    ) -> Self {
        inner.in_flight = true;
        inner.log(LogKind::Player, command.clone(), at);
        let previous_inventory = action.as_ref().and_then(|(action, _)| match action {
            ItemAction::Use | ItemAction::Drop => Some(inner.session.inventory.clone()),
            ItemAction::Equip => None,
        });
        Self {
            session_id,
            command,
            action,
            previous_description: inner.session.room_description.clone(),
            previous_title: inner.session.room_title.clone(),
            previous_suggestions: inner.session.suggested_actions.take(),
            previous_inventory,
        }
    }

    fn success_toast(&self) -> Toast {
        match &self.action {
            Some((ItemAction::Use, name)) => Toast::success(format!("Used {name}.")),
            Some((ItemAction::Equip, name)) => Toast::success(format!("Equipped {name}.")),
            Some((ItemAction::Drop, name)) => Toast::success(format!("Dropped {name}.")),
            None => Toast::success("Command completed."),
        }
    }

    fn closes_inventory(&self) -> bool {
        matches!(
            self.action,
            Some((ItemAction::Use, _)) | Some((ItemAction::Equip, _))
        )
    }
}

/// Client-side session state container.
///
/// `Send + Sync`; share it behind an `Arc`. At most one gameplay command is in
/// flight at a time.
pub struct SessionStore {
    gateway: Arc<dyn GameGatewayPort>,
    platform: Platform,
    inner: Mutex<StoreInner>,
    events: StoreEventBus,
}

impl SessionStore {
    /// Create a store and rehydrate persisted settings from storage.
    pub fn new(gateway: Arc<dyn GameGatewayPort>, platform: Platform, log_capacity: usize) -> Self {
        let settings = PersistedSettings::load(platform.storage());
        tracing::debug!(
            has_session = settings.session_id.is_some(),
            animation_speed = settings.animation_speed,
            "Loaded persisted settings"
        );

        Self {
            gateway,
            platform,
            inner: Mutex::new(StoreInner {
                session: SessionData::new(log_capacity),
                settings,
                view: ViewState::default(),
                starting: false,
                in_flight: false,
            }),
            events: StoreEventBus::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one atomic mutation and publish its effects once the lock is gone.
    fn mutate<R>(&self, f: impl FnOnce(&mut StoreInner, &mut Effects) -> R) -> R {
        let mut effects = Effects {
            now: self.platform.now(),
            toasts: Vec::new(),
            changed: true,
        };
        let result = {
            let mut inner = self.lock();
            f(&mut inner, &mut effects)
        };

        if effects.changed {
            self.events.dispatch(&StoreEvent::StateChanged);
        }
        for toast in effects.toasts {
            self.events.dispatch(&StoreEvent::Toast(toast));
        }
        result
    }

    fn persist(&self, settings: PersistedSettings) {
        settings.save(self.platform.storage());
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.lock();
        StoreSnapshot {
            session: inner.session.clone(),
            settings: inner.settings,
            view: inner.view,
            starting: inner.starting,
            command_in_flight: inner.in_flight,
        }
    }

    pub fn subscribe(&self, callback: impl FnMut(&StoreEvent) + Send + 'static) -> SubscriptionId {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    /// Start a new adventure, replacing any current session.
    ///
    /// Returns `false` without a network call while another start is running.
    pub async fn start_game(&self, player_name: Option<String>, difficulty: Difficulty) -> bool {
        let begun = self.mutate(|inner, fx| {
            if inner.starting {
                fx.quiet();
                return None;
            }
            inner.starting = true;
            inner.session.clear();
            inner.view = ViewState::default();
            inner.settings.session_id = None;
            Some(inner.settings)
        });
        let Some(settings) = begun else {
            tracing::debug!("Start requested while another start is in progress");
            return false;
        };
        self.persist(settings);

        match self.gateway.start_session(player_name, difficulty).await {
            Ok(started) => {
                let session_id = started.session_id;
                let settings = self.mutate(|inner, fx| {
                    inner.starting = false;
                    inner.install_started(started, fx.now);
                    inner.settings.session_id = Some(session_id);
                    fx.toast(Toast::success("Your adventure begins."));
                    inner.settings
                });
                self.persist(settings);
                tracing::info!(game_id = %session_id, %difficulty, "Game started");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start game");
                self.mutate(|inner, fx| {
                    inner.starting = false;
                    inner.session.clear();
                    inner.log(LogKind::Error, e.to_string(), fx.now);
                    fx.toast(Toast::error(e.to_string()));
                });
                false
            }
        }
    }

    /// Reload the persisted session from the backend.
    ///
    /// Only runs when a session id was persisted and nothing is loaded yet. A
    /// failure forgets the persisted id.
    pub async fn resume_session(&self) -> bool {
        let begun = self.mutate(|inner, fx| {
            fx.quiet();
            if inner.starting || inner.session.is_active() {
                return None;
            }
            let session_id = inner.settings.session_id?;
            inner.starting = true;
            Some(session_id)
        });
        let Some(session_id) = begun else {
            return false;
        };

        match self.gateway.fetch_session_state(session_id).await {
            Ok(snapshot) => {
                let settings = self.mutate(|inner, fx| {
                    inner.starting = false;
                    if snapshot.session_id != session_id {
                        tracing::warn!(
                            requested = %session_id,
                            received = %snapshot.session_id,
                            "Backend returned a different session id"
                        );
                    }
                    inner.settings.session_id = Some(snapshot.session_id);
                    inner.install_snapshot(snapshot, fx.now);
                    fx.toast(Toast::info("Session restored."));
                    inner.settings
                });
                self.persist(settings);
                tracing::info!(game_id = %session_id, "Session resumed");
                true
            }
            Err(e) => {
                tracing::warn!(game_id = %session_id, error = %e, "Failed to resume session");
                let settings = self.mutate(|inner, fx| {
                    inner.starting = false;
                    inner.settings.session_id = None;
                    inner.log(
                        LogKind::Error,
                        format!("Could not restore your last session: {e}"),
                        fx.now,
                    );
                    fx.toast(Toast::error(e.to_string()));
                    inner.settings
                });
                self.persist(settings);
                false
            }
        }
    }

    /// Forget the current session, locally and in storage.
    pub fn reset_session(&self) {
        let settings = self.mutate(|inner, fx| {
            inner.session.clear();
            inner.view = ViewState::default();
            inner.settings.session_id = None;
            fx.toast(Toast::info("Session reset."));
            inner.settings
        });
        self.persist(settings);
        tracing::info!("Session reset");
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Submit one free-text command. Ignored while another is in flight.
    pub async fn send_command(&self, text: &str) {
        let command = text.trim();
        if command.is_empty() {
            return;
        }

        let pending = self.mutate(|inner, fx| {
            if inner.in_flight {
                fx.quiet();
                return None;
            }
            let Some(session_id) = inner.session.session_id else {
                inner.log(LogKind::Error, NO_SESSION_MESSAGE, fx.now);
                fx.toast(Toast::error(NO_SESSION_MESSAGE));
                return None;
            };
            Some(PendingCommand::begin(
                inner,
                session_id,
                command.to_string(),
                None,
                fx.now,
            ))
        });

        match pending {
            Some(pending) => {
                self.run_command(pending).await;
            }
            None => tracing::debug!(command, "Command not sent"),
        }
    }

    /// Use an item. Optimistically consumes one unit.
    pub async fn use_item(&self, item_id: &str) -> bool {
        self.item_action(item_id, ItemAction::Use).await
    }

    pub async fn equip_item(&self, item_id: &str) -> bool {
        self.item_action(item_id, ItemAction::Equip).await
    }

    /// Drop an item after the player confirms. Denial changes nothing.
    pub async fn drop_item(&self, item_id: &str) -> bool {
        let checked = self.lock().check_item_action(item_id, ItemAction::Drop);
        let name = match checked {
            Ok(name) => name,
            Err(reason) => {
                self.reject_item_action(item_id, ItemAction::Drop, reason);
                return false;
            }
        };

        if !self.platform.confirm(&format!("Drop {name}?")).await {
            tracing::debug!(item_id, "Drop cancelled by player");
            return false;
        }

        self.item_action(item_id, ItemAction::Drop).await
    }

    fn reject_item_action(&self, item_id: &str, action: ItemAction, reason: String) {
        tracing::warn!(item_id, action = action.verb(), reason = %reason, "Item action rejected");
        self.mutate(|_, fx| {
            fx.quiet();
            fx.toast(Toast::error(reason));
        });
    }

    async fn item_action(&self, item_id: &str, action: ItemAction) -> bool {
        let pending = self.mutate(|inner, fx| {
            let name = match inner.check_item_action(item_id, action) {
                Ok(name) => name,
                Err(reason) => {
                    fx.quiet();
                    return Err(reason);
                }
            };
            let Some(session_id) = inner.session.session_id else {
                fx.quiet();
                return Err(NO_SESSION_MESSAGE.to_string());
            };

            let pending = PendingCommand::begin(
                inner,
                session_id,
                action.command_for(&name),
                Some((action, name)),
                fx.now,
            );
            match action {
                ItemAction::Use => {
                    inner.session.inventory.consume_one(item_id);
                }
                ItemAction::Drop => {
                    inner.session.inventory.remove(item_id);
                }
                ItemAction::Equip => {}
            }
            Ok(pending)
        });

        match pending {
            Ok(pending) => self.run_command(pending).await,
            Err(reason) => {
                self.reject_item_action(item_id, action, reason);
                false
            }
        }
    }

    /// Send a pending command and reconcile. Returns `true` only for a
    /// completed round-trip with `success == true`.
    async fn run_command(&self, pending: PendingCommand) -> bool {
        let result = self
            .gateway
            .submit_command(pending.session_id, &pending.command)
            .await;

        self.mutate(|inner, fx| {
            inner.in_flight = false;
            if inner.session.session_id != Some(pending.session_id) {
                tracing::debug!(
                    game_id = %pending.session_id,
                    "Discarding command result for a session that is no longer active"
                );
                return false;
            }
            match result {
                Ok(outcome) => apply_outcome(inner, fx, pending, outcome),
                Err(e) => {
                    rollback(inner, fx, pending, &e);
                    false
                }
            }
        })
    }

    /// Re-fetch the active session's snapshot.
    pub async fn refresh_state(&self) -> bool {
        let begun = self.mutate(|inner, fx| {
            if inner.in_flight {
                fx.quiet();
                return None;
            }
            let Some(session_id) = inner.session.session_id else {
                inner.log(LogKind::Error, NO_SESSION_MESSAGE, fx.now);
                fx.toast(Toast::error(NO_SESSION_MESSAGE));
                return None;
            };
            inner.in_flight = true;
            Some(session_id)
        });
        let Some(session_id) = begun else {
            return false;
        };

        let result = self.gateway.fetch_session_state(session_id).await;

        self.mutate(|inner, fx| {
            inner.in_flight = false;
            if inner.session.session_id != Some(session_id) {
                return false;
            }
            match result {
                Ok(snapshot) => {
                    let session = &mut inner.session;
                    session.stats = Some(snapshot.stats);
                    session.inventory = snapshot.inventory;
                    session.room_description = snapshot.description;
                    if snapshot.room_title.is_some() {
                        session.room_title = snapshot.room_title;
                    }
                    if snapshot.sound_cue.is_some() {
                        session.pending_sound_cue = snapshot.sound_cue;
                    }
                    fx.toast(Toast::info("Game state refreshed."));
                    true
                }
                Err(e) => {
                    tracing::warn!(game_id = %session_id, error = %e, "Failed to refresh state");
                    inner.log(LogKind::Error, e.to_string(), fx.now);
                    fx.toast(Toast::error(e.to_string()));
                    false
                }
            }
        })
    }

    // -------------------------------------------------------------------------
    // Views and settings
    // -------------------------------------------------------------------------

    /// Flip the inventory view, or set it when `open` is given.
    pub fn toggle_inventory_view(&self, open: Option<bool>) -> bool {
        self.mutate(|inner, _| {
            inner.view.inventory_open = open.unwrap_or(!inner.view.inventory_open);
            inner.view.inventory_open
        })
    }

    /// Flip the settings view, or set it when `open` is given.
    pub fn toggle_settings_view(&self, open: Option<bool>) -> bool {
        self.mutate(|inner, _| {
            inner.view.settings_open = open.unwrap_or(!inner.view.settings_open);
            inner.view.settings_open
        })
    }

    /// Narration reveal speed in characters per second (0 = instant)
    pub fn set_animation_speed(&self, cps: u32) -> u32 {
        let settings = self.mutate(|inner, _| {
            inner.settings.animation_speed = clamp_speed(cps);
            inner.settings
        });
        self.persist(settings);
        settings.animation_speed
    }

    pub fn set_master_volume(&self, volume: u8) -> u8 {
        let settings = self.mutate(|inner, _| {
            inner.settings.master_volume = clamp_volume(volume);
            inner.settings
        });
        self.persist(settings);
        settings.master_volume
    }

    pub fn set_effects_volume(&self, volume: u8) -> u8 {
        let settings = self.mutate(|inner, _| {
            inner.settings.effects_volume = clamp_volume(volume);
            inner.settings
        });
        self.persist(settings);
        settings.effects_volume
    }

    /// Take the pending sound cue; a second call returns `None`.
    pub fn take_sound_cue(&self) -> Option<String> {
        self.mutate(|inner, fx| {
            fx.quiet();
            inner.session.pending_sound_cue.take()
        })
    }
}

fn apply_outcome(
    inner: &mut StoreInner,
    fx: &mut Effects,
    pending: PendingCommand,
    outcome: CommandOutcome,
) -> bool {
    let session = &mut inner.session;
    session.room_description = outcome.description;
    session.room_title = outcome.room_title.or(pending.previous_title.clone());
    session.stats = Some(outcome.stats);
    session.inventory = outcome.inventory;
    if outcome.sound_cue.is_some() {
        session.pending_sound_cue = outcome.sound_cue;
    }

    if !outcome.message.trim().is_empty() {
        inner.log(LogKind::Narration, outcome.message.clone(), fx.now);
    }

    if outcome.success {
        inner.session.suggested_actions = outcome.suggested_actions;
        if pending.closes_inventory() {
            inner.view.inventory_open = false;
        }
        fx.toast(pending.success_toast());
    } else {
        inner.log(LogKind::Error, outcome.message.clone(), fx.now);
        inner.session.suggested_actions = pending.previous_suggestions;
        fx.toast(Toast::error(outcome.message));
    }
    outcome.success
}

fn rollback(inner: &mut StoreInner, fx: &mut Effects, pending: PendingCommand, error: &GatewayError) {
    tracing::warn!(
        game_id = %pending.session_id,
        command = %pending.command,
        error = %error,
        "Command failed"
    );
    let session = &mut inner.session;
    session.room_description = pending.previous_description;
    session.room_title = pending.previous_title;
    session.suggested_actions = pending.previous_suggestions;
    if let Some(inventory) = pending.previous_inventory {
        session.inventory = inventory;
    }
    inner.log(LogKind::Error, error.to_string(), fx.now);
    fx.toast(Toast::error(error.to_string()));
}
