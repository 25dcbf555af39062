//! Data Transfer Objects for the application layer
//!
//! These are the client-side shapes of game state. Wire types from
//! `textquest-protocol` are converted into them at the gateway boundary so the
//! session store never sees backend field names.

pub mod event_log;
pub mod outcomes;
pub mod session;

pub use event_log::{EventLog, LogEntry, LogKind, DEFAULT_LOG_CAPACITY, MAX_LOG_CAPACITY};
pub use outcomes::{CommandOutcome, SessionSnapshot, StartedSession};
pub use session::{Inventory, Item, ItemAction, PlayerStats, Rarity, SessionData};
