//! Client state: the platform DI container, persisted settings and the
//! session store.

mod platform;
pub mod session_store;
pub mod settings;
pub mod store_events;

pub use platform::Platform;
pub use session_store::{SessionStore, StoreSnapshot, ViewState};
pub use settings::PersistedSettings;
pub use store_events::{StoreEvent, StoreEventBus, SubscriptionId, Toast, ToastKind};
