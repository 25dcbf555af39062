//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the session store and application services to interact with
//! external systems without depending on concrete implementations.

pub mod api_port;
pub mod game_gateway_port;
pub mod platform;
pub mod raw_api_port;

pub use api_port::ApiError;
pub use game_gateway_port::GameGatewayPort;
pub use platform::{storage_keys, ClockPort, ConfirmationPort, StorageProvider};
pub use raw_api_port::RawApiPort;

#[cfg(test)]
pub use game_gateway_port::MockGameGatewayPort;
#[cfg(test)]
pub use platform::MockConfirmationPort;
