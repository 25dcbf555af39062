//! Application layer: typed API wrapper, gateway service, and the data model
//! the session store works with.

pub mod api;
pub mod dto;
pub mod error;
pub mod services;

pub use error::GatewayError;
