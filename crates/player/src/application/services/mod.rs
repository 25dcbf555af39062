//! Application services
//!
//! Services depend on port traits, not concrete infrastructure
//! implementations.

pub mod game_service;

pub use game_service::GameService;
