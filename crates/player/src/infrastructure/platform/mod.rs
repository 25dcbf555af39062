//! Platform-specific implementations of the port traits in
//! `ports/outbound/platform.rs`.

mod desktop;

pub mod mock;

pub use desktop::{create_platform, DesktopStorageProvider, SystemClock};
