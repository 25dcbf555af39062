//! textquest Player
//!
//! Client side of an AI-narrated text adventure: the session store, the
//! command gateway over the backend's HTTP API, platform adapters, and a
//! terminal front-end.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

use std::sync::Arc;

use crate::application::api::Api;
use crate::application::services::GameService;
use crate::config::PlayerConfig;
use crate::infrastructure::{HttpApiClient, ResilientApiClient};
use crate::ports::outbound::GameGatewayPort;

/// Build the gateway stack: reqwest client, retry wrapper, typed service.
pub fn create_gateway(config: &PlayerConfig) -> Arc<dyn GameGatewayPort> {
    let http = Arc::new(HttpApiClient::new(
        &config.api.base_url,
        config.retry.timeout(),
    ));
    let resilient = Arc::new(ResilientApiClient::new(http, config.retry.clone()));
    Arc::new(GameService::new(Api::new(resilient)))
}
