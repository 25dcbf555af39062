//! textquest Player - terminal composition root.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textquest_player::config::PlayerConfig;
use textquest_player::infrastructure::platform::create_platform;
use textquest_player::state::SessionStore;
use textquest_player::ui::{self, TerminalInput};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local first (higher priority), then .env as fallback
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textquest_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PlayerConfig::load().context("failed to load configuration")?;
    tracing::info!(base_url = %config.api.base_url, "Starting textquest player");

    let input = TerminalInput::new();
    let platform = create_platform(&config.storage, input.clone());
    let gateway = textquest_player::create_gateway(&config);
    let store = Arc::new(SessionStore::new(
        gateway,
        platform,
        config.session.log_capacity,
    ));

    ui::run(store, input).await
}
