use anyhow::{Context, Result};
use clap::Parser;
use scavenger_core::{Game, LocationLog, Scavenger, StateStore};
use scavenger_server::{AppState, Config, run};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if config.verbose { "debug" } else { "info" })
            }),
        )
        .init();

    tracing::info!("scavenger-server v{} starting", env!("CARGO_PKG_VERSION"));

    let game = Game::from_yaml_file(&config.game_file)
        .with_context(|| format!("Failed to load game from {}", config.game_file.display()))?;

    let store = StateStore::open(&config.state_file).with_context(|| {
        format!("Failed to open state at {}", config.state_file.display())
    })?;

    if let Some(dir) = config
        .logging_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let log = LocationLog::new(&config.logging_file);

    if config.admin_token.is_none() {
        tracing::warn!("no admin token configured, admin routes are open");
    }

    let state = AppState::new(Scavenger::new(game, store, log), config.admin_token);

    run(state, config.bind)
        .await
        .with_context(|| format!("Server on {} failed", config.bind))
}
