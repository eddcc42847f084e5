use crate::app_config::AppConfig;
use crate::app_state::AppState;
use crate::server::HttpSignatureVerifier;
use crate::store::{FileStateStore, MemoryStateStore, StateStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod app_config;
mod app_state;
mod domain;
mod extensions;
#[cfg(test)]
mod fakes;
mod lifecycle;
mod lifx;
mod reconciler;
mod server;
mod smartthings;
mod store;
mod token;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let lifx_client = lifx::new_client(&config)?;
    let smartthings_client = smartthings::new_client(&config)?;
    if config.lifx().client_id().is_none() {
        warn!("⚠️ No LIFX OAuth client configured, users enter a personal access token instead");
    }

    let store: Arc<dyn StateStore> = match config.store().directory() {
        Some(directory) => {
            info!(directory, "✅  Storing installed app state on disk");
            Arc::new(FileStateStore::open(directory).await?)
        }
        None => {
            warn!("⚠️ No store directory configured, installed app state is lost on restart");
            Arc::new(MemoryStateStore::new())
        }
    };

    let verifier = match config.smartthings().public_key_path() {
        Some(path) => {
            let verifier = HttpSignatureVerifier::load(path).await?;
            info!(path, "✅  Loaded the SmartThings public key");
            Some(Arc::new(verifier))
        }
        None => {
            warn!("⚠️ No SmartThings public key configured, request signatures are not verified");
            None
        }
    };

    let port = config.server().port();
    let state = AppState {
        config: Arc::new(config),
        lifx: Arc::new(lifx_client),
        hub: Arc::new(smartthings_client),
        store,
        verifier,
    };

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("🔥 {} is up and running on port {}", env!("CARGO_PKG_NAME"), port);

    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
