//! Handling of the lifecycle requests SmartThings sends to the connector.
//!
//! Configuration requests are answered synchronously. Installation, updates, OAuth callbacks and
//! events are acknowledged right away while their work continues on a spawned task, failures of
//! that work only end up in the log.

mod configuration;
mod crud;
mod event;
mod oauth;
mod payload;

use crate::app_state::AppState;
use crate::domain::{InstalledAppConfig, RemoteLight};
use crate::lifx::LifxError;
use crate::smartthings::SmartThingsError;
use crate::store::StoreError;
use crate::token::resolve_lifx_token;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, trace, warn};

pub use payload::{ConfigurationPhase, HubEvent, LifecycleRequest};
use payload::{EventData, InstalledApp};

#[instrument(skip_all, fields(lifecycle = request.name()))]
pub async fn handle(state: &AppState, request: LifecycleRequest) -> Value {
    trace!(?request, "Received lifecycle request");

    let response = match request {
        LifecycleRequest::Ping { ping_data } => json!({
            "statusCode": 200,
            "pingData": { "challenge": ping_data.challenge }
        }),
        LifecycleRequest::Configuration { configuration_data } => {
            let data = match configuration_data.phase {
                ConfigurationPhase::Initialize => configuration::initialize(&state.config),
                ConfigurationPhase::Page => configuration::page(state, &configuration_data).await,
            };
            json!({ "statusCode": 200, "configurationData": data })
        }
        LifecycleRequest::OauthCallback { oauth_callback_data } => {
            spawn_logged("OAuth callback", oauth::handle_oauth_callback(state.clone(), oauth_callback_data));
            json!({ "statusCode": 200, "oAuthCallbackData": {} })
        }
        LifecycleRequest::Install { install_data } => {
            spawn_logged("Install", crud::install(state.clone(), install_data));
            json!({ "statusCode": 200, "installData": {} })
        }
        LifecycleRequest::Update { update_data } => {
            spawn_logged("Update", crud::update(state.clone(), update_data));
            json!({ "statusCode": 200, "updateData": {} })
        }
        LifecycleRequest::Uninstall { uninstall_data } => {
            if let Err(e) = crud::uninstall(state, &uninstall_data.installed_app).await {
                error!("❌ Uninstall failed: {}", e);
            }
            json!({ "statusCode": 200, "uninstallData": {} })
        }
        LifecycleRequest::Event { event_data } => {
            dispatch_events(state, event_data);
            json!({ "statusCode": 200, "eventData": {} })
        }
        LifecycleRequest::Execute { .. } => json!({ "statusCode": 200, "executeData": {} }),
        LifecycleRequest::Unsupported => {
            warn!("⚠️ Lifecycle not supported");
            json!({ "statusCode": 200 })
        }
    };

    trace!(%response, "Responding to lifecycle request");
    response
}

fn dispatch_events(state: &AppState, event_data: EventData) {
    let app = Arc::new(event_data.app);
    for event in event_data.events {
        match event {
            HubEvent::DeviceEvent { .. } => {}
            HubEvent::TimerEvent { timer_event } => {
                spawn_logged("Poll", event::handle_scheduled_event(state.clone(), app.clone(), timer_event));
            }
            HubEvent::DeviceCommandsEvent { device_commands_event } => {
                spawn_logged(
                    "Device commands",
                    event::handle_device_commands(state.clone(), app.clone(), device_commands_event),
                );
            }
            HubEvent::Unsupported => warn!("⚠️ Unhandled event type"),
        }
    }
}

fn spawn_logged<F>(operation: &'static str, future: F)
where
    F: Future<Output = Result<(), LifecycleError>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = future.await {
            error!(operation, "❌ {} failed: {}", operation, e);
        }
    });
}

/// Returns the LIFX access token for an installed app.
async fn lifx_token(state: &AppState, installed_app_id: &str, config: &InstalledAppConfig) -> Result<String, LifecycleError> {
    let stored = state.store.get(installed_app_id).await?;
    resolve_lifx_token(stored.as_ref(), config)
        .map(str::to_string)
        .ok_or_else(|| LifecycleError::MissingToken(installed_app_id.to_string()))
}

/// Returns the lights of the LIFX location selected for the installed app, or `None` when no
/// location has been selected yet.
async fn selected_lights(state: &AppState, installed_app: &InstalledApp) -> Result<Option<Vec<RemoteLight>>, LifecycleError> {
    let Some(location_id) = installed_app.config.lifx_location_id() else {
        info!(
            installed_app_id = installed_app.installed_app_id,
            "No LIFX location selected, skipping device synchronization"
        );
        return Ok(None);
    };

    let token = lifx_token(state, &installed_app.installed_app_id, &installed_app.config).await?;
    Ok(Some(state.lifx.list_lights(&token, location_id).await?))
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Lifx(#[from] LifxError),
    #[error(transparent)]
    SmartThings(#[from] SmartThingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no LIFX access token is available for installed app '{0}'")]
    MissingToken(String),
    #[error("the OAuth callback carries no authorization code")]
    MissingAuthorizationCode,
    #[error("light '{0}' is unknown to LIFX")]
    UnknownLight(String),
}
