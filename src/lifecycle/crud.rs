use crate::app_state::AppState;
use crate::domain::{LocalDevice, RemoteLight};
use crate::lifecycle::payload::{AuthorizedApp, InstalledApp};
use crate::lifecycle::{LifecycleError, selected_lights};
use crate::reconciler::{InstalledAppScope, ReconcileReport, reconcile};
use tracing::{error, info, instrument};

/// Name of the schedule that triggers the periodic light state poll.
pub const POLL_SCHEDULE: &str = "poll";

/// Creates a device for every light of the selected location and schedules the state poll.
#[instrument(skip_all, fields(installed_app_id = app.installed_app.installed_app_id))]
pub async fn install(state: AppState, app: AuthorizedApp) -> Result<(), LifecycleError> {
    let (devices, schedule) = tokio::join!(create_devices(&state, &app, &[]), create_poll_schedule(&state, &app));
    both(devices, schedule)?;

    info!("✅ Installed");
    Ok(())
}

/// Brings the devices in line with the (possibly changed) location and replaces the poll schedule.
#[instrument(skip_all, fields(installed_app_id = app.installed_app.installed_app_id))]
pub async fn update(state: AppState, app: AuthorizedApp) -> Result<(), LifecycleError> {
    let installed_app = &app.installed_app;
    let devices = state
        .hub
        .list_devices(&app.auth_token, &installed_app.location_id, &installed_app.installed_app_id)
        .await?;

    let (synced, schedule) = tokio::join!(create_devices(&state, &app, &devices), replace_poll_schedule(&state, &app));
    both(synced, schedule)?;

    info!("✅ Updated");
    Ok(())
}

/// Forgets the stored LIFX tokens. SmartThings removes the devices and schedules of the app itself.
#[instrument(skip_all, fields(installed_app_id = installed_app.installed_app_id))]
pub async fn uninstall(state: &AppState, installed_app: &InstalledApp) -> Result<(), LifecycleError> {
    state.store.delete(&installed_app.installed_app_id).await?;

    info!("🗑️ Uninstalled");
    Ok(())
}

/// Returns the first error of the two, the schedule error is logged when both failed.
fn both(devices: Result<(), LifecycleError>, schedule: Result<(), LifecycleError>) -> Result<(), LifecycleError> {
    if let (Err(_), Err(e)) = (&devices, &schedule) {
        error!("❌ Unable to schedule the light state poll: {}", e);
    }
    devices.and(schedule)
}

async fn create_devices(state: &AppState, app: &AuthorizedApp, devices: &[LocalDevice]) -> Result<(), LifecycleError> {
    let Some(lights) = selected_lights(state, &app.installed_app).await? else {
        return Ok(());
    };

    sync_devices(state, app, &lights, devices).await;
    Ok(())
}

/// Reconciles the devices of an installed app with its lights.
pub async fn sync_devices(state: &AppState, app: &AuthorizedApp, lights: &[RemoteLight], devices: &[LocalDevice]) -> ReconcileReport {
    let scope = InstalledAppScope {
        auth_token: &app.auth_token,
        location_id: &app.installed_app.location_id,
        installed_app_id: &app.installed_app.installed_app_id,
        profile_id: state.config.connector().device_profile_id(),
    };
    reconcile(state.hub.as_ref(), &scope, lights, devices).await
}

async fn create_poll_schedule(state: &AppState, app: &AuthorizedApp) -> Result<(), LifecycleError> {
    let cron = state.config.connector().poll_cron();
    state
        .hub
        .create_schedule(&app.auth_token, &app.installed_app.installed_app_id, POLL_SCHEDULE, cron)
        .await?;
    info!(cron, "⏰ Scheduled the light state poll");
    Ok(())
}

async fn replace_poll_schedule(state: &AppState, app: &AuthorizedApp) -> Result<(), LifecycleError> {
    state
        .hub
        .delete_schedules(&app.auth_token, &app.installed_app.installed_app_id)
        .await?;
    create_poll_schedule(state, app).await
}
