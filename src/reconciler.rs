use crate::domain::{LocalDevice, RemoteLight};
use crate::lifx::full_event_list;
use crate::smartthings::domain::{CreateDeviceApp, CreateDeviceRequest};
use crate::smartthings::{HubPlatform, SmartThingsError};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// The installed app on whose behalf devices are created.
#[derive(Debug, Clone, Copy)]
pub struct InstalledAppScope<'a> {
    pub auth_token: &'a str,
    pub location_id: &'a str,
    pub installed_app_id: &'a str,
    pub profile_id: &'a str,
}

#[derive(Debug, PartialEq)]
pub struct DeviceDelta<'a> {
    /// Lights without a device.
    pub to_create: Vec<&'a RemoteLight>,
    /// Devices whose light is gone.
    pub to_delete: Vec<&'a LocalDevice>,
}

impl DeviceDelta<'_> {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ReconcileReport {
    pub created: Vec<LocalDevice>,
    pub deleted: Vec<String>,
    pub failed: usize,
}

/// Matches lights and devices on the LIFX light id, which every device carries as its external id.
pub fn compute_delta<'a>(lights: &'a [RemoteLight], devices: &'a [LocalDevice]) -> DeviceDelta<'a> {
    let light_ids = lights.iter().map(|light| light.id.as_str()).collect::<HashSet<_>>();
    let external_ids = devices.iter().map(|device| device.external_id.as_str()).collect::<HashSet<_>>();

    DeviceDelta {
        to_create: lights.iter().filter(|light| !external_ids.contains(light.id.as_str())).collect(),
        to_delete: devices.iter().filter(|device| !light_ids.contains(device.external_id.as_str())).collect(),
    }
}

/// Creates a device for every new light and deletes every device whose light disappeared.
///
/// All operations run concurrently. A failing operation is logged and does not affect the others.
#[instrument(skip_all, fields(installed_app_id = scope.installed_app_id))]
pub async fn reconcile(hub: &dyn HubPlatform, scope: &InstalledAppScope<'_>, lights: &[RemoteLight], devices: &[LocalDevice]) -> ReconcileReport {
    let delta = compute_delta(lights, devices);
    if delta.is_empty() {
        debug!("🔁 Devices are in sync with {} light(s)", lights.len());
        return ReconcileReport::default();
    }

    info!(
        "🔁 Reconciling devices, {} to create, {} to delete...",
        delta.to_create.len(),
        delta.to_delete.len()
    );

    let creations = join_all(delta.to_create.iter().map(|light| create_device(hub, scope, light)));
    let deletions = join_all(delta.to_delete.iter().map(|device| delete_device(hub, scope, device)));
    let (created, deleted) = futures::join!(creations, deletions);

    let mut report = ReconcileReport::default();
    for result in created {
        match result {
            Ok(device) => report.created.push(device),
            Err(_) => report.failed += 1,
        }
    }
    for result in deleted {
        match result {
            Ok(device_id) => report.deleted.push(device_id),
            Err(_) => report.failed += 1,
        }
    }

    info!(
        "🔁 Reconciling devices... OK, {} created, {} deleted, {} failed",
        report.created.len(),
        report.deleted.len(),
        report.failed
    );
    report
}

async fn create_device(hub: &dyn HubPlatform, scope: &InstalledAppScope<'_>, light: &RemoteLight) -> Result<LocalDevice, SmartThingsError> {
    let request = CreateDeviceRequest {
        label: &light.label,
        location_id: scope.location_id,
        app: CreateDeviceApp {
            profile_id: scope.profile_id,
            installed_app_id: scope.installed_app_id,
            external_id: &light.id,
        },
    };

    let device = hub.create_device(scope.auth_token, &request).await.inspect_err(|e| {
        warn!(light_id = light.id, "⚠️ Unable to create a device for light '{}': {}", light.label, e);
    })?;
    debug!(light_id = light.id, device_id = device.device_id, "Created device for light '{}'", light.label);

    // The device exists at this point, a failure to initialize its state is only logged
    if let Err(e) = hub.send_events(scope.auth_token, &device.device_id, &full_event_list(light)).await {
        warn!(device_id = device.device_id, "⚠️ Unable to send the initial state of '{}': {}", light.label, e);
    }

    Ok(device)
}

async fn delete_device(hub: &dyn HubPlatform, scope: &InstalledAppScope<'_>, device: &LocalDevice) -> Result<String, SmartThingsError> {
    hub.delete_device(scope.auth_token, &device.device_id).await.inspect_err(|e| {
        warn!(device_id = device.device_id, "⚠️ Unable to delete device '{}': {}", device.label, e);
    })?;
    debug!(device_id = device.device_id, "Deleted device '{}'", device.label);
    Ok(device.device_id.clone())
}
