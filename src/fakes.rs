//! Recording stand-ins for the LIFX and SmartThings APIs.

use crate::domain::{AttributeEvent, LightColor, LightLocation, LocalDevice, Power, RemoteLight};
use crate::lifx::domain::{LightStateUpdate, OAuthTokenResponse};
use crate::lifx::{LifxError, LightingPlatform};
use crate::smartthings::domain::CreateDeviceRequest;
use crate::smartthings::{HubPlatform, SmartThingsError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::Mutex;

pub fn remote_light(id: &str) -> RemoteLight {
    RemoteLight {
        id: id.to_string(),
        label: format!("Light {}", id),
        power: Power::On,
        brightness: 0.5,
        color: LightColor {
            hue: 90.0,
            saturation: 0.2,
            kelvin: 3500,
        },
        connected: true,
        location: Some(LightLocation {
            id: "location-1".to_string(),
            name: "Home".to_string(),
        }),
    }
}

pub fn local_device(external_id: &str) -> LocalDevice {
    LocalDevice {
        device_id: format!("device-{}", external_id),
        external_id: external_id.to_string(),
        label: format!("Light {}", external_id),
    }
}

fn server_error() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

#[derive(Debug, Clone, PartialEq)]
pub enum HubCall {
    ListDevices { auth_token: String, location_id: String },
    CreateDevice { external_id: String, label: String, profile_id: String },
    DeleteDevice { device_id: String },
    SendEvents { device_id: String, events: Vec<AttributeEvent> },
    CreateSchedule { name: String, cron: String },
    DeleteSchedules,
}

#[derive(Debug, Default)]
pub struct FakeHub {
    devices: Vec<LocalDevice>,
    failing_ids: HashSet<String>,
    calls: Mutex<Vec<HubCall>>,
}

impl FakeHub {
    pub fn with_devices(devices: Vec<LocalDevice>) -> Self {
        FakeHub {
            devices,
            ..Default::default()
        }
    }

    /// Makes every call about this external id, device id or schedule name fail.
    pub fn failing_for(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<HubCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: HubCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, id: &str) -> Result<(), SmartThingsError> {
        if self.failing_ids.contains(id) {
            return Err(SmartThingsError::UnexpectedStatus {
                status: server_error(),
                body: format!("failure for {}", id),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HubPlatform for FakeHub {
    async fn list_devices(&self, auth_token: &str, location_id: &str, _installed_app_id: &str) -> Result<Vec<LocalDevice>, SmartThingsError> {
        self.record(HubCall::ListDevices {
            auth_token: auth_token.to_string(),
            location_id: location_id.to_string(),
        });
        Ok(self.devices.clone())
    }

    async fn create_device(&self, _auth_token: &str, request: &CreateDeviceRequest<'_>) -> Result<LocalDevice, SmartThingsError> {
        self.record(HubCall::CreateDevice {
            external_id: request.app.external_id.to_string(),
            label: request.label.to_string(),
            profile_id: request.app.profile_id.to_string(),
        });
        self.check(request.app.external_id)?;
        Ok(LocalDevice {
            label: request.label.to_string(),
            ..local_device(request.app.external_id)
        })
    }

    async fn delete_device(&self, _auth_token: &str, device_id: &str) -> Result<(), SmartThingsError> {
        self.record(HubCall::DeleteDevice {
            device_id: device_id.to_string(),
        });
        self.check(device_id)
    }

    async fn send_events(&self, _auth_token: &str, device_id: &str, events: &[AttributeEvent]) -> Result<(), SmartThingsError> {
        self.record(HubCall::SendEvents {
            device_id: device_id.to_string(),
            events: events.to_vec(),
        });
        self.check(device_id)
    }

    async fn create_schedule(&self, _auth_token: &str, _installed_app_id: &str, name: &str, cron: &str) -> Result<(), SmartThingsError> {
        self.record(HubCall::CreateSchedule {
            name: name.to_string(),
            cron: cron.to_string(),
        });
        self.check(name)
    }

    async fn delete_schedules(&self, _auth_token: &str, _installed_app_id: &str) -> Result<(), SmartThingsError> {
        self.record(HubCall::DeleteSchedules);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifxCall {
    ExchangeCode { code: String, scope: Option<String> },
    ListLocations { token: String },
    ListLights { token: String, location_id: String },
    GetLight { token: String, light_id: String },
    SetState { token: String, light_id: String, update: LightStateUpdate },
}

#[derive(Debug, Default)]
pub struct FakeLifx {
    lights: Vec<RemoteLight>,
    failing_ids: HashSet<String>,
    calls: Mutex<Vec<LifxCall>>,
}

impl FakeLifx {
    pub fn with_lights(lights: Vec<RemoteLight>) -> Self {
        FakeLifx {
            lights,
            ..Default::default()
        }
    }

    /// Makes every call about this light id fail.
    pub fn failing_for(mut self, light_id: &str) -> Self {
        self.failing_ids.insert(light_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<LifxCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: LifxCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LightingPlatform for FakeLifx {
    async fn exchange_code(&self, code: &str, scope: Option<&str>) -> Result<OAuthTokenResponse, LifxError> {
        self.record(LifxCall::ExchangeCode {
            code: code.to_string(),
            scope: scope.map(str::to_string),
        });
        Ok(OAuthTokenResponse {
            access_token: format!("access-{}", code),
            refresh_token: format!("refresh-{}", code),
            token_type: Some("Bearer".to_string()),
            expires_in: None,
        })
    }

    async fn list_locations(&self, token: &str) -> Result<Vec<LightLocation>, LifxError> {
        self.record(LifxCall::ListLocations { token: token.to_string() });
        let mut locations: Vec<LightLocation> = Vec::new();
        for location in self.lights.iter().filter_map(|light| light.location.clone()) {
            if !locations.contains(&location) {
                locations.push(location);
            }
        }
        Ok(locations)
    }

    async fn list_lights(&self, token: &str, location_id: &str) -> Result<Vec<RemoteLight>, LifxError> {
        self.record(LifxCall::ListLights {
            token: token.to_string(),
            location_id: location_id.to_string(),
        });
        Ok(self.lights.clone())
    }

    async fn get_light(&self, token: &str, light_id: &str) -> Result<Option<RemoteLight>, LifxError> {
        self.record(LifxCall::GetLight {
            token: token.to_string(),
            light_id: light_id.to_string(),
        });
        Ok(self.lights.iter().find(|light| light.id == light_id).cloned())
    }

    async fn set_state(&self, token: &str, light_id: &str, update: &LightStateUpdate) -> Result<(), LifxError> {
        self.record(LifxCall::SetState {
            token: token.to_string(),
            light_id: light_id.to_string(),
            update: update.clone(),
        });
        if self.failing_ids.contains(light_id) {
            return Err(LifxError::UnexpectedStatus {
                status: server_error(),
                body: format!("failure for {}", light_id),
            });
        }
        Ok(())
    }
}
