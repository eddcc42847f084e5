use crate::domain::LocalDevice;
use serde::{Deserialize, Serialize};

// API: https://developer.smartthings.com/docs/api/public#operation/getDevices
#[derive(Debug, Deserialize)]
pub struct DeviceListResponse {
    pub items: Vec<DeviceItem>,
    #[serde(rename = "_links")]
    pub links: Option<Links>,
}

#[derive(Debug, Deserialize)]
pub struct Links {
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceItem {
    pub device_id: String,
    pub label: Option<String>,
    pub app: Option<DeviceApp>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceApp {
    pub installed_app_id: Option<String>,
    pub external_id: Option<String>,
    pub profile_id: Option<String>,
}

impl DeviceItem {
    /// Returns the device when it was created by `installed_app_id`.
    pub fn into_local_device(self, installed_app_id: &str) -> Option<LocalDevice> {
        let app = self.app?;
        if app.installed_app_id.as_deref() != Some(installed_app_id) {
            return None;
        }

        Some(LocalDevice {
            device_id: self.device_id,
            external_id: app.external_id.unwrap_or_default(),
            label: self.label.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest<'a> {
    pub label: &'a str,
    pub location_id: &'a str,
    pub app: CreateDeviceApp<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceApp<'a> {
    pub profile_id: &'a str,
    pub installed_app_id: &'a str,
    pub external_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceResponse {
    pub device_id: String,
    pub label: Option<String>,
}
