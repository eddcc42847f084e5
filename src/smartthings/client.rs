use crate::app_config::AppConfig;
use crate::domain::{AttributeEvent, LocalDevice};
use crate::smartthings::domain::{CreateDeviceRequest, CreateDeviceResponse, CronSchedule, DeviceListResponse, ScheduleRequest};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::collections::HashSet;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

const SCHEDULE_TIMEZONE: &str = "GMT";

/// The SmartThings API as used by the connector. Every call is authorized with the short-lived
/// token the hub passes along with each lifecycle request.
#[async_trait]
pub trait HubPlatform: Debug + Send + Sync {
    /// Returns the devices of `location_id` that were created by `installed_app_id`.
    async fn list_devices(&self, auth_token: &str, location_id: &str, installed_app_id: &str) -> Result<Vec<LocalDevice>, SmartThingsError>;

    async fn create_device(&self, auth_token: &str, request: &CreateDeviceRequest<'_>) -> Result<LocalDevice, SmartThingsError>;

    async fn delete_device(&self, auth_token: &str, device_id: &str) -> Result<(), SmartThingsError>;

    async fn send_events(&self, auth_token: &str, device_id: &str, events: &[AttributeEvent]) -> Result<(), SmartThingsError>;

    async fn create_schedule(&self, auth_token: &str, installed_app_id: &str, name: &str, cron: &str) -> Result<(), SmartThingsError>;

    async fn delete_schedules(&self, auth_token: &str, installed_app_id: &str) -> Result<(), SmartThingsError>;
}

#[derive(Debug, Clone)]
pub struct SmartThingsClient {
    client: Client,
    api_url: String,
}

pub fn new_client(config: &AppConfig) -> Result<SmartThingsClient, SmartThingsError> {
    let client = Client::builder().build()?;
    Ok(SmartThingsClient {
        client,
        api_url: config.smartthings().api_url().trim_end_matches('/').to_string(),
    })
}

#[async_trait]
impl HubPlatform for SmartThingsClient {
    #[instrument(skip(self, auth_token))]
    async fn list_devices(&self, auth_token: &str, location_id: &str, installed_app_id: &str) -> Result<Vec<LocalDevice>, SmartThingsError> {
        let mut devices = Vec::new();
        let mut visited = HashSet::new();
        let mut request = self
            .client
            .get(format!("{}/devices", self.api_url))
            .query(&[("locationId", location_id)]);

        loop {
            let response = request.bearer_auth(auth_token).send().await?;
            let page = check_status(response).await?.json::<DeviceListResponse>().await?;

            devices.extend(page.items.into_iter().filter_map(|item| item.into_local_device(installed_app_id)));

            let Some(next) = page.links.and_then(|links| links.next) else {
                break;
            };
            if !next.href.starts_with(&format!("{}/", self.api_url)) {
                return Err(SmartThingsError::UnexpectedLink(next.href));
            }
            if !visited.insert(next.href.clone()) {
                warn!(href = %next.href, "⚠️ Device page was already listed, stopping");
                break;
            }
            request = self.client.get(next.href);
        }

        debug!("Found {} device(s) of this installed app", devices.len());
        Ok(devices)
    }

    #[instrument(skip(self, auth_token), fields(external_id = request.app.external_id))]
    async fn create_device(&self, auth_token: &str, request: &CreateDeviceRequest<'_>) -> Result<LocalDevice, SmartThingsError> {
        let response = self
            .client
            .post(format!("{}/devices", self.api_url))
            .bearer_auth(auth_token)
            .json(request)
            .send()
            .await?;

        let created = check_status(response).await?.json::<CreateDeviceResponse>().await?;
        Ok(LocalDevice {
            device_id: created.device_id,
            external_id: request.app.external_id.to_string(),
            label: created.label.unwrap_or_else(|| request.label.to_string()),
        })
    }

    #[instrument(skip(self, auth_token))]
    async fn delete_device(&self, auth_token: &str, device_id: &str) -> Result<(), SmartThingsError> {
        let response = self
            .client
            .delete(format!("{}/devices/{}", self.api_url, device_id))
            .bearer_auth(auth_token)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, auth_token, events))]
    async fn send_events(&self, auth_token: &str, device_id: &str, events: &[AttributeEvent]) -> Result<(), SmartThingsError> {
        trace!(?events, "Sending {} event(s)", events.len());
        let response = self
            .client
            .post(format!("{}/devices/{}/events", self.api_url, device_id))
            .bearer_auth(auth_token)
            .json(events)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, auth_token))]
    async fn create_schedule(&self, auth_token: &str, installed_app_id: &str, name: &str, cron: &str) -> Result<(), SmartThingsError> {
        let request = ScheduleRequest {
            name,
            cron: CronSchedule {
                expression: cron,
                timezone: SCHEDULE_TIMEZONE,
            },
        };

        let response = self
            .client
            .post(format!("{}/installedapps/{}/schedules", self.api_url, installed_app_id))
            .bearer_auth(auth_token)
            .json(&request)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, auth_token))]
    async fn delete_schedules(&self, auth_token: &str, installed_app_id: &str) -> Result<(), SmartThingsError> {
        let response = self
            .client
            .delete(format!("{}/installedapps/{}/schedules", self.api_url, installed_app_id))
            .bearer_auth(auth_token)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, SmartThingsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SmartThingsError::UnexpectedStatus { status, body })
}

#[derive(Error, Debug)]
pub enum SmartThingsError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("SmartThings responded with status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("next page link outside of the SmartThings API: {0}")]
    UnexpectedLink(String),
}
