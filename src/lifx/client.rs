use crate::app_config::AppConfig;
use crate::domain::{LightLocation, RemoteLight};
use crate::lifx::domain::{LightStateUpdate, OAuthTokenRequest, OAuthTokenResponse};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, Response, StatusCode, header};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, instrument};

const USER_AGENT: &str = "SmartThings Integration";

/// The LIFX HTTP API as used by the connector.
#[async_trait]
pub trait LightingPlatform: Debug + Send + Sync {
    /// Exchanges an OAuth authorization code for access and refresh tokens.
    async fn exchange_code(&self, code: &str, scope: Option<&str>) -> Result<OAuthTokenResponse, LifxError>;

    /// Returns the distinct locations of all lights visible with `token`.
    async fn list_locations(&self, token: &str) -> Result<Vec<LightLocation>, LifxError>;

    async fn list_lights(&self, token: &str, location_id: &str) -> Result<Vec<RemoteLight>, LifxError>;

    async fn get_light(&self, token: &str, light_id: &str) -> Result<Option<RemoteLight>, LifxError>;

    async fn set_state(&self, token: &str, light_id: &str, update: &LightStateUpdate) -> Result<(), LifxError>;
}

#[derive(Debug, Clone)]
pub struct LifxClient {
    client: Client,
    api_url: String,
    oauth_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

pub fn new_client(config: &AppConfig) -> Result<LifxClient, LifxError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

    let client = Client::builder().default_headers(headers).build()?;
    Ok(LifxClient {
        client,
        api_url: config.lifx().api_url().trim_end_matches('/').to_string(),
        oauth_url: config.lifx().oauth_url().trim_end_matches('/').to_string(),
        client_id: config.lifx().client_id().map(str::to_string),
        client_secret: config.lifx().client_secret().map(str::to_string),
    })
}

#[async_trait]
impl LightingPlatform for LifxClient {
    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str, scope: Option<&str>) -> Result<OAuthTokenResponse, LifxError> {
        let (Some(client_id), Some(client_secret)) = (self.client_id.as_deref(), self.client_secret.as_deref()) else {
            return Err(LifxError::MissingClientCredentials);
        };

        let request = OAuthTokenRequest {
            client_id,
            client_secret,
            grant_type: "authorization_code",
            code,
            scope,
        };

        let response = self.client.post(format!("{}/token", self.oauth_url)).json(&request).send().await?;
        let tokens = check_status(response).await?.json::<OAuthTokenResponse>().await?;
        debug!("Exchanged the LIFX authorization code for tokens");
        Ok(tokens)
    }

    #[instrument(skip_all)]
    async fn list_locations(&self, token: &str) -> Result<Vec<LightLocation>, LifxError> {
        let lights = self.get_lights(token, "all").await?;

        let mut locations: Vec<LightLocation> = Vec::new();
        for location in lights.into_iter().filter_map(|light| light.location) {
            if !locations.iter().any(|known| known.id == location.id) {
                locations.push(location);
            }
        }
        Ok(locations)
    }

    #[instrument(skip(self, token))]
    async fn list_lights(&self, token: &str, location_id: &str) -> Result<Vec<RemoteLight>, LifxError> {
        self.get_lights(token, &format!("location_id:{}", location_id)).await
    }

    #[instrument(skip(self, token))]
    async fn get_light(&self, token: &str, light_id: &str) -> Result<Option<RemoteLight>, LifxError> {
        match self.get_lights(token, &format!("id:{}", light_id)).await {
            Ok(lights) => Ok(lights.into_iter().next()),
            Err(LifxError::UnexpectedStatus { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, token))]
    async fn set_state(&self, token: &str, light_id: &str, update: &LightStateUpdate) -> Result<(), LifxError> {
        let response = self
            .client
            .put(format!("{}/lights/id:{}/state", self.api_url, light_id))
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

impl LifxClient {
    async fn get_lights(&self, token: &str, selector: &str) -> Result<Vec<RemoteLight>, LifxError> {
        let response = self
            .client
            .get(format!("{}/lights/{}", self.api_url, selector))
            .bearer_auth(token)
            .send()
            .await?;

        let lights = check_status(response).await?.json::<Vec<RemoteLight>>().await?;
        debug!(selector, "Retrieved {} LIFX light(s)", lights.len());
        Ok(lights)
    }
}

async fn check_status(response: Response) -> Result<Response, LifxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LifxError::UnexpectedStatus { status, body })
}

#[derive(Error, Debug)]
pub enum LifxError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("LIFX responded with status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("no LIFX OAuth client credentials are configured")]
    MissingClientCredentials,
}
