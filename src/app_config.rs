use config::{Config, ConfigError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    server: Server,
    connector: Connector,
    lifx: Lifx,
    smartthings: SmartThings,
    #[serde(default)]
    store: Store,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("CONNECTOR").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn lifx(&self) -> &Lifx {
        &self.lifx
    }

    pub fn smartthings(&self) -> &SmartThings {
        &self.smartthings
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    port: u16,
}

impl Server {
    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Deserialize)]
pub struct Connector {
    app_id: String,
    device_profile_id: String,
    poll_cron: String,
}

impl Connector {
    /// The app id reported to the hub during CONFIGURATION/INITIALIZE.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The hub device profile every created light is bound to.
    pub fn device_profile_id(&self) -> &str {
        &self.device_profile_id
    }

    pub fn poll_cron(&self) -> &str {
        &self.poll_cron
    }
}

#[derive(Debug, Deserialize)]
pub struct Lifx {
    api_url: String,
    oauth_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Lifx {
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn oauth_url(&self) -> &str {
        &self.oauth_url
    }

    /// `None` puts the connector in test mode, users then enter a personal access token.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct SmartThings {
    api_url: String,
    public_key_path: Option<String>,
}

impl SmartThings {
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn public_key_path(&self) -> Option<&str> {
        self.public_key_path.as_deref()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Store {
    directory: Option<String>,
}

impl Store {
    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                server: Server { port: 3003 },
                connector: Connector {
                    app_id: "lifx-connector".to_string(),
                    device_profile_id: "profile-id".to_string(),
                    poll_cron: "0/5 * * * ? *".to_string(),
                },
                lifx: Lifx {
                    api_url: "https://api.lifx.url/v1".to_string(),
                    oauth_url: "https://cloud.lifx.url/oauth".to_string(),
                    client_id: None,
                    client_secret: None,
                },
                smartthings: SmartThings {
                    api_url: "https://api.smartthings.url".to_string(),
                    public_key_path: None,
                },
                store: Store::default(),
            },
        }
    }

    pub fn lifx_url(mut self, url: String) -> Self {
        self.config.lifx.api_url = url;
        self
    }

    pub fn lifx_oauth_url(mut self, url: String) -> Self {
        self.config.lifx.oauth_url = url;
        self
    }

    pub fn lifx_client(mut self, client_id: &str, client_secret: &str) -> Self {
        self.config.lifx.client_id = Some(client_id.to_string());
        self.config.lifx.client_secret = Some(client_secret.to_string());
        self
    }

    pub fn smartthings_url(mut self, url: String) -> Self {
        self.config.smartthings.api_url = url;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
