use crate::domain::InstalledAppConfig;
use crate::domain::commands::HubCommand;
use serde::Deserialize;
use serde_json::Value;

// API: https://developer.smartthings.com/docs/connected-services/lifecycles
#[derive(Debug, Deserialize)]
#[serde(tag = "lifecycle", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum LifecycleRequest {
    Ping {
        ping_data: PingData,
    },
    Configuration {
        configuration_data: ConfigurationData,
    },
    OauthCallback {
        #[serde(alias = "oAuthCallbackData")]
        oauth_callback_data: OAuthCallbackData,
    },
    Install {
        install_data: AuthorizedApp,
    },
    Update {
        update_data: AuthorizedApp,
    },
    Uninstall {
        uninstall_data: UninstallData,
    },
    Event {
        event_data: EventData,
    },
    Execute {
        execute_data: Option<Value>,
    },
    #[serde(other)]
    Unsupported,
}

impl LifecycleRequest {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleRequest::Ping { .. } => "PING",
            LifecycleRequest::Configuration { .. } => "CONFIGURATION",
            LifecycleRequest::OauthCallback { .. } => "OAUTH_CALLBACK",
            LifecycleRequest::Install { .. } => "INSTALL",
            LifecycleRequest::Update { .. } => "UPDATE",
            LifecycleRequest::Uninstall { .. } => "UNINSTALL",
            LifecycleRequest::Event { .. } => "EVENT",
            LifecycleRequest::Execute { .. } => "EXECUTE",
            LifecycleRequest::Unsupported => "UNSUPPORTED",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PingData {
    pub challenge: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigurationPhase {
    Initialize,
    Page,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationData {
    pub installed_app_id: String,
    pub phase: ConfigurationPhase,
    pub page_id: Option<String>,
    #[serde(default)]
    pub config: InstalledAppConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackData {
    pub installed_app_id: String,
    pub url_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledApp {
    pub installed_app_id: String,
    pub location_id: String,
    #[serde(default)]
    pub config: InstalledAppConfig,
}

/// An installed app together with the token that authorizes calls to the hub on its behalf.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedApp {
    pub auth_token: String,
    pub installed_app: InstalledApp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallData {
    pub installed_app: InstalledApp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(flatten)]
    pub app: AuthorizedApp,
    #[serde(default)]
    pub events: Vec<HubEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "eventType", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum HubEvent {
    DeviceEvent {
        device_event: Option<Value>,
    },
    TimerEvent {
        timer_event: TimerEvent,
    },
    DeviceCommandsEvent {
        device_commands_event: DeviceCommandsEvent,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct TimerEvent {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCommandsEvent {
    pub device_id: String,
    pub external_id: String,
    #[serde(default)]
    pub commands: Vec<HubCommand>,
}
