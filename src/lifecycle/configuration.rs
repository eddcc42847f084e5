use crate::app_config::AppConfig;
use crate::app_state::AppState;
use crate::domain::{LIFX_ACCESS_TOKEN, LightLocation};
use crate::lifecycle::lifx_token;
use crate::lifecycle::payload::ConfigurationData;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

const MAIN_PAGE: &str = "mainPage";
const LOCATIONS_PAGE: &str = "locationsPage";
const LIFX_SCOPE: &str = "remote_control:all";
const LIFX_SETTINGS_URL: &str = "https://cloud.lifx.com/settings";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    page_id: &'static str,
    name: &'static str,
    next_page_id: Option<&'static str>,
    previous_page_id: Option<&'static str>,
    complete: bool,
    sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    settings: Vec<Setting>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
enum Setting {
    #[serde(rename = "OAUTH")]
    OAuth {
        id: &'static str,
        name: &'static str,
        required: bool,
        url_template: String,
    },
    Paragraph {
        id: &'static str,
        name: &'static str,
    },
    Text {
        id: &'static str,
        name: &'static str,
        description: &'static str,
        required: bool,
    },
    Link {
        id: &'static str,
        name: &'static str,
        required: bool,
        url: &'static str,
    },
    Enum {
        id: &'static str,
        name: &'static str,
        required: bool,
        options: Vec<LightLocation>,
    },
}

pub fn initialize(config: &AppConfig) -> Value {
    json!({
        "initialize": {
            "id": config.connector().app_id(),
            "name": "LIFX Connector",
            "description": "Creates LIFX devices in SmartThings",
            "permissions": ["l:devices", "i:deviceprofiles", "w:schedules"],
            "firstPage": MAIN_PAGE
        }
    })
}

/// Picks the page to show, depending on whether OAuth is configured and a token is known.
#[instrument(skip_all, fields(installed_app_id = data.installed_app_id, page_id = ?data.page_id))]
pub async fn page(state: &AppState, data: &ConfigurationData) -> Value {
    let page = match state.config.lifx().client_id() {
        Some(client_id) => {
            let authenticated = match state.store.get(&data.installed_app_id).await {
                Ok(stored) => stored.is_some(),
                Err(e) => {
                    warn!("⚠️ Unable to read the stored state: {}", e);
                    false
                }
            };

            if authenticated {
                locations_page(state, data).await
            } else {
                auth_page(state.config.lifx().oauth_url(), client_id)
            }
        }
        None if data.page_id.as_deref() == Some(LOCATIONS_PAGE) => locations_page(state, data).await,
        None => token_page(),
    };

    json!({ "page": page })
}

fn authorize_url(oauth_url: &str, client_id: &str) -> String {
    let base = format!("{}/authorize", oauth_url.trim_end_matches('/'));
    match Url::parse_with_params(&base, &[("client_id", client_id), ("scope", LIFX_SCOPE), ("response_type", "code")]) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!("⚠️ Invalid LIFX OAuth url '{}': {}", base, e);
            base
        }
    }
}

fn auth_page(oauth_url: &str, client_id: &str) -> Page {
    let url_template = authorize_url(oauth_url, client_id);
    debug!(url_template, "Showing the LIFX authorization page");

    Page {
        page_id: MAIN_PAGE,
        name: "Connect to LIFX",
        next_page_id: None,
        previous_page_id: None,
        complete: false,
        sections: vec![Section {
            name: Some("Remote service authorization"),
            settings: vec![Setting::OAuth {
                id: "OAuth",
                name: "Connect to LIFX",
                required: false,
                url_template,
            }],
        }],
    }
}

fn token_page() -> Page {
    Page {
        page_id: MAIN_PAGE,
        name: "Connect to LIFX",
        next_page_id: Some(LOCATIONS_PAGE),
        previous_page_id: None,
        complete: false,
        sections: vec![
            Section {
                name: Some("Remote service authorization"),
                settings: vec![
                    Setting::Paragraph {
                        id: "text",
                        name: "This app is in test mode. To use it you should enter your test access token from the LIFX developer site. \
                               Test mode provides all features of the app other than OAuth into LIFX. \
                               To test that feature you will need to obtain a client ID and secret from LIFX. You can do that from the link below.",
                    },
                    Setting::Text {
                        id: LIFX_ACCESS_TOKEN,
                        name: "Enter your LIFX API token",
                        description: "From https://cloud.lifx.com/",
                        required: true,
                    },
                ],
            },
            Section {
                name: None,
                settings: vec![Setting::Link {
                    id: "href",
                    name: "Get a LIFX Personal Access Token >>",
                    required: false,
                    url: LIFX_SETTINGS_URL,
                }],
            },
        ],
    }
}

async fn locations_page(state: &AppState, data: &ConfigurationData) -> Page {
    let locations = match lifx_token(state, &data.installed_app_id, &data.config).await {
        Ok(token) => state.lifx.list_locations(&token).await.unwrap_or_else(|e| {
            warn!("⚠️ Unable to retrieve the LIFX locations: {}", e);
            Vec::new()
        }),
        Err(e) => {
            warn!("⚠️ Unable to list the LIFX locations: {}", e);
            Vec::new()
        }
    };

    Page {
        page_id: LOCATIONS_PAGE,
        name: "Select Location",
        next_page_id: None,
        previous_page_id: None,
        complete: true,
        sections: vec![Section {
            name: None,
            settings: vec![Setting::Enum {
                id: "lifxLocationId",
                name: "Select location",
                required: false,
                options: locations,
            }],
        }],
    }
}
