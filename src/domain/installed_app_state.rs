use serde::{Deserialize, Serialize};

/// OAuth tokens obtained for one installed app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledAppState {
    pub lifx_access_token: String,
    pub lifx_refresh_token: String,
}
