use crate::domain::{InstalledAppConfig, InstalledAppState, LIFX_ACCESS_TOKEN};

/// Returns the LIFX access token of an installed app.
///
/// The token obtained through OAuth is persisted in the state store. Without OAuth client
/// credentials users enter a personal access token on the configuration page instead, which
/// ends up in the installed app config. Refresh tokens are stored but never exchanged.
pub fn resolve_lifx_token<'a>(state: Option<&'a InstalledAppState>, config: &'a InstalledAppConfig) -> Option<&'a str> {
    match state {
        Some(state) => Some(state.lifx_access_token.as_str()),
        None => config.string_value(LIFX_ACCESS_TOKEN),
    }
}
