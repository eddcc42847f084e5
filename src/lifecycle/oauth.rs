use crate::app_state::AppState;
use crate::domain::InstalledAppState;
use crate::lifecycle::LifecycleError;
use crate::lifecycle::payload::OAuthCallbackData;
use tracing::{info, instrument};

/// Exchanges the authorization code LIFX redirected with for tokens and stores them.
#[instrument(skip_all, fields(installed_app_id = data.installed_app_id))]
pub async fn handle_oauth_callback(state: AppState, data: OAuthCallbackData) -> Result<(), LifecycleError> {
    let (code, scope) = parse_callback_query(&data.url_path);
    let code = code.ok_or(LifecycleError::MissingAuthorizationCode)?;

    let tokens = state.lifx.exchange_code(&code, scope.as_deref()).await?;
    let app_state = InstalledAppState {
        lifx_access_token: tokens.access_token,
        lifx_refresh_token: tokens.refresh_token,
    };
    state.store.put(&data.installed_app_id, &app_state).await?;

    info!("🔑 Connected to LIFX");
    Ok(())
}

/// Returns the `code` and `scope` parameters of the callback url path.
fn parse_callback_query(url_path: &str) -> (Option<String>, Option<String>) {
    let query = url_path.split_once('?').map_or(url_path, |(_, query)| query);

    let mut code = None;
    let mut scope = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "scope" => scope = Some(value.into_owned()),
            _ => {}
        }
    }
    (code, scope)
}
