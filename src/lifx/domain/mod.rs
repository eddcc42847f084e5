mod light_state_update;
mod oauth_token;

pub use light_state_update::LightStateUpdate;
pub use oauth_token::{OAuthTokenRequest, OAuthTokenResponse};
