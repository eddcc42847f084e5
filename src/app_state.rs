use crate::app_config::AppConfig;
use crate::lifx::LightingPlatform;
use crate::server::HttpSignatureVerifier;
use crate::smartthings::HubPlatform;
use crate::store::StateStore;
use std::sync::Arc;

/// Everything a lifecycle request needs, shared by all requests.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub lifx: Arc<dyn LightingPlatform>,
    pub hub: Arc<dyn HubPlatform>,
    pub store: Arc<dyn StateStore>,
    /// `None` disables request signature verification.
    pub verifier: Option<Arc<HttpSignatureVerifier>>,
}
