mod attribute_event;
pub mod commands;
mod installed_app_config;
mod installed_app_state;
mod local_device;
mod remote_light;

pub use attribute_event::{AttributeEvent, Capability};
pub use installed_app_config::{InstalledAppConfig, LIFX_ACCESS_TOKEN};
pub use installed_app_state::InstalledAppState;
pub use local_device::LocalDevice;
#[cfg(test)]
pub use remote_light::LightColor;
pub use remote_light::{LightLocation, Power, RemoteLight};
