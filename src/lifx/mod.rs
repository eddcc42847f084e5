mod client;
pub mod domain;
mod map_command;
mod map_light_events;

pub use client::{LifxError, LightingPlatform, new_client};
pub use map_command::{CommandPlan, map_command};
pub use map_light_events::full_event_list;
