mod client;
pub mod domain;

pub use client::{HubPlatform, SmartThingsError, new_client};
