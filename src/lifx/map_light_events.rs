use crate::domain::{AttributeEvent, Capability, RemoteLight};
use crate::extensions::float_ext::ScaleConversions;

pub const ONLINE: &str = "online";
pub const OFFLINE: &str = "offline";

/// Maps the state of a LIFX light to the complete set of hub attribute events, in a fixed order.
pub fn full_event_list(light: &RemoteLight) -> Vec<AttributeEvent> {
    let health_status = if light.is_online() { ONLINE } else { OFFLINE };

    vec![
        AttributeEvent::switch(light.power.as_str()),
        AttributeEvent::level(light.brightness.fraction_to_percent()),
        AttributeEvent::color_temperature(light.color.kelvin),
        AttributeEvent::hue(light.color.hue.degrees_to_hub_hue()),
        AttributeEvent::saturation(light.color.saturation.fraction_to_percent()),
        AttributeEvent::main(Capability::HealthCheck, "DeviceWatch-DeviceStatus", health_status),
        AttributeEvent::main(Capability::HealthCheck, "healthStatus", health_status),
    ]
}
