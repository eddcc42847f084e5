use crate::domain::commands::DeviceCommand;
use crate::domain::{AttributeEvent, Power};
use crate::extensions::float_ext::ScaleConversions;
use crate::lifx::domain::LightStateUpdate;

#[derive(Debug, PartialEq)]
pub enum CommandPlan {
    /// Send `request` to LIFX and report `events` to the hub once it succeeds.
    Update {
        request: LightStateUpdate,
        events: Vec<AttributeEvent>,
    },
    /// Read the light and report its full state.
    Refresh,
}

pub fn map_command(command: &DeviceCommand) -> CommandPlan {
    let (request, events) = match *command {
        DeviceCommand::On => (LightStateUpdate::power(Power::On), vec![AttributeEvent::switch(Power::On.as_str())]),
        DeviceCommand::Off => (LightStateUpdate::power(Power::Off), vec![AttributeEvent::switch(Power::Off.as_str())]),
        DeviceCommand::SetLevel(level) => (
            LightStateUpdate::brightness(level.percent_to_fraction()),
            vec![switched_on(), AttributeEvent::level(level)],
        ),
        DeviceCommand::SetHue(hue) => (
            LightStateUpdate::color(format!("hue:{}", hue.hub_hue_to_degrees())),
            vec![switched_on(), AttributeEvent::hue(hue)],
        ),
        DeviceCommand::SetSaturation(saturation) => (
            LightStateUpdate::color(format!("saturation:{}", saturation.percent_to_fraction())),
            vec![switched_on(), AttributeEvent::saturation(saturation)],
        ),
        DeviceCommand::SetColorTemperature(kelvin) => (
            LightStateUpdate::color(format!("kelvin:{}", kelvin)),
            vec![switched_on(), AttributeEvent::color_temperature(kelvin)],
        ),
        DeviceCommand::SetColor { hue, saturation } => (
            LightStateUpdate::color(format!(
                "hue:{} saturation:{}",
                hue.hub_hue_to_degrees(),
                saturation.percent_to_fraction()
            )),
            vec![switched_on(), AttributeEvent::hue(hue), AttributeEvent::saturation(saturation)],
        ),
        DeviceCommand::Refresh => return CommandPlan::Refresh,
    };

    CommandPlan::Update { request, events }
}

fn switched_on() -> AttributeEvent {
    AttributeEvent::switch(Power::On.as_str())
}
