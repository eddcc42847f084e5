use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A command as the hub sends it inside a DEVICE_COMMANDS_EVENT.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubCommand {
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub capability: Option<String>,
    pub command: String,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

/// A validated light command, values are in hub units (0..=100 for level, hue and saturation).
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    On,
    Off,
    SetLevel(f64),
    SetHue(f64),
    SetSaturation(f64),
    SetColorTemperature(u32),
    SetColor { hue: f64, saturation: f64 },
    Refresh,
}

impl TryFrom<&HubCommand> for DeviceCommand {
    type Error = CommandError;

    fn try_from(command: &HubCommand) -> Result<Self, Self::Error> {
        let name = command.command.as_str();
        match name {
            "on" => Ok(DeviceCommand::On),
            "off" => Ok(DeviceCommand::Off),
            "setLevel" => Ok(DeviceCommand::SetLevel(number_argument(command)?)),
            "setHue" => Ok(DeviceCommand::SetHue(number_argument(command)?)),
            "setSaturation" => Ok(DeviceCommand::SetSaturation(number_argument(command)?)),
            "setColorTemperature" => Ok(DeviceCommand::SetColorTemperature(number_argument(command)?.round() as u32)),
            "setColor" => {
                let map = first_argument(command)?;
                let hue = map.get("hue").and_then(Value::as_f64);
                let saturation = map.get("saturation").and_then(Value::as_f64);
                match (hue, saturation) {
                    (Some(hue), Some(saturation)) => Ok(DeviceCommand::SetColor { hue, saturation }),
                    _ => Err(CommandError::InvalidArgument {
                        command: command.command.clone(),
                        value: map.clone(),
                    }),
                }
            }
            "refresh" => Ok(DeviceCommand::Refresh),
            _ => Err(CommandError::Unsupported(command.command.clone())),
        }
    }
}

fn first_argument(command: &HubCommand) -> Result<&Value, CommandError> {
    command
        .arguments
        .first()
        .ok_or_else(|| CommandError::MissingArgument { command: command.command.clone() })
}

fn number_argument(command: &HubCommand) -> Result<f64, CommandError> {
    let value = first_argument(command)?;
    value.as_f64().ok_or_else(|| CommandError::InvalidArgument {
        command: command.command.clone(),
        value: value.clone(),
    })
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("unsupported command '{0}'")]
    Unsupported(String),
    #[error("command '{command}' requires an argument")]
    MissingArgument { command: String },
    #[error("command '{command}' received an invalid argument: {value}")]
    InvalidArgument { command: String, value: Value },
}
