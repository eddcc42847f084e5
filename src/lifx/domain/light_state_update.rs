use crate::domain::Power;
use serde::Serialize;

// API: https://api.developer.lifx.com/docs/set-state
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LightStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Power>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LightStateUpdate {
    pub fn power(power: Power) -> Self {
        LightStateUpdate {
            power: Some(power),
            ..Default::default()
        }
    }

    /// Turns the light on while setting its brightness (0..=1).
    pub fn brightness(brightness: f64) -> Self {
        LightStateUpdate {
            power: Some(Power::On),
            brightness: Some(brightness),
            color: None,
        }
    }

    /// Turns the light on while applying a LIFX color string, e.g. `hue:120 saturation:0.5`.
    pub fn color(color: String) -> Self {
        LightStateUpdate {
            power: Some(Power::On),
            brightness: None,
            color: Some(color),
        }
    }
}
