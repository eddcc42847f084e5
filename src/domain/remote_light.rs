use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// API: https://api.developer.lifx.com/docs/list-lights
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteLight {
    pub id: String,
    pub label: String,
    pub power: Power,
    pub brightness: f64,
    pub color: LightColor,
    pub connected: bool,
    pub location: Option<LightLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    Off,
}

impl Power {
    pub fn as_str(&self) -> &'static str {
        match self {
            Power::On => "on",
            Power::Off => "off",
        }
    }
}

impl Display for Power {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightColor {
    pub hue: f64,        // 0..=360
    pub saturation: f64, // 0..=1
    pub kelvin: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightLocation {
    pub id: String,
    pub name: String,
}

impl RemoteLight {
    pub fn is_online(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_a_light_from_the_list_lights_response() -> Result<(), serde_json::Error> {
        let lights = serde_json::from_str::<Vec<RemoteLight>>(include_str!("../../tests/resources/lifx_lights_response.json"))?;

        assert_eq!(lights.len(), 2);
        let light = &lights[0];
        assert_eq!(light.id, "d073d5000001");
        assert_eq!(light.label, "Living Room");
        assert_eq!(light.power, Power::On);
        assert_eq!(light.color.kelvin, 3500);
        assert!(light.is_online());
        assert_eq!(
            light.location,
            Some(LightLocation {
                id: "1d6fe8ef0fde4c6d77b0012dc736662c".to_string(),
                name: "Home".to_string(),
            })
        );

        Ok(())
    }

    #[test]
    fn power_displays_as_the_vendor_string() {
        assert_eq!(Power::On.to_string(), "on");
        assert_eq!(Power::Off.to_string(), "off");
    }
}
