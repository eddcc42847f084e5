use serde::Serialize;
use serde_json::Value;

pub const MAIN_COMPONENT: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Switch,
    SwitchLevel,
    ColorTemperature,
    ColorControl,
    HealthCheck,
}

/// A device attribute change reported to the hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeEvent {
    pub component: &'static str,
    pub capability: Capability,
    pub attribute: &'static str,
    pub value: Value,
}

impl AttributeEvent {
    pub fn main(capability: Capability, attribute: &'static str, value: impl Into<Value>) -> Self {
        AttributeEvent {
            component: MAIN_COMPONENT,
            capability,
            attribute,
            value: value.into(),
        }
    }

    pub fn switch(value: &str) -> Self {
        Self::main(Capability::Switch, "switch", value)
    }

    pub fn level(value: f64) -> Self {
        Self::main(Capability::SwitchLevel, "level", value)
    }

    pub fn color_temperature(kelvin: u32) -> Self {
        Self::main(Capability::ColorTemperature, "colorTemperature", kelvin)
    }

    pub fn hue(value: f64) -> Self {
        Self::main(Capability::ColorControl, "hue", value)
    }

    pub fn saturation(value: f64) -> Self {
        Self::main(Capability::ColorControl, "saturation", value)
    }

    #[cfg(test)]
    pub fn value_as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }
}
