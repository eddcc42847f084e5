use serde::Deserialize;
use std::collections::HashMap;

pub const LIFX_LOCATION_ID: &str = "lifxLocationId";
pub const LIFX_ACCESS_TOKEN: &str = "lifxAccessToken";

/// The settings a user entered on the configuration pages, keyed by setting id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct InstalledAppConfig(HashMap<String, Vec<ConfigEntry>>);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub string_config: Option<StringConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StringConfig {
    pub value: String,
}

impl InstalledAppConfig {
    /// Returns the first string value of a setting, ignoring empty values.
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)?
            .first()?
            .string_config
            .as_ref()
            .map(|config| config.value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn lifx_location_id(&self) -> Option<&str> {
        self.string_value(LIFX_LOCATION_ID)
    }

    #[cfg(test)]
    pub fn with_string(mut self, key: &str, value: &str) -> Self {
        self.0.insert(
            key.to_string(),
            vec![ConfigEntry {
                string_config: Some(StringConfig { value: value.to_string() }),
            }],
        );
        self
    }
}
