/// A light as it is known to the hub, bound to a LIFX light through `external_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDevice {
    pub device_id: String,
    pub external_id: String,
    pub label: String,
}
