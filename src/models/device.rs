use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Platform tag for headless/API-driven devices. Device listings and
/// provisioning lookups are filtered to this platform; other client types
/// (apps, browsers) are ignored by this library.
pub const PLATFORM_SCRIPT: &str = "script";

/// A registered device as returned by `GET /Users/{UserId}/Devices/`.
///
/// The record is treated as opaque apart from `Platform`; the remaining
/// fields (`Id`, `DeviceToken`, names, timestamps, ...) are kept verbatim in
/// `extra` so they survive caching round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "Platform", default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Whether this device carries the `"script"` platform tag.
    pub fn is_script(&self) -> bool {
        self.platform.as_deref() == Some(PLATFORM_SCRIPT)
    }

    /// The device token, if the server included one. Needed to request
    /// provisioning settings for this device.
    pub fn device_token(&self) -> Option<&str> {
        self.extra.get("DeviceToken").and_then(Value::as_str)
    }
}
