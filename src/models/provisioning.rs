use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default WebSocket port when the provisioning payload omits one.
const DEFAULT_WSS_PORT: u16 = 443;

/// Default WebSocket server path when the provisioning payload omits one.
const DEFAULT_WSS_PATH: &str = "/ws/";

/// SIP connection settings extracted from a device's `Settings_json` payload.
///
/// All fields are optional: the payload is controlled server-side and may
/// grow or shrink. Unknown fields are retained in `extra`. An absent
/// `Settings_json` on a script-platform device yields
/// `ProvisioningSettings::default()` (the empty object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningSettings {
    #[serde(rename = "SipUsername", default, skip_serializing_if = "Option::is_none")]
    pub sip_username: Option<String>,
    #[serde(rename = "SipPassword", default, skip_serializing_if = "Option::is_none")]
    pub sip_password: Option<String>,
    #[serde(rename = "SipDomain", default, skip_serializing_if = "Option::is_none")]
    pub sip_domain: Option<String>,
    #[serde(rename = "SipWssServer", default, skip_serializing_if = "Option::is_none")]
    pub sip_wss_server: Option<String>,
    #[serde(rename = "SipWebsocketPort", default, skip_serializing_if = "Option::is_none")]
    pub sip_websocket_port: Option<u16>,
    #[serde(rename = "SipServerPath", default, skip_serializing_if = "Option::is_none")]
    pub sip_server_path: Option<String>,
    #[serde(rename = "ContactUserName", default, skip_serializing_if = "Option::is_none")]
    pub contact_username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProvisioningSettings {
    /// WebSocket transport URL for the SIP stack, e.g.
    /// `wss://edge.example.com:443/ws/`. Port and path fall back to the
    /// service defaults. `None` when no server is provisioned.
    pub fn websocket_url(&self) -> Option<String> {
        let server = self.sip_wss_server.as_deref()?;
        let port = self.sip_websocket_port.unwrap_or(DEFAULT_WSS_PORT);
        let path = self.sip_server_path.as_deref().unwrap_or(DEFAULT_WSS_PATH);
        Some(format!("wss://{}:{}{}", server, port, path))
    }

    /// Registration URI, e.g. `sip:alice@example.com`.
    pub fn sip_uri(&self) -> Option<String> {
        let user = self.sip_username.as_deref()?;
        let domain = self.sip_domain.as_deref()?;
        Some(format!("sip:{}@{}", user, domain))
    }

    /// Contact URI, e.g. `sip:alice-desk@example.com`.
    pub fn contact_uri(&self) -> Option<String> {
        let contact = self.contact_username.as_deref()?;
        let domain = self.sip_domain.as_deref()?;
        Some(format!("sip:{}@{}", contact, domain))
    }
}
