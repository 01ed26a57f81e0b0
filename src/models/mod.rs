//! Data models for Siperb API payloads.
//!
//! - `Session`: token + user id returned by the login exchange
//! - `Device`: registered device records, filtered to the `"script"` platform
//! - `ProvisioningSettings`: SIP connection settings for one device

pub mod device;
pub mod provisioning;
pub mod session;

pub use device::{Device, PLATFORM_SCRIPT};
pub use provisioning::ProvisioningSettings;
pub use session::Session;
