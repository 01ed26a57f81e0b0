//! Optional publication sink for fetched data.
//!
//! Callers who want shared visibility of the latest session, device list, or
//! provisioning settings (a UI model, a global registry) implement
//! `PublishSink` and attach it to the [`crate::Provisioner`]. Without a sink,
//! publications are skipped silently.

use crate::models::{Device, ProvisioningSettings, Session};

/// Receives the latest successfully fetched values.
///
/// All methods default to no-ops; implementations override only what they
/// care about. Background cache refreshes publish here too, so a sink may
/// observe a fresher value than the one an earlier call returned.
pub trait PublishSink: Send + Sync {
    fn session(&self, session: &Session) {
        let _ = session;
    }

    fn devices(&self, devices: &[Device]) {
        let _ = devices;
    }

    fn provisioning(&self, settings: &ProvisioningSettings) {
        let _ = settings;
    }
}
