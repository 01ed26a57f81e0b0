//! Shared helpers for the wiremock-backed integration tests.

use std::sync::Mutex;
use std::time::Duration;

use siperb_provisioning::{
    ApiClient, CacheStore, Device, MemoryStore, Provisioner, ProvisioningSettings, PublishSink,
    Session,
};
use wiremock::MockServer;

#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_base_url(server.uri()).expect("client should build")
}

#[allow(dead_code)]
pub fn provisioner_for(server: &MockServer) -> Provisioner {
    Provisioner::new(client_for(server))
}

/// A base URL nothing listens on, for connection-refused scenarios.
#[allow(dead_code)]
pub fn unreachable_client() -> ApiClient {
    ApiClient::with_base_url("http://127.0.0.1:9").expect("client should build")
}

/// Poll the store until the entry under `key` contains `needle`, panicking
/// after ten seconds. Used to observe detached background cache refreshes.
#[allow(dead_code)]
pub async fn wait_for_cache_update(store: &MemoryStore, key: &str, needle: &str) {
    for _ in 0..200 {
        if let Ok(Some(blob)) = store.get(key) {
            if blob.contains(needle) {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("cache entry {key:?} never contained {needle:?}");
}

/// Sink that records everything published to it.
#[derive(Default)]
pub struct RecordingSink {
    pub sessions: Mutex<Vec<Session>>,
    pub device_lists: Mutex<Vec<Vec<Device>>>,
    pub settings: Mutex<Vec<ProvisioningSettings>>,
}

impl PublishSink for RecordingSink {
    fn session(&self, session: &Session) {
        self.sessions.lock().unwrap().push(session.clone());
    }

    fn devices(&self, devices: &[Device]) {
        self.device_lists.lock().unwrap().push(devices.to_vec());
    }

    fn provisioning(&self, settings: &ProvisioningSettings) {
        self.settings.lock().unwrap().push(settings.clone());
    }
}
