//! High-level provisioning operations.
//!
//! `Provisioner` ties the API client, the optional cache store, and the
//! optional publish sink together. `login` is strict; `get_devices` and
//! `get_provisioning` are best-effort: they never fail, they resolve
//! [`Fetched::Unavailable`] when no value could be produced.
//!
//! With caching enabled, a valid cached entry resolves the call immediately
//! and the network fetch is detached to refresh the cache in the background.
//! The caller is not notified when the refreshed value lands; it will be
//! served on the next call.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::cache::{self, CacheStore};
use crate::models::{Device, ProvisioningSettings, Session};
use crate::sink::PublishSink;

/// Outcome of a best-effort fetch.
///
/// `Unavailable` covers every failure class: transport errors, non-2xx
/// responses, unparseable bodies, and platform mismatches. Callers must
/// handle it as "no data", not as an exception.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Found(T),
    Unavailable,
}

impl<T> Fetched<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Unavailable => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Fetched::Unavailable)
    }
}

/// Whether a fetch reads from and refreshes the local cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CachePolicy {
    #[default]
    Disabled,
    Enabled {
        key: String,
    },
}

impl CachePolicy {
    /// Enable caching under the given key.
    pub fn keyed(key: impl Into<String>) -> Self {
        CachePolicy::Enabled { key: key.into() }
    }

    /// The cache key if caching is usable. Enabled with an empty key is a
    /// caller mistake: warn and run the fetch uncached.
    fn validated_key(&self) -> Option<&str> {
        match self {
            CachePolicy::Disabled => None,
            CachePolicy::Enabled { key } if key.is_empty() => {
                warn!("Caching enabled but no cache key provided, skipping cache");
                None
            }
            CachePolicy::Enabled { key } => Some(key),
        }
    }
}

/// Parameters for [`Provisioner::get_devices`].
#[derive(Debug, Clone)]
pub struct DeviceQuery {
    pub user_id: String,
    pub session_token: String,
    pub cache: CachePolicy,
}

/// Parameters for [`Provisioner::get_provisioning`].
#[derive(Debug, Clone)]
pub struct ProvisioningQuery {
    pub user_id: String,
    pub device_token: String,
    pub session_token: String,
    pub cache: CachePolicy,
}

/// Entry point for callers bootstrapping a SIP softphone: login once, list
/// devices, fetch the chosen device's settings, hand them to the SIP stack.
pub struct Provisioner {
    api: ApiClient,
    store: Option<Arc<dyn CacheStore>>,
    sink: Option<Arc<dyn PublishSink>>,
}

impl Provisioner {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            store: None,
            sink: None,
        }
    }

    /// Attach a cache store. Without one, `CachePolicy::Enabled` degrades to
    /// a plain network fetch.
    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach a publish sink receiving the latest fetched values.
    pub fn with_sink(mut self, sink: Arc<dyn PublishSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Exchange a Personal Access Token for a session.
    ///
    /// Strict: any transport, status, or parse failure is returned as an
    /// error. The session is never written to the cache store.
    pub async fn login(&self, access_token: &str) -> Result<Session> {
        let session = self.api.login(access_token).await?;
        if let Some(sink) = &self.sink {
            sink.session(&session);
        }
        Ok(session)
    }

    /// Fetch the user's script-platform devices.
    ///
    /// A valid cache entry resolves immediately; the network fetch then runs
    /// detached and refreshes the cache. Without a usable cache entry the
    /// network result is returned directly, or `Unavailable` on any failure.
    pub async fn get_devices(&self, query: DeviceQuery) -> Fetched<Vec<Device>> {
        let cache_key = query.cache.validated_key().map(str::to_string);

        if let Some(key) = cache_key.as_deref() {
            if let Some(store) = &self.store {
                if let Some(devices) = cache::load_json::<Vec<Device>>(store.as_ref(), key) {
                    debug!(key, "Using cached device list");
                    if let Some(sink) = &self.sink {
                        sink.devices(&devices);
                    }

                    let api = self.api.clone();
                    let store = self.store.clone();
                    let sink = self.sink.clone();
                    tokio::spawn(async move {
                        refresh_devices(&api, store.as_deref(), sink.as_deref(), &query, cache_key.as_deref()).await;
                    });
                    return Fetched::Found(devices);
                }
            }
        }

        match refresh_devices(
            &self.api,
            self.store.as_deref(),
            self.sink.as_deref(),
            &query,
            cache_key.as_deref(),
        )
        .await
        {
            Some(devices) => Fetched::Found(devices),
            None => Fetched::Unavailable,
        }
    }

    /// Fetch SIP provisioning settings for one device.
    ///
    /// Same cache-then-network policy as [`Self::get_devices`]. A device
    /// whose platform is not `"script"` resolves `Unavailable` without an
    /// error and without touching the cache.
    pub async fn get_provisioning(&self, query: ProvisioningQuery) -> Fetched<ProvisioningSettings> {
        let cache_key = query.cache.validated_key().map(str::to_string);

        if let Some(key) = cache_key.as_deref() {
            if let Some(store) = &self.store {
                if let Some(settings) = cache::load_json::<ProvisioningSettings>(store.as_ref(), key)
                {
                    debug!(key, "Using cached provisioning settings");
                    if let Some(sink) = &self.sink {
                        sink.provisioning(&settings);
                    }

                    let api = self.api.clone();
                    let store = self.store.clone();
                    let sink = self.sink.clone();
                    tokio::spawn(async move {
                        refresh_provisioning(&api, store.as_deref(), sink.as_deref(), &query, cache_key.as_deref()).await;
                    });
                    return Fetched::Found(settings);
                }
            }
        }

        match refresh_provisioning(
            &self.api,
            self.store.as_deref(),
            self.sink.as_deref(),
            &query,
            cache_key.as_deref(),
        )
        .await
        {
            Some(settings) => Fetched::Found(settings),
            None => Fetched::Unavailable,
        }
    }
}

/// Network half of a device fetch: fetch, persist to cache, publish.
/// Failures are logged and mapped to `None`.
async fn refresh_devices(
    api: &ApiClient,
    store: Option<&dyn CacheStore>,
    sink: Option<&dyn PublishSink>,
    query: &DeviceQuery,
    cache_key: Option<&str>,
) -> Option<Vec<Device>> {
    match api.fetch_devices(&query.user_id, &query.session_token).await {
        Ok(devices) => {
            if let (Some(store), Some(key)) = (store, cache_key) {
                cache::store_json(store, key, &devices);
                debug!(key, "Updated device cache");
            }
            if let Some(sink) = sink {
                sink.devices(&devices);
            }
            Some(devices)
        }
        Err(e) => {
            warn!(error = %e, "Device list fetch failed");
            None
        }
    }
}

/// Network half of a provisioning fetch. A platform mismatch yields `None`
/// like a failure does, but nothing is cached or published for it.
async fn refresh_provisioning(
    api: &ApiClient,
    store: Option<&dyn CacheStore>,
    sink: Option<&dyn PublishSink>,
    query: &ProvisioningQuery,
    cache_key: Option<&str>,
) -> Option<ProvisioningSettings> {
    match api
        .fetch_provisioning(&query.user_id, &query.device_token, &query.session_token)
        .await
    {
        Ok(Some(settings)) => {
            if let (Some(store), Some(key)) = (store, cache_key) {
                cache::store_json(store, key, &settings);
                debug!(key, "Updated provisioning cache");
            }
            if let Some(sink) = sink {
                sink.provisioning(&settings);
            }
            Some(settings)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Provisioning fetch failed");
            None
        }
    }
}
