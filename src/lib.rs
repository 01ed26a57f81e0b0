//! Client library for the Siperb provisioning API.
//!
//! Bootstraps a SIP softphone's telephony configuration in three steps:
//! exchange a Personal Access Token for a session ([`Provisioner::login`]),
//! list the user's script-platform devices ([`Provisioner::get_devices`]),
//! and fetch one device's SIP settings ([`Provisioner::get_provisioning`]).
//! Device and provisioning fetches can read through an optional local cache.
//!
//! SIP signaling itself is out of scope: the resulting
//! [`ProvisioningSettings`] are handed to an external SIP stack.
//!
//! ```no_run
//! use std::sync::Arc;
//! use siperb_provisioning::{ApiClient, CachePolicy, DeviceQuery, FileStore, Provisioner};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = Arc::new(FileStore::new("/tmp/siperb-cache".into())?);
//! let provisioner = Provisioner::new(ApiClient::new()?).with_store(store);
//!
//! let session = provisioner.login("my-access-token").await?;
//! let devices = provisioner
//!     .get_devices(DeviceQuery {
//!         user_id: session.user_id.clone(),
//!         session_token: session.session_token.clone(),
//!         cache: CachePolicy::keyed("SiperbSession"),
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod provisioner;
pub mod sink;

pub use api::{ApiClient, ApiError, DEFAULT_BASE_URL};
pub use cache::{CacheStore, FileStore, MemoryStore};
pub use config::Config;
pub use models::{Device, ProvisioningSettings, Session, PLATFORM_SCRIPT};
pub use provisioner::{CachePolicy, DeviceQuery, Fetched, Provisioner, ProvisioningQuery};
pub use sink::PublishSink;
