//! Local caching module.
//!
//! Caching is a pure side-channel: device lists and provisioning settings are
//! stored as whole JSON blobs under caller-chosen keys, with no TTL. A stale
//! entry is only ever replaced by a fresher network result, never expired.
//!
//! `FileStore` persists entries on disk; `MemoryStore` is the equivalent for
//! tests and hosts without persistent storage. Custom backends implement
//! `CacheStore`.

pub mod store;

pub(crate) use store::{load_json, store_json};
pub use store::{CacheStore, FileStore, MemoryStore};
