//! Device listing tests.
//!
//! GetDevices is best-effort: every failure class resolves `Unavailable`,
//! never an error. With caching enabled, a valid cached entry wins the
//! caller-visible result and the network fetch refreshes the cache in the
//! background.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use serde_json::json;
use siperb_provisioning::{CachePolicy, CacheStore, Device, DeviceQuery, Fetched, MemoryStore};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query(cache: CachePolicy) -> DeviceQuery {
    DeviceQuery {
        user_id: "u1".to_string(),
        session_token: "tok1".to_string(),
        cache,
    }
}

fn device(value: serde_json::Value) -> Device {
    serde_json::from_value(value).unwrap()
}

async fn mount_devices(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/Users/u1/Devices/"))
        .and(header("X-Api-Key", "tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn filters_to_script_platform() {
    let server = MockServer::start().await;
    mount_devices(
        &server,
        json!([
            {"Platform": "script", "Id": "d1"},
            {"Platform": "app", "Id": "d2"}
        ]),
    )
    .await;

    let result = provisioner_for(&server)
        .get_devices(query(CachePolicy::Disabled))
        .await;

    assert_eq!(
        result,
        Fetched::Found(vec![device(json!({"Platform": "script", "Id": "d1"}))])
    );
}

#[tokio::test]
async fn no_matching_devices_is_empty_not_unavailable() {
    let server = MockServer::start().await;
    mount_devices(&server, json!([{"Platform": "app", "Id": "d2"}])).await;

    let result = provisioner_for(&server)
        .get_devices(query(CachePolicy::Disabled))
        .await;

    assert_eq!(result, Fetched::Found(vec![]));
}

#[tokio::test]
async fn server_error_resolves_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/u1/Devices/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = provisioner_for(&server)
        .get_devices(query(CachePolicy::Disabled))
        .await;
    assert!(result.is_unavailable());
}

#[tokio::test]
async fn malformed_body_resolves_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/u1/Devices/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = provisioner_for(&server)
        .get_devices(query(CachePolicy::Disabled))
        .await;
    assert!(result.is_unavailable());
}

#[tokio::test]
async fn connection_refused_resolves_unavailable() {
    let provisioner = siperb_provisioning::Provisioner::new(unreachable_client());
    let result = provisioner.get_devices(query(CachePolicy::Disabled)).await;
    assert!(result.is_unavailable());
}

#[tokio::test]
async fn network_result_populates_cache() {
    let server = MockServer::start().await;
    mount_devices(&server, json!([{"Platform": "script", "Id": "d1"}])).await;

    let store = Arc::new(MemoryStore::new());
    let provisioner = provisioner_for(&server).with_store(store.clone());

    let result = provisioner
        .get_devices(query(CachePolicy::keyed("SiperbSession")))
        .await;
    assert!(matches!(result, Fetched::Found(ref devices) if devices.len() == 1));

    let blob = store.get("SiperbSession").unwrap().expect("cache populated");
    let cached: Vec<Device> = serde_json::from_str(&blob).unwrap();
    assert_eq!(cached, vec![device(json!({"Platform": "script", "Id": "d1"}))]);
}

#[tokio::test]
async fn caching_without_key_skips_cache_and_fetches() {
    let server = MockServer::start().await;
    mount_devices(&server, json!([{"Platform": "script", "Id": "d1"}])).await;

    let store = Arc::new(MemoryStore::new());
    let provisioner = provisioner_for(&server).with_store(store.clone());

    let result = provisioner.get_devices(query(CachePolicy::keyed(""))).await;
    assert!(matches!(result, Fetched::Found(_)));
    assert!(store.get("").unwrap().is_none());
}

#[tokio::test]
async fn cached_value_resolves_before_slow_network_settles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/u1/Devices/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"Platform": "script", "Id": "fresh"}]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .set("SiperbSession", r#"[{"Platform":"script","Id":"cached"}]"#)
        .unwrap();

    let provisioner = provisioner_for(&server).with_store(store.clone());

    // must resolve from cache well before the 2s mock settles
    let result = tokio::time::timeout(
        Duration::from_millis(500),
        provisioner.get_devices(query(CachePolicy::keyed("SiperbSession"))),
    )
    .await
    .expect("cached result should not wait for the network");

    assert_eq!(
        result,
        Fetched::Found(vec![device(json!({"Platform": "script", "Id": "cached"}))])
    );

    // the detached fetch still refreshes the cache afterward
    wait_for_cache_update(&store, "SiperbSession", "fresh").await;
}

#[tokio::test]
async fn corrupt_cache_entry_falls_through_to_network() {
    let server = MockServer::start().await;
    mount_devices(&server, json!([{"Platform": "script", "Id": "d1"}])).await;

    let store = Arc::new(MemoryStore::new());
    store.set("SiperbSession", "{{ corrupt").unwrap();

    let provisioner = provisioner_for(&server).with_store(store.clone());
    let result = provisioner
        .get_devices(query(CachePolicy::keyed("SiperbSession")))
        .await;

    assert_eq!(
        result,
        Fetched::Found(vec![device(json!({"Platform": "script", "Id": "d1"}))])
    );
    // network path rewrites the corrupt entry before resolving
    let blob = store.get("SiperbSession").unwrap().unwrap();
    assert!(blob.contains("d1"));
}

#[tokio::test]
async fn repeated_calls_with_unchanged_backend_are_idempotent() {
    let server = MockServer::start().await;
    mount_devices(&server, json!([{"Platform": "script", "Id": "d1"}])).await;

    let store = Arc::new(MemoryStore::new());
    let provisioner = provisioner_for(&server).with_store(store.clone());
    let cache = CachePolicy::keyed("SiperbSession");

    let first = provisioner.get_devices(query(cache.clone())).await;
    let second = provisioner.get_devices(query(cache)).await;

    assert_eq!(first, second);
    let blob = store.get("SiperbSession").unwrap().unwrap();
    let cached: Vec<Device> = serde_json::from_str(&blob).unwrap();
    assert_eq!(Fetched::Found(cached), first);
}

#[tokio::test]
async fn fetched_devices_are_published_to_sink() {
    let server = MockServer::start().await;
    mount_devices(&server, json!([{"Platform": "script", "Id": "d1"}])).await;

    let sink = Arc::new(RecordingSink::default());
    let provisioner = provisioner_for(&server).with_sink(sink.clone());

    provisioner.get_devices(query(CachePolicy::Disabled)).await;

    let published = sink.device_lists.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].len(), 1);
}
