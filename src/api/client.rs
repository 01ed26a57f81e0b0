//! API client for communicating with the Siperb provisioning REST API.
//!
//! This module provides the `ApiClient` struct for exchanging a Personal
//! Access Token for a session, listing a user's devices, and fetching a
//! device's SIP provisioning settings.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use crate::models::{Device, ProvisioningSettings, Session, PLATFORM_SCRIPT};

use super::ApiError;

/// Base URL for the Siperb provisioning API.
pub const DEFAULT_BASE_URL: &str = "https://api.siperb.com";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header carrying the session token on device and provisioning requests.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Device detail envelope returned by the per-device endpoint. The SIP
/// settings live under `Settings_json` and are only meaningful for
/// script-platform devices.
#[derive(Debug, Deserialize)]
struct DeviceDetail {
    #[serde(rename = "Platform")]
    platform: Option<String>,
    #[serde(rename = "Settings_json")]
    settings: Option<ProvisioningSettings>,
}

/// API client for the Siperb provisioning service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the production API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (staging, mock servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// Exchange a Personal Access Token for a session.
    ///
    /// This is the one strict operation: transport failures, non-2xx
    /// responses, and unparseable bodies all surface as errors. Exactly one
    /// attempt is made.
    pub async fn login(&self, access_token: &str) -> Result<Session> {
        let url = format!("{}/Login", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;

        let session: Session = response
            .json()
            .await
            .context("Failed to parse login response")?;

        debug!(user_id = %session.user_id, "Session retrieved");
        Ok(session)
    }

    /// Fetch the user's registered devices, filtered to the `"script"`
    /// platform. A user with no script devices yields an empty list.
    pub async fn fetch_devices(&self, user_id: &str, session_token: &str) -> Result<Vec<Device>> {
        let url = format!("{}/Users/{}/Devices/", self.base_url, user_id);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, session_token)
            .send()
            .await
            .context("Failed to send device list request")?;

        let response = Self::check_response(response).await?;

        let devices: Vec<Device> = response
            .json()
            .await
            .context("Failed to parse device list response")?;

        let devices: Vec<Device> = devices.into_iter().filter(Device::is_script).collect();
        debug!(count = devices.len(), "Fetched script devices");
        Ok(devices)
    }

    /// Fetch SIP provisioning settings for one device.
    ///
    /// Returns `Ok(None)` when the device exists but is not a script-platform
    /// device; that is not an error. An absent `Settings_json` field on a
    /// script device yields the empty settings object.
    pub async fn fetch_provisioning(
        &self,
        user_id: &str,
        device_token: &str,
        session_token: &str,
    ) -> Result<Option<ProvisioningSettings>> {
        let url = format!(
            "{}/Users/{}/Devices/{}/?password=yes&settings_json=yes",
            self.base_url, user_id, device_token
        );

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, session_token)
            .send()
            .await
            .context("Failed to send provisioning request")?;

        let response = Self::check_response(response).await?;

        let detail: DeviceDetail = response
            .json()
            .await
            .context("Failed to parse provisioning response")?;

        if detail.platform.as_deref() == Some(PLATFORM_SCRIPT) {
            debug!(device_token, "Fetched provisioning settings");
            Ok(Some(detail.settings.unwrap_or_default()))
        } else {
            debug!(device_token, platform = ?detail.platform, "Device is not script-platform");
            Ok(None)
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}
