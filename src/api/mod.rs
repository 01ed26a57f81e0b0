//! REST API client module for the Siperb provisioning service.
//!
//! This module provides the `ApiClient` for exchanging an access token for a
//! session and fetching device and provisioning data.
//!
//! The login endpoint uses bearer token authentication; device and
//! provisioning endpoints authenticate with the session token in an
//! `X-Api-Key` header.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
