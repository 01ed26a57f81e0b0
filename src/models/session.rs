use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A short-lived session obtained by exchanging a Personal Access Token
/// through [`crate::api::ApiClient::login`].
///
/// The API returns more than the two fields we care about; everything else is
/// retained in `extra` so callers receive the full response body.
///
/// There is no expiry tracking: the client never refreshes or invalidates
/// sessions on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "SessionToken")]
    pub session_token: String,
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
