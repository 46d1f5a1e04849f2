use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized outcome of one execution, success or failure.
///
/// `status` is 0 when the request never reached the server (transport error
/// or timeout); in that case `error` holds a short diagnostic. Non-2xx HTTP
/// responses are not errors at this layer: the caller classifies them by
/// status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub status: u16,
    pub status_text: String,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    pub duration_ms: u64,
    #[serde(default)]
    pub error: Option<String>,
}

impl TestResponse {
    /// A response for a request that failed before or during transport.
    pub fn transport_error(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            status: 0,
            status_text: "Network Error".to_string(),
            body: Value::Null,
            headers: IndexMap::new(),
            duration_ms,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}
