//! Wire types for the chatbot endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /chatbot`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatbotRequest {
    pub query: String,
}

/// Successful `/chatbot` response. `response` may contain HTML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatbotReply {
    pub response: String,
}

/// Error body the backend sends with non-2xx statuses.
///
/// The chatbot handler answers `{"error": ..., "message": ...}`; framework
/// validation errors answer `{"detail": ...}` where `detail` may be a string
/// or a list of objects.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BackendErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl BackendErrorBody {
    /// The most specific human-readable message in the body, if any.
    pub(crate) fn into_message(self) -> Option<String> {
        if let Some(message) = self.message.filter(|m| !m.trim().is_empty()) {
            return Some(message);
        }
        match self.detail {
            Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => {
                return Some(detail);
            }
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .map(str::to_owned)
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
        self.error.filter(|e| !e.trim().is_empty())
    }
}
