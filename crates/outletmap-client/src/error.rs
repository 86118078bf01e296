use thiserror::Error;

/// Errors returned by the outlet map backend client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered 404. `/outlets` does this when the backend has
    /// no outlets stored.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// The backend reported a failure in its JSON error body.
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Any other non-2xx status without a usable error body.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
