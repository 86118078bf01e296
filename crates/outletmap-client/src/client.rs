//! HTTP client for the outlet map backend.
//!
//! Two endpoints: `GET /outlets` returns every stored outlet, and
//! `POST /chatbot` answers a free-text query with an HTML (or plain text)
//! reply. Requests are not retried; callers surface failures to the user.

use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};

use outletmap_core::app_config::BaseUrl;
use outletmap_core::Outlet;

use crate::error::ClientError;
use crate::types::{BackendErrorBody, ChatbotReply, ChatbotRequest};

/// Client for the outlet map backend API.
///
/// Use [`OutletApiClient::new`] with a configured [`BaseUrl`], or
/// [`OutletApiClient::with_base_url`] to point at a mock server in tests.
pub struct OutletApiClient {
    client: Client,
    base_url: BaseUrl,
}

impl OutletApiClient {
    /// Creates a client with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: BaseUrl,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates a client from a raw base URL string (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an
    /// http(s) origin, or [`ClientError::Http`] if the `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let parsed = BaseUrl::parse(base_url).map_err(|reason| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        })?;
        Self::new(parsed, timeout_secs, user_agent)
    }

    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Fetches every outlet from `GET /outlets`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] on HTTP 404 (the backend has no outlets).
    /// - [`ClientError::Backend`] on a non-2xx status with a JSON error message.
    /// - [`ClientError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ClientError::Http`] on network or TLS failure.
    /// - [`ClientError::Deserialize`] when the body is not a JSON array of outlets.
    pub async fn fetch_outlets(&self) -> Result<Vec<Outlet>, ClientError> {
        let url = self.endpoint("outlets")?;
        tracing::debug!(url = %url, "fetching outlets");

        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let body = Self::success_body(response, url.as_str()).await?;

        let outlets: Vec<Outlet> =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("outlet list from {url}"),
                source: e,
            })?;
        tracing::debug!(count = outlets.len(), "outlets fetched");
        Ok(outlets)
    }

    /// Sends `query` to `POST /chatbot` and returns the reply text.
    ///
    /// The reply is returned as sent; it may contain HTML.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Backend`] on a non-2xx status with a JSON error message
    ///   (the chatbot handler answers 500 with `{"error", "message"}`).
    /// - [`ClientError::NotFound`] / [`ClientError::UnexpectedStatus`] on other
    ///   non-2xx statuses.
    /// - [`ClientError::Http`] on network or TLS failure.
    /// - [`ClientError::Deserialize`] when the body is not `{"response": "..."}`.
    pub async fn send_chat(&self, query: &str) -> Result<String, ClientError> {
        let url = self.endpoint("chatbot")?;
        tracing::debug!(url = %url, query_len = query.len(), "sending chat query");

        let response = self
            .client
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&ChatbotRequest {
                query: query.to_owned(),
            })
            .send()
            .await?;
        let body = Self::success_body(response, url.as_str()).await?;

        let reply: ChatbotReply =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("chatbot reply from {url}"),
                source: e,
            })?;
        Ok(reply.response)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Returns the body of a 2xx response, or maps the status (and any JSON
    /// error message in the body) to a typed error.
    async fn success_body(response: reqwest::Response, url: &str) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<BackendErrorBody>(&body)
            .ok()
            .and_then(BackendErrorBody::into_message);
        tracing::warn!(
            url,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "backend returned an error status"
        );

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_owned(),
            });
        }
        match message {
            Some(message) => Err(ClientError::Backend {
                status: status.as_u16(),
                message,
            }),
            None => Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            }),
        }
    }
}
