//! Drives a [`Session`] with the backend client.
//!
//! Every network outcome becomes a session transition. Failures are logged
//! and recorded on the session, never propagated.

use outletmap_client::OutletApiClient;
use outletmap_core::{sanitize_html, AppConfig, PendingQuery, Session};

pub(crate) struct Controller {
    client: OutletApiClient,
    session: Session,
    trust_bot_html: bool,
}

/// Result of resolving one chat query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyOutcome {
    Replied,
    Failed,
}

impl Controller {
    pub(crate) fn new(client: OutletApiClient, config: &AppConfig) -> Self {
        Self {
            client,
            session: Session::new(config.coverage_radius_m),
            trust_bot_html: config.trust_bot_html,
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Fetches outlets into the session. Returns `false` when the fetch failed.
    pub(crate) async fn load_outlets(&mut self) -> bool {
        match self.client.fetch_outlets().await {
            Ok(outlets) => {
                self.session.outlets_loaded(outlets);
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    base_url = %self.client.base_url(),
                    "error fetching outlets"
                );
                self.session.outlets_failed();
                false
            }
        }
    }

    /// Puts `query` in the draft and submits it. `None` when the session
    /// declines (blank query, or a reply is still pending).
    pub(crate) fn submit(&mut self, query: &str) -> Option<PendingQuery> {
        self.session.set_query(query);
        self.session.submit()
    }

    /// Sends a submitted query and records the reply or the failure.
    pub(crate) async fn resolve(&mut self, pending: PendingQuery) -> ReplyOutcome {
        match self.client.send_chat(pending.query()).await {
            Ok(reply) => {
                let reply = if self.trust_bot_html {
                    reply
                } else {
                    sanitize_html(&reply)
                };
                self.session.reply_received(pending, reply);
                ReplyOutcome::Replied
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching chatbot response");
                self.session.reply_failed(pending, e.to_string());
                ReplyOutcome::Failed
            }
        }
    }

    /// Submits and resolves `query` in one step. `None` when nothing was sent.
    pub(crate) async fn ask(&mut self, query: &str) -> Option<ReplyOutcome> {
        let pending = self.submit(query)?;
        Some(self.resolve(pending).await)
    }
}
