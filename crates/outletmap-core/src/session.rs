//! Front-end session state and its transitions.
//!
//! A [`Session`] owns everything the outlet map UI shows: the fetched outlets
//! with their highlight flags, the chat transcript, the draft query, and the
//! loading and error indicators. The controller changes it only through the
//! methods below, one event at a time.

use crate::chat::{ChatMessage, Transcript};
use crate::map_view::{build_map_view_with_flags, MapView};
use crate::outlet::Outlet;
use crate::overlap::highlighted_flags;

/// User-facing message when the outlet list cannot be fetched.
pub const OUTLETS_LOAD_ERROR: &str = "Failed to load outlets.";

const TYPING_INDICATOR: &str = "Typing...";
const SEND_LABEL: &str = "Send";
const SEND_LABEL_BUSY: &str = "Searching...";

/// A chat query that has been accepted by [`Session::submit`] and awaits a reply.
///
/// Only [`Session::submit`] creates one, so a reply can only be recorded for a
/// query the session actually sent.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the pending query must be resolved with reply_received or reply_failed"]
pub struct PendingQuery {
    query: String,
}

impl PendingQuery {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    radius_m: f64,
    outlets: Vec<Outlet>,
    highlighted: Vec<bool>,
    transcript: Transcript,
    draft: String,
    loading: bool,
    error: Option<String>,
}

impl Session {
    /// Creates an empty session that highlights outlets within `radius_m` of another.
    #[must_use]
    pub fn new(radius_m: f64) -> Self {
        Self {
            radius_m,
            outlets: Vec::new(),
            highlighted: Vec::new(),
            transcript: Transcript::new(),
            draft: String::new(),
            loading: false,
            error: None,
        }
    }

    /// Replaces the outlet list wholesale and recomputes highlights.
    pub fn outlets_loaded(&mut self, outlets: Vec<Outlet>) {
        self.highlighted = highlighted_flags(&outlets, self.radius_m);
        self.outlets = outlets;
        tracing::info!(
            outlets = self.outlets.len(),
            highlighted = self.highlighted.iter().filter(|h| **h).count(),
            "outlets loaded"
        );
    }

    /// Records a failed outlet fetch: the list is emptied and the generic
    /// load error is shown.
    pub fn outlets_failed(&mut self) {
        self.outlets.clear();
        self.highlighted.clear();
        self.error = Some(OUTLETS_LOAD_ERROR.to_string());
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Sends the draft query.
    ///
    /// Returns `None` without changing anything when the draft is blank or a
    /// reply is still outstanding. Otherwise the user message is appended, the
    /// draft and error are cleared, and the session enters the loading state.
    pub fn submit(&mut self) -> Option<PendingQuery> {
        if self.loading || self.draft.trim().is_empty() {
            return None;
        }
        let query = std::mem::take(&mut self.draft);
        self.transcript.push(ChatMessage::user(query.clone()));
        self.error = None;
        self.loading = true;
        Some(PendingQuery { query })
    }

    /// Appends the bot's reply for `pending` and leaves the loading state.
    pub fn reply_received(&mut self, pending: PendingQuery, text: impl Into<String>) {
        let PendingQuery { query } = pending;
        let text = text.into();
        tracing::debug!(query = %query, reply_len = text.len(), "chat reply received");
        self.transcript.push(ChatMessage::bot(text));
        self.loading = false;
    }

    /// Records a failed chat request. The transcript keeps only the user's
    /// message; the error text is shown instead of a bot bubble.
    pub fn reply_failed(&mut self, pending: PendingQuery, message: impl Into<String>) {
        let PendingQuery { query } = pending;
        let message = message.into();
        tracing::warn!(query = %query, error = %message, "chat request failed");
        self.error = Some(message);
        self.loading = false;
    }

    #[must_use]
    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    /// Outlets paired with their highlight flag, in fetch order.
    pub fn outlets_with_highlight(&self) -> impl Iterator<Item = (&Outlet, bool)> {
        self.outlets.iter().zip(self.highlighted.iter().copied())
    }

    #[must_use]
    pub fn map_view(&self) -> MapView {
        build_map_view_with_flags(&self.outlets, &self.highlighted)
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Indicator shown under the transcript while a reply is pending.
    #[must_use]
    pub fn typing_indicator(&self) -> Option<&'static str> {
        self.loading.then_some(TYPING_INDICATOR)
    }

    #[must_use]
    pub fn send_label(&self) -> &'static str {
        if self.loading {
            SEND_LABEL_BUSY
        } else {
            SEND_LABEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;
    use crate::geo::COVERAGE_RADIUS_M;

    fn outlet(name: &str, lat: f64, lon: f64) -> Outlet {
        Outlet {
            name: name.to_string(),
            address: String::new(),
            latitude: Some(lat),
            longitude: Some(lon),
            operating_hours: None,
            waze_link: None,
        }
    }

    fn session() -> Session {
        Session::new(COVERAGE_RADIUS_M)
    }

    #[test]
    fn outlets_loaded_computes_highlights() {
        let mut s = session();
        s.outlets_loaded(vec![
            outlet("A", 3.1409, 101.6932),
            outlet("B", 3.1410, 101.6933),
            outlet("C", 10.0, 110.0),
        ]);
        let flags: Vec<bool> = s.outlets_with_highlight().map(|(_, h)| h).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(s.map_view().markers.len(), 3);
    }

    #[test]
    fn reload_replaces_outlets_wholesale() {
        let mut s = session();
        s.outlets_loaded(vec![outlet("A", 3.0, 101.0), outlet("B", 3.0, 101.0)]);
        s.outlets_loaded(vec![outlet("C", 5.0, 100.0)]);
        let names: Vec<&str> = s.outlets().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["C"]);
        let flags: Vec<bool> = s.outlets_with_highlight().map(|(_, h)| h).collect();
        assert_eq!(flags, vec![false]);
    }

    #[test]
    fn outlets_failed_empties_list_and_sets_error() {
        let mut s = session();
        s.outlets_loaded(vec![outlet("A", 3.0, 101.0)]);
        s.outlets_failed();
        assert!(s.outlets().is_empty());
        assert_eq!(s.error(), Some(OUTLETS_LOAD_ERROR));
        assert!(s.map_view().markers.is_empty());
    }

    #[test]
    fn blank_query_is_ignored() {
        let mut s = session();
        s.set_query("   ");
        assert!(s.submit().is_none());
        assert!(s.transcript().is_empty());
        assert!(!s.is_loading());
        assert_eq!(s.draft(), "   ");
    }

    #[test]
    fn submit_appends_user_message_and_enters_loading() {
        let mut s = session();
        s.set_query("which outlet closes the latest?");
        let pending = s.submit().expect("query should be accepted");
        assert_eq!(pending.query(), "which outlet closes the latest?");
        assert_eq!(s.draft(), "");
        assert!(s.is_loading());
        assert_eq!(s.typing_indicator(), Some("Typing..."));
        assert_eq!(s.send_label(), "Searching...");
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript().last().unwrap().sender, Sender::User);

        s.reply_received(pending, "<p>Subway Sunway Pyramid</p>");
        assert!(!s.is_loading());
        assert_eq!(s.send_label(), "Send");
        assert!(s.typing_indicator().is_none());
        let last = s.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "<p>Subway Sunway Pyramid</p>");
    }

    #[test]
    fn second_submit_while_loading_is_rejected() {
        let mut s = session();
        s.set_query("first");
        let pending = s.submit().unwrap();
        s.set_query("second");
        assert!(s.submit().is_none());
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.draft(), "second");

        s.reply_received(pending, "ok");
        let next = s.submit().expect("accepted once the first reply arrived");
        assert_eq!(next.query(), "second");
        assert_eq!(s.transcript().len(), 3);
        s.reply_received(next, "ok again");
    }

    #[test]
    fn reply_failure_keeps_only_user_message() {
        let mut s = session();
        s.set_query("how many outlets in bangsar?");
        let pending = s.submit().unwrap();
        s.reply_failed(pending, "error sending request");
        assert!(!s.is_loading());
        assert_eq!(s.error(), Some("error sending request"));
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript().last().unwrap().sender, Sender::User);
    }

    #[test]
    fn submit_clears_previous_error() {
        let mut s = session();
        s.outlets_failed();
        s.set_query("hello");
        let pending = s.submit().unwrap();
        assert!(s.error().is_none());
        s.reply_received(pending, "hi");
    }
}
