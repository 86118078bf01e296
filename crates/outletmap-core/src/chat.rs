use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One chat bubble. Bot text may contain HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Ordered, append-only chat history.
///
/// Messages can be appended and read, never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_preserves_append_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("how many outlets in bangsar?"));
        transcript.push(ChatMessage::bot("<p>There are <b>2</b> outlets.</p>"));
        transcript.push(ChatMessage::user("thanks"));

        let senders: Vec<Sender> = transcript.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Bot, Sender::User]);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("thanks"));
    }

    #[test]
    fn transcript_serializes_as_plain_array() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hi"));
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(json, serde_json::json!([{ "sender": "user", "text": "hi" }]));
    }
}
