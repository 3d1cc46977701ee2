//! Chat message log.
//!
//! Messages are kept in relay delivery order and never removed, so the log
//! only grows for the lifetime of a session.

use serde::{Deserialize, Serialize};

/// A single chat message. Authorship is by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub display_name: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(display_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            text: text.into(),
        }
    }
}

/// Append-only, ordered chat history.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the tail. Returns the new length.
    pub fn append(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len()
    }

    /// Whether `message` should trigger the incoming-message cue: true
    /// exactly when someone other than `local_display_name` wrote it.
    pub fn notify_if_remote(message: &ChatMessage, local_display_name: &str) -> bool {
        message.display_name != local_display_name
    }

    /// Copy of every message, oldest first.
    pub fn all(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// The most recent `limit` messages, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages[skip..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_reports_length() {
        let mut log = MessageLog::new();
        assert_eq!(log.append(ChatMessage::new("Bob", "hi")), 1);
        assert_eq!(log.append(ChatMessage::new("Alice", "hello")), 2);
        assert_eq!(log.append(ChatMessage::new("Bob", "how are you")), 3);

        let texts: Vec<String> = log.all().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["hi", "hello", "how are you"]);
    }

    #[test]
    fn all_is_a_snapshot() {
        let mut log = MessageLog::new();
        log.append(ChatMessage::new("Bob", "first"));
        let snapshot = log.all();
        log.append(ChatMessage::new("Bob", "second"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn notify_only_for_other_authors() {
        let from_bob = ChatMessage::new("Bob", "hi");
        assert!(MessageLog::notify_if_remote(&from_bob, "Alice"));
        assert!(!MessageLog::notify_if_remote(&from_bob, "Bob"));
        // Comparison is exact.
        assert!(MessageLog::notify_if_remote(&from_bob, "bob"));
    }

    #[test]
    fn recent_returns_tail_oldest_first() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.append(ChatMessage::new("Bob", format!("m{i}")));
        }
        let texts: Vec<String> = log.recent(2).into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["m3", "m4"]);
        assert_eq!(log.recent(10).len(), 5);
        assert!(MessageLog::new().recent(3).is_empty());
    }

    #[test]
    fn duplicate_messages_are_kept() {
        let mut log = MessageLog::new();
        log.append(ChatMessage::new("Bob", "hi"));
        log.append(ChatMessage::new("Bob", "hi"));
        assert_eq!(log.len(), 2);
        assert!(!log.is_empty());
    }
}
