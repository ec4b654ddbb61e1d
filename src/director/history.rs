use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Once the history grows past this many entries...
pub const HISTORY_LIMIT: usize = 20;
/// ...it is cut back to this many of the most recent ones.
pub const HISTORY_KEEP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Bounded conversation memory of the director.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    entries: VecDeque<ChatMessage>,
}

fn trim(entries: &mut VecDeque<ChatMessage>) {
    if entries.len() > HISTORY_LIMIT {
        let excess = entries.len() - HISTORY_KEEP;
        entries.drain(..excess);
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.entries.push_back(message);
        trim(&mut self.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    /// Message list for one call: system instruction, then the history as it
    /// would look with `pending` appended. The history itself is untouched.
    pub fn request_with(&self, system: &str, pending: &ChatMessage) -> Vec<ChatMessage> {
        let mut view = self.entries.clone();
        view.push_back(pending.clone());
        trim(&mut view);

        let mut messages = Vec::with_capacity(view.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(view);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_to_most_recent_sixteen() {
        let mut history = ConversationHistory::new();
        for i in 0..21 {
            history.push(ChatMessage::user(format!("m{}", i)));
            if i < HISTORY_LIMIT {
                assert_eq!(history.len(), i + 1);
            }
        }
        assert_eq!(history.len(), HISTORY_KEEP);
        let kept: Vec<String> = history.iter().map(|m| m.content.clone()).collect();
        let expected: Vec<String> = (5..21).map(|i| format!("m{}", i)).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_request_view_leaves_history_alone() {
        let mut history = ConversationHistory::new();
        history.push(ChatMessage::user("hello"));
        history.push(ChatMessage::assistant("{}"));

        let request = history.request_with("be kind", &ChatMessage::user("again"));
        assert_eq!(request.len(), 4);
        assert_eq!(request[0], ChatMessage::system("be kind"));
        assert_eq!(request[3], ChatMessage::user("again"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
