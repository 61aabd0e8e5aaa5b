use serde::{Deserialize, Serialize};

use super::ChatMessage;

/// Ordered, append-only list of chat messages for one session.
///
/// Turn order is not validated: two user messages in a row are accepted as-is.
/// There is no size bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append(ChatMessage::user("first"));
        transcript.append(ChatMessage::user("second"));
        transcript.append(ChatMessage::assistant("third"));

        let contents: Vec<_> = transcript.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(transcript.last().map(|m| m.role()), Some(Role::Assistant));
    }

    #[test]
    fn test_new_transcript_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
        assert!(transcript.last().is_none());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut transcript = Transcript::new();
        transcript.append(ChatMessage::user("hi"));
        let json = serde_json::to_value(&transcript).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
    }
}
