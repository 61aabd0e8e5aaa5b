use serde::Serialize;

use super::{ChatMessage, Transcript};

/// Instruction prepended to every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// Default model served by the completion endpoint.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Payload for one completion call: the system message followed by the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }

    /// Build a request whose first entry is always [`SYSTEM_PROMPT`].
    pub fn from_transcript(model: impl Into<String>, transcript: &Transcript) -> Self {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(transcript.iter().cloned());
        Self::new(model, messages)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
