use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::CompletionClient;
use crate::domain::{ChatMessage, ChatSession, CompletionRequest, DomainError};

/// Runs one chat turn: record the prompt, ask the model, record the reply.
pub struct SendMessageUseCase {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl SendMessageUseCase {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Append `prompt` to the session, request a completion over the whole
    /// transcript and append the reply.
    ///
    /// An empty prompt is rejected before anything is recorded; whitespace is
    /// sent as typed. When the completion
    /// call fails the user message stays in the transcript without a reply, and the
    /// error is returned unchanged.
    pub async fn execute(
        &self,
        session: &mut ChatSession,
        prompt: &str,
    ) -> Result<ChatMessage, DomainError> {
        if prompt.is_empty() {
            return Err(DomainError::invalid_input("prompt must not be empty"));
        }

        session.append(ChatMessage::user(prompt));

        let request = CompletionRequest::from_transcript(&self.model, session.transcript());
        debug!(
            "Requesting completion for session {} ({} messages, model {})",
            session.id(),
            request.messages().len(),
            self.model
        );

        let reply = match self.client.complete(&request).await {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => {
                warn!("Completion failed for session {}: {}", session.id(), e);
                return Err(e);
            }
        };

        session.append(reply.clone());
        info!(
            "Session {} now holds {} messages",
            session.id(),
            session.transcript().len()
        );

        Ok(reply)
    }
}
