use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use super::{ChatMessage, Transcript};

/// One browser's conversation. Owns its transcript for the session's lifetime.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    transcript: Transcript,
    last_active: Instant,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            transcript: Transcript::new(),
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.transcript.append(message);
        self.touch();
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Time since the session was last opened or written to.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    pub fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.idle_for() >= idle_timeout
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
