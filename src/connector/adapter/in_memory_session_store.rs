use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{SessionStore, SharedSession};
use crate::domain::ChatSession;
use crate::domain::DomainError;

/// Process-local session storage.
///
/// A session idle for `idle_timeout` is dropped together with its transcript.
/// Expired entries are swept whenever a session is created or counted, and are
/// never returned by `find`.
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SharedSession>>>,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Drop expired sessions. A session whose lock is held is mid-turn and kept.
    fn sweep(&self, sessions: &mut HashMap<String, SharedSession>) {
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => !session.is_expired(self.idle_timeout),
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Expired {} idle sessions", removed);
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<SharedSession, DomainError> {
        let session = ChatSession::new();
        let id = session.id().to_string();
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions);
        sessions.insert(id.clone(), shared.clone());
        debug!("Created session {}", id);

        Ok(shared)
    }

    async fn find(&self, id: &str) -> Result<Option<SharedSession>, DomainError> {
        let mut sessions = self.sessions.lock().await;
        let Some(shared) = sessions.get(id).cloned() else {
            return Ok(None);
        };

        // A locked session is mid-turn, so it is neither idle nor touched here.
        let expired = match shared.try_lock() {
            Ok(session) if session.is_expired(self.idle_timeout) => true,
            Ok(mut session) => {
                session.touch();
                false
            }
            Err(_) => false,
        };
        if expired {
            debug!("Session {} expired", id);
            sessions.remove(id);
            return Ok(None);
        }

        Ok(Some(shared))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions);
        Ok(sessions.len())
    }
}
