use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatSession, DomainError};

/// A session handle. Holding the lock serializes turns within one session.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Keeps chat sessions alive for as long as the process runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create and register a fresh, empty session.
    async fn create(&self) -> Result<SharedSession, DomainError>;

    async fn find(&self, id: &str) -> Result<Option<SharedSession>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    /// Return the session for `id`, or a new one when `id` is absent or unknown.
    ///
    /// An unknown id never becomes a session id; the caller gets a fresh one.
    async fn get_or_create(&self, id: Option<&str>) -> Result<SharedSession, DomainError> {
        if let Some(id) = id {
            if let Some(session) = self.find(id).await? {
                return Ok(session);
            }
        }
        self.create().await
    }
}
