use std::sync::Arc;

use tracing::debug;

use crate::application::{SessionStore, SharedSession};
use crate::domain::DomainError;

/// Resolves the caller's session, starting a new one when needed.
pub struct OpenSessionUseCase {
    store: Arc<dyn SessionStore>,
}

impl OpenSessionUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: Option<&str>) -> Result<SharedSession, DomainError> {
        let session = self.store.get_or_create(id).await?;
        debug!("Resolved session {}", session.lock().await.id());
        Ok(session)
    }

    pub async fn active_sessions(&self) -> Result<usize, DomainError> {
        self.store.count().await
    }
}
