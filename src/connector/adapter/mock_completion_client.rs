use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{CompletionRequest, DomainError, Role};

/// Which error a failing [`MockCompletionClient`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Network,
    Authentication,
    RateLimited,
    Provider,
}

impl MockFailure {
    fn to_error(self) -> DomainError {
        match self {
            MockFailure::Network => DomainError::network("mock: connection refused"),
            MockFailure::Authentication => DomainError::authentication("mock: invalid API key"),
            MockFailure::RateLimited => DomainError::rate_limited("mock: too many requests"),
            MockFailure::Provider => DomainError::provider("mock: internal server error"),
        }
    }
}

/// Offline [`CompletionClient`].
///
/// Replies with queued answers in order, then echoes the latest user message.
/// A failing mock returns the same error on every call. Every request is recorded.
pub struct MockCompletionClient {
    replies: Arc<Mutex<VecDeque<String>>>,
    failure: Option<MockFailure>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            ..Self::new()
        }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    fn echo(request: &CompletionRequest) -> String {
        request
            .messages()
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
            .map(|m| format!("You said: {}", m.content()))
            .unwrap_or_default()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        self.requests.lock().await.push(request.clone());

        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        let reply = match self.replies.lock().await.pop_front() {
            Some(reply) => reply,
            None => Self::echo(request),
        };
        debug!("Mock completion for {} messages", request.messages().len());
        Ok(reply)
    }
}
