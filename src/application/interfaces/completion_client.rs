use async_trait::async_trait;

use crate::domain::{CompletionRequest, DomainError};

/// An interface for requesting a chat completion from a language model.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. Consumers (e.g. [`crate::application::SendMessageUseCase`]) stay
/// decoupled from any particular provider or HTTP client library.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the ordered messages in `request` and return the assistant's reply text.
    ///
    /// Failures are reported through distinct [`DomainError`] variants:
    /// `NetworkError`, `AuthenticationError`, `RateLimited` or `ProviderError`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError>;
}
