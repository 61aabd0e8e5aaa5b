use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::AppConfig;
use crate::domain::DomainError;
use crate::{
    CompletionClient, GroqClient, InMemorySessionStore, MockCompletionClient,
    OpenSessionUseCase, SendMessageUseCase, SessionStore,
};

pub struct ContainerConfig {
    pub app: AppConfig,
    /// Answer from [`MockCompletionClient`] instead of calling the provider.
    pub mock_completions: bool,
}

pub struct Container {
    completion_client: Arc<dyn CompletionClient>,
    session_store: Arc<dyn SessionStore>,
    config: ContainerConfig,
}

impl Container {
    /// Fails with a `ConfigError` when the provider's HTTP client cannot be built.
    pub fn new(config: ContainerConfig) -> Result<Self, DomainError> {
        let completion_client: Arc<dyn CompletionClient> = if config.mock_completions {
            debug!("Using mock completion client");
            Arc::new(MockCompletionClient::new())
        } else {
            let app = &config.app;
            debug!(
                "Using Groq completion client at {} (model {})",
                app.base_url(),
                app.model()
            );
            match app.request_timeout() {
                Some(timeout) => Arc::new(GroqClient::with_timeout(
                    app.api_key(),
                    app.base_url(),
                    timeout,
                )?),
                None => Arc::new(GroqClient::new(app.api_key(), app.base_url())?),
            }
        };

        Ok(Self::with_client(config, completion_client))
    }

    /// Wire an explicit completion client, bypassing provider selection.
    pub fn with_client(config: ContainerConfig, completion_client: Arc<dyn CompletionClient>) -> Self {
        Self {
            completion_client,
            session_store: Arc::new(InMemorySessionStore::new(
                config.app.session_idle_timeout(),
            )),
            config,
        }
    }

    pub fn send_message_use_case(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.completion_client.clone(), self.config.app.model())
    }

    pub fn open_session_use_case(&self) -> OpenSessionUseCase {
        OpenSessionUseCase::new(self.session_store.clone())
    }

    pub fn model(&self) -> &str {
        self.config.app.model()
    }

    pub fn mock_completions(&self) -> bool {
        self.config.mock_completions
    }

    /// How long an unused session survives; also the session cookie's lifetime.
    pub fn session_idle_timeout(&self) -> Duration {
        self.config.app.session_idle_timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_groq_backed_container() {
        let container = Container::new(ContainerConfig {
            app: AppConfig::new("test-key").with_model("other-model"),
            mock_completions: false,
        })
        .unwrap();

        assert_eq!(container.model(), "other-model");
        assert!(!container.mock_completions());
    }

    #[tokio::test]
    async fn test_mock_container_answers_without_provider() {
        let container = Container::new(ContainerConfig {
            app: AppConfig::new("test-key"),
            mock_completions: true,
        })
        .unwrap();
        assert!(container.mock_completions());

        let session = container.open_session_use_case().execute(None).await.unwrap();
        let mut session = session.lock().await;
        let reply = container
            .send_message_use_case()
            .execute(&mut session, "hello")
            .await
            .unwrap();

        assert!(reply.content().contains("hello"));
        assert_eq!(container.open_session_use_case().active_sessions().await.unwrap(), 1);
    }
}
