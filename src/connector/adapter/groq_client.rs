use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{CompletionRequest, DomainError};

/// Groq's public API host.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";
const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for Groq's OpenAI-compatible chat-completions endpoint.
///
/// The API key is handed over by the caller; nothing is read from the
/// environment. Any server speaking the same protocol can be targeted through
/// `base_url`.
///
/// No timeout is applied unless one is configured with [`GroqClient::with_timeout`].
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl GroqClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::build(api_key.into(), base_url.into(), None)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Self::build(api_key.into(), base_url.into(), Some(timeout))
    }

    fn build(
        api_key: String,
        base_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, DomainError> {
        let url = format!("{}{COMPLETIONS_PATH}", base_url.trim_end_matches('/'));
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            DomainError::config(format!("GroqClient: failed to build HTTP client: {e}"))
        })?;
        Ok(Self {
            client,
            api_key,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Map a non-success status to the matching error variant.
    fn status_error(status: StatusCode, body: &str) -> DomainError {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        let msg = if detail.is_empty() {
            format!("GroqClient: API returned {status}")
        } else {
            format!("GroqClient: API returned {status}: {detail}")
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::authentication(msg),
            StatusCode::TOO_MANY_REQUESTS => DomainError::rate_limited(msg),
            _ => DomainError::provider(msg),
        }
    }

    fn extract_reply(response: ApiResponse) -> Result<String, DomainError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| DomainError::provider("GroqClient: response contained no choices"))
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        let payload = ApiRequest {
            model: request.model(),
            messages: request
                .messages()
                .iter()
                .map(|m| ApiMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::network(format!("GroqClient: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GroqClient: API returned {status}: {body}");
            return Err(Self::status_error(status, &body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::provider(format!("GroqClient: failed to parse response: {e}"))
        })?;

        let reply = Self::extract_reply(api_response)?;
        debug!("GroqClient: received {} bytes of completion", reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_without_double_slash() {
        let client = GroqClient::new("key", "http://localhost:9999/").unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9999/openai/v1/chat/completions"
        );
    }

    #[test]
    fn with_timeout_builds_client() {
        let client =
            GroqClient::with_timeout("key", DEFAULT_BASE_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn unauthorized_maps_to_authentication_error() {
        let body = r#"{"error":{"message":"Invalid API Key"}}"#;
        let err = GroqClient::status_error(StatusCode::UNAUTHORIZED, body);
        assert!(err.is_authentication_error());
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let err = GroqClient::status_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn server_error_maps_to_provider_error() {
        let err = GroqClient::status_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.is_provider_error());
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn extract_reply_takes_first_choice() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"first"}},
                           {"message":{"role":"assistant","content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(GroqClient::extract_reply(response).unwrap(), "first");
    }

    #[test]
    fn extract_reply_fails_without_choices() {
        let response: ApiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(GroqClient::extract_reply(response)
            .unwrap_err()
            .is_provider_error());
    }
}
