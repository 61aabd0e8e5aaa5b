//! Application configuration loaded from a JSON file.
//!
//! The only required key is `GROQ_API_KEY`:
//!
//! ```json
//! { "GROQ_API_KEY": "gsk_..." }
//! ```
//!
//! Optional keys override the model, the API host, the request timeout and
//! how long an idle browser session is kept.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::connector::DEFAULT_BASE_URL;
use crate::domain::{DomainError, DEFAULT_MODEL};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Sessions idle for longer than this are discarded with their transcript.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "GROQ_API_KEY")]
    api_key: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    /// Upper bound for one completion call. Unset means no timeout.
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    session_idle_secs: Option<u64>,
}

impl AppConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            base_url: None,
            request_timeout_secs: None,
            session_idle_secs: None,
        }
    }

    /// Read and validate the config file. Fails on a missing file, malformed
    /// JSON, or a missing/empty API key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            DomainError::config(format!("invalid config in {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| DomainError::config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::config("GROQ_API_KEY must not be empty"));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(DomainError::config(
                "request_timeout_secs must be greater than zero",
            ));
        }
        if self.session_idle_secs == Some(0) {
            return Err(DomainError::config(
                "session_idle_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs.unwrap_or(DEFAULT_SESSION_IDLE_SECS))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
