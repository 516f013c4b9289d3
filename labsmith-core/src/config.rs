//! Client configuration
//!
//! Resolves the API key, endpoint and model from explicit values and the
//! process environment. `.env` loading is left to the binary.

use crate::error::{Error, Result};
use std::fmt;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "DEEPSEEK_API_URL";
/// Environment variable holding the model identifier
pub const MODEL_ENV: &str = "DEEPSEEK_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-coder";

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Explicit values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Configuration for the chat-completion client
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Resolve configuration from overrides and the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        Self::from_lookup(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve configuration from overrides and an arbitrary variable lookup.
    ///
    /// Empty values count as unset. Fails with `ConfigInvalid` when no API key
    /// is available from either source.
    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<String>, var: &str| {
            non_empty(explicit).or_else(|| non_empty(lookup(var)))
        };

        let api_key = pick(overrides.api_key, API_KEY_ENV).ok_or_else(|| {
            Error::config_invalid(format!(
                "an API key is required: set {} or pass one explicitly",
                API_KEY_ENV
            ))
            .with_operation("config::resolve")
        })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = pick(overrides.base_url, API_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(model) = pick(overrides.model, MODEL_ENV) {
            config.model = model;
        }
        Ok(config)
    }

    /// Full URL of the chat-completion endpoint.
    ///
    /// A base URL that already names the endpoint is used as-is.
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with(COMPLETIONS_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base, COMPLETIONS_PATH)
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
