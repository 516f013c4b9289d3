//! Chat-completion client
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire format used by
//! DeepSeek. One call sends one single-turn prompt and returns the assistant
//! text. No retries, no streaming.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Client for a single chat-completion endpoint
pub struct ChatClient {
    client: Client,
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            Error::config_invalid("failed to create HTTP client")
                .with_operation("client::new")
                .set_source(e)
        })?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `prompt` as a single user message and return the assistant text.
    pub async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let request = PromptRequest {
            model: &self.config.model,
            messages: [PromptMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };
        let endpoint = self.config.endpoint();

        info!(model = %self.config.model, max_tokens, "calling chat-completion API");
        debug!(%endpoint, prompt_chars = prompt.chars().count(), "request details");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "API request failed");
                Error::network_failed(format!("request to {} failed", endpoint))
                    .with_operation("client::complete")
                    .set_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "API returned an error status");
            return Err(Error::api_failed(status.as_u16(), body)
                .with_operation("client::complete")
                .with_context("model", self.config.model.clone()));
        }

        let body = response.text().await.map_err(|e| {
            Error::network_failed("failed to read response body")
                .with_operation("client::complete")
                .set_source(e)
        })?;

        let content = extract_content(&body)?;
        info!(response_chars = content.chars().count(), "API call succeeded");
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_content(body: &str) -> Result<String> {
    let envelope: CompletionEnvelope = serde_json::from_str(body).map_err(|e| {
        Error::response_malformed("response body is not a chat-completion envelope")
            .with_operation("client::extract_content")
            .set_source(e)
    })?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            Error::response_malformed("response has no choices[0].message.content")
                .with_operation("client::extract_content")
        })
}

// ============================================================================
// Wire types
// ============================================================================

/// Request body, built right before each call
#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    model: &'a str,
    messages: [PromptMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct PromptMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
