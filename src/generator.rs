//! Content generator abstraction.
//!
//! Unified interface for the external document generator. The live client
//! speaks the OpenAI-compatible chat-completions contract; the mock generator
//! produces a deterministic placeholder document so the orchestrator and
//! selection engine can be exercised without network access or cost.

use crate::error::ControllerError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Structured style/format configuration passed with every generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConstraints {
    /// System prompt establishing the document's voice and structure.
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            system_prompt: "You are a precise technical writer. Produce a complete, \
                            self-contained Markdown document for the requested topic."
                .to_string(),
            temperature: 0.7,
            max_tokens: 6000,
        }
    }
}

/// Successful generator output for one identifier. Owned by the orchestrator
/// for the duration of that identifier's processing; never shared.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    /// Model (or stand-in) that produced the content.
    pub model: String,
}

/// External content generator collaborator.
///
/// The controller treats implementations as opaque: it confirms non-empty
/// success and persists the payload, nothing more.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        item_id: &str,
        constraints: &GenerationConstraints,
    ) -> Result<Document, ControllerError>;

    fn generator_name(&self) -> &str;
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

const GENERATOR_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn failure(item: &str, reason: String) -> ControllerError {
    ControllerError::GenerationFailed {
        item: item.to_string(),
        reason,
    }
}

fn map_http_error(item: &str, error: reqwest::Error) -> ControllerError {
    let reason = if error.is_timeout() {
        format!("request timeout: {}", error)
    } else if error.is_connect() {
        format!("connection error: {}", error)
    } else {
        format!("http error: {}", error)
    };
    failure(item, reason)
}

/// Live generator client for OpenAI-compatible chat-completions endpoints.
pub struct ChatCompletionsGenerator {
    client: Client,
    model: String,
    api_key: String,
    endpoint: String,
}

impl ChatCompletionsGenerator {
    pub fn new(
        model: String,
        api_key: String,
        endpoint: String,
        request_timeout: Duration,
    ) -> Result<Self, ControllerError> {
        let client = Client::builder()
            .connect_timeout(GENERATOR_HTTP_CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                ControllerError::ConfigError(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            model,
            api_key,
            endpoint,
        })
    }

    fn user_prompt(item_id: &str) -> String {
        format!(
            "Produce the complete reference document for '{}'. \
             Output a single Markdown file. No meta commentary, no prompt leakage.",
            item_id
        )
    }

    /// Prepend YAML frontmatter when the model omitted it, so every persisted
    /// artifact carries a title and generation date.
    fn ensure_frontmatter(item_id: &str, model: &str, content: String) -> String {
        if content.trim_start().starts_with("---") {
            return content;
        }
        format!(
            "---\ntitle: \"{}\"\ndate: \"{}\"\nmodel: \"{}\"\n---\n\n{}",
            item_id,
            Utc::now().date_naive(),
            model,
            content
        )
    }
}

#[async_trait]
impl ContentGenerator for ChatCompletionsGenerator {
    async fn generate(
        &self,
        item_id: &str,
        constraints: &GenerationConstraints,
    ) -> Result<Document, ControllerError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: constraints.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_prompt(item_id),
                },
            ],
            temperature: Some(constraints.temperature),
            max_tokens: Some(constraints.max_tokens),
        };

        let url = format!("{}/chat/completions", self.endpoint);
        debug!(item = item_id, model = %self.model, "sending generation request");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| map_http_error(item_id, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let reason = match status.as_u16() {
                401 | 403 => format!("authentication failed: {}", error_text),
                404 => format!("model not found: {}", error_text),
                429 => format!("rate limit exceeded: {}", error_text),
                _ => format!("request failed with status {}: {}", status, error_text),
            };
            return Err(failure(item_id, reason));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| failure(item_id, format!("failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| failure(item_id, "no choices in response".to_string()))?;

        if choice.message.content.trim().is_empty() {
            return Err(failure(item_id, "empty document returned".to_string()));
        }

        info!(item = item_id, model = %completion.model, "generation response received");
        Ok(Document {
            content: Self::ensure_frontmatter(item_id, &completion.model, choice.message.content),
            model: completion.model,
        })
    }

    fn generator_name(&self) -> &str {
        "chat-completions"
    }
}

/// Deterministic stand-in for the live generator.
///
/// Always succeeds with a fixed-structure placeholder document. Stable headers
/// and sections; no network, no clock, no randomness.
#[derive(Debug, Default, Clone)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(
        &self,
        item_id: &str,
        _constraints: &GenerationConstraints,
    ) -> Result<Document, ControllerError> {
        let content = format!(
            "---\ntitle: \"{id}\"\nmodel: \"mock\"\n---\n\n\
             # {id} (mock output)\n\n\
             This placeholder was produced by the mock generator for dry runs and CI.\n\n\
             ## Overview\n\nStructural stand-in for the real document body.\n\n\
             ## Examples\n\n```\nprintln!(\"mock mode active\");\n```\n\n\
             ## Summary\n\nGenerated without contacting the live service.\n",
            id = item_id
        );
        Ok(Document {
            content,
            model: "mock".to_string(),
        })
    }

    fn generator_name(&self) -> &str {
        "mock"
    }
}
