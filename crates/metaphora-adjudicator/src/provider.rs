//! Chat-completion provider seam and the OpenRouter implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{AdjudicatorConfig, AdjudicatorError};

// ============================================================================
// Provider interface
// ============================================================================

/// Anything that can answer a chat-completion request.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AdjudicatorError>;

    /// Model identifier, recorded in reports.
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            max_tokens: None,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

// ============================================================================
// OpenRouter
// ============================================================================

/// OpenAI-compatible `/chat/completions` client pointed at OpenRouter.
pub struct OpenRouterClient {
    client: Client,
    config: AdjudicatorConfig,
}

impl OpenRouterClient {
    pub fn new(config: AdjudicatorConfig) -> Result<Self, AdjudicatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdjudicatorError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AdjudicatorConfig {
        &self.config
    }

    fn request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "temperature": request.temperature.unwrap_or(self.config.temperature),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AdjudicatorError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| AdjudicatorError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(AdjudicatorError::RateLimited {
                retry_after_ms: retry_after * 1000,
            });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdjudicatorError::Api(format!("{}: {}", status, error_text)));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AdjudicatorError::InvalidResponse(e.to_string()))?;
        parse_completion(&data)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Pull the first choice's content out of an OpenAI-style completion body.
pub fn parse_completion(data: &serde_json::Value) -> Result<ChatResponse, AdjudicatorError> {
    let content = data["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            AdjudicatorError::InvalidResponse("missing choices[0].message.content".to_string())
        })?
        .to_string();

    Ok(ChatResponse {
        content,
        usage: Usage {
            prompt_tokens: data["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as usize,
            completion_tokens: data["usage"]["completion_tokens"].as_u64().unwrap_or(0) as usize,
        },
    })
}
