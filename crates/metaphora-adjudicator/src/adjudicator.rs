//! Single-description classification with retry and backoff.

use std::sync::Arc;
use std::time::Duration;

use metaphora_core::{MetaphorAnalyzer, MetaphorHints};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::prompts::{build_user_prompt, PromptMode};
use crate::provider::{ChatProvider, ChatRequest};
use crate::response::{parse_classification, Classification};
use crate::{AdjudicatorConfig, AdjudicatorError};

/// A verdict together with the analyzer hints that primed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjudication {
    pub classification: Classification,
    pub metaphor_pre_analysis: MetaphorHints,
}

pub struct Adjudicator {
    provider: Arc<dyn ChatProvider>,
    analyzer: MetaphorAnalyzer,
    system_prompt: String,
    max_retries: u32,
    max_tokens: u32,
    temperature: f32,
    backoff_base: Duration,
}

impl Adjudicator {
    pub fn new(provider: Arc<dyn ChatProvider>, analyzer: MetaphorAnalyzer) -> Self {
        let defaults = AdjudicatorConfig::new("");
        Self {
            provider,
            analyzer,
            system_prompt: PromptMode::default().system_prompt(),
            max_retries: defaults.max_retries,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            backoff_base: Duration::from_secs(1),
        }
    }

    /// Take retry and sampling settings from `config`.
    pub fn with_config(mut self, config: &AdjudicatorConfig) -> Self {
        self.max_retries = config.max_retries.max(1);
        self.max_tokens = config.max_tokens;
        self.temperature = config.temperature;
        self
    }

    pub fn with_prompt_mode(mut self, mode: PromptMode) -> Self {
        self.system_prompt = mode.system_prompt();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Backoff before attempt `n + 1` is `base * 2^n`, or the server's
    /// `retry-after` when that is longer.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn analyzer(&self) -> &MetaphorAnalyzer {
        &self.analyzer
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn pre_analyze(&self, description: &str) -> MetaphorHints {
        self.analyzer.pre_analyze(description)
    }

    /// Pre-analyze `description`, then ask the model.
    pub async fn classify(&self, description: &str) -> Result<Adjudication, AdjudicatorError> {
        let hints = self.pre_analyze(description);
        let classification = self.classify_with_hints(description, &hints).await?;
        Ok(Adjudication {
            classification,
            metaphor_pre_analysis: hints,
        })
    }

    pub async fn classify_with_hints(
        &self,
        description: &str,
        hints: &MetaphorHints,
    ) -> Result<Classification, AdjudicatorError> {
        let mut request = ChatRequest::new(
            self.system_prompt.clone(),
            build_user_prompt(description, hints),
        );
        request.max_tokens = Some(self.max_tokens);
        request.temperature = Some(self.temperature);

        let mut last_error = None;
        for attempt in 0..self.max_retries {
            match self.attempt(&request).await {
                Ok(classification) => return Ok(classification),
                Err(err) => {
                    let is_last = attempt + 1 == self.max_retries;
                    if err.is_transient() {
                        let backoff = self.backoff_base.saturating_mul(2u32.saturating_pow(attempt));
                        let wait = err.retry_after().map_or(backoff, |after| after.max(backoff));
                        warn!(attempt = attempt + 1, error = %err, "attempt failed, backing off {:?}", wait);
                        if !is_last {
                            tokio::time::sleep(wait).await;
                        }
                    } else {
                        warn!(attempt = attempt + 1, error = %err, "provider rejected request");
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(AdjudicatorError::RetriesExhausted {
            attempts: self.max_retries,
            last: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<Classification, AdjudicatorError> {
        let response = self.provider.complete(request).await?;
        debug!(
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "completion received"
        );
        parse_classification(&response.content)
    }
}
