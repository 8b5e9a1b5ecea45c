//! Adjudicator configuration, loaded from the environment.

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REFERER: &str = "http://localhost:3000";
pub const DEFAULT_TITLE: &str = "Enhanced Consciousness Classifier";

#[derive(Debug, Clone, PartialEq)]
pub struct AdjudicatorConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub referer: String,
    pub title: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY is not set (export it or put it in a .env file)")]
    MissingApiKey,
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AdjudicatorConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout_secs: 60,
            max_retries: 3,
            max_tokens: 3000,
            temperature: 0.0,
        }
    }

    /// Load from `OPENROUTER_*`, `HTTP_REFERER` and `X_TITLE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENROUTER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("OPENROUTER_MODEL") {
            config.model = model;
        }
        if let Some(url) = lookup("OPENROUTER_BASE_URL") {
            config.base_url = url;
        }
        if let Some(referer) = lookup("HTTP_REFERER") {
            config.referer = referer;
        }
        if let Some(title) = lookup("X_TITLE") {
            config.title = title;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model name is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
