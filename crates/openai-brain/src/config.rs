//! Configuration for OpenAiBrain.

use std::env;
use std::time::Duration;

use brain_core::BrainError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default generated image size (square).
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Configuration for OpenAiBrain.
#[derive(Debug, Clone)]
pub struct OpenAiBrainConfig {
    /// API base URL, without the `/v1/...` suffix.
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Chat model name.
    pub model: String,

    /// Image model name; `None` uses the service default.
    pub image_model: Option<String>,

    /// Size of generated images.
    pub image_size: String,

    /// Maximum tokens for a completion.
    pub max_tokens: Option<u32>,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for OpenAiBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            image_model: None,
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            max_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - Chat model (default: gpt-3.5-turbo)
    /// - `OPENAI_IMAGE_MODEL` - Image model (default: service default)
    /// - `OPENAI_IMAGE_SIZE` - Image size (default: 1024x1024)
    /// - `OPENAI_MAX_TOKENS` - Max completion tokens (default: unset)
    /// - `OPENAI_TIMEOUT_SECS` - Request timeout in seconds (default: 60)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| BrainError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("OPENAI_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("OPENAI_MODEL").unwrap_or(defaults.model);
        let image_model = env::var("OPENAI_IMAGE_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let image_size = env::var("OPENAI_IMAGE_SIZE").unwrap_or(defaults.image_size);

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok());

        let timeout = env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            image_model,
            image_size,
            max_tokens,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiBrainConfigBuilder {
        OpenAiBrainConfigBuilder::default()
    }

    /// Chat completions endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url)
    }

    /// Image generation endpoint.
    pub fn images_url(&self) -> String {
        format!("{}/v1/images/generations", self.api_url)
    }
}

/// Builder for OpenAiBrainConfig.
#[derive(Debug, Default)]
pub struct OpenAiBrainConfigBuilder {
    config: OpenAiBrainConfig,
}

impl OpenAiBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the chat model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the image model name.
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = Some(model.into());
        self
    }

    /// Set the generated image size.
    pub fn image_size(mut self, size: impl Into<String>) -> Self {
        self.config.image_size = size.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiBrainConfig {
        self.config
    }
}
