//! OpenAiBrain implementation.

use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse,
};
use crate::config::OpenAiBrainConfig;

/// A completion backend that uses an OpenAI-compatible HTTP API.
///
/// OpenAiBrain is stateless: conversation history is owned by the caller
/// and passed in on every request.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "OpenAiBrain initialized with model: {}, image size: {}",
            config.model, config.image_size
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(OpenAiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    /// POST a JSON body and decode a JSON response, mapping API errors.
    async fn post_json<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp, BrainError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_failure(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))
    }
}

/// Build a processing error from a non-success response body.
fn api_failure(status: u16, body: &str) -> BrainError {
    let detail = serde_json::from_str::<ApiError>(body)
        .map(|api_error| api_error.error.message)
        .unwrap_or_else(|_| body.to_string());

    BrainError::ProcessingFailed(format!("API error ({}): {}", status, detail))
}

/// Pull the first non-blank message content out of a completion.
fn first_content(completion: ChatCompletionResponse) -> Result<String, BrainError> {
    completion
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(BrainError::EmptyResponse)
}

#[async_trait]
impl CompletionClient for OpenAiBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, BrainError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature,
            max_tokens: self.config.max_tokens,
        };

        info!("Using temperature: {}", temperature);
        debug!("Sending {} messages to {}", messages.len(), self.config.chat_url());

        let completion: ChatCompletionResponse =
            self.post_json(&self.config.chat_url(), &request).await?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        first_content(completion)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, BrainError> {
        let request = ImageGenerationRequest {
            model: self.config.image_model.as_deref(),
            prompt,
            n: 1,
            size: &self.config.image_size,
        };

        debug!("Requesting image ({}) for prompt: {}", self.config.image_size, prompt);

        let generated: ImageGenerationResponse =
            self.post_json(&self.config.images_url(), &request).await?;

        generated
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or(BrainError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::{Choice, ResponseMessage};

    fn completion_with(contents: Vec<Option<&str>>) -> ChatCompletionResponse {
        ChatCompletionResponse {
            model: None,
            choices: contents
                .into_iter()
                .map(|content| Choice {
                    message: ResponseMessage {
                        content: content.map(str::to_string),
                    },
                    finish_reason: None,
                })
                .collect(),
            usage: None,
        }
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let config = OpenAiBrainConfig::builder().build();
        assert!(matches!(
            OpenAiBrain::new(config),
            Err(BrainError::Configuration(_))
        ));
    }

    #[test]
    fn test_brain_name() {
        let config = OpenAiBrainConfig::builder().api_key("test-key").build();
        let brain = OpenAiBrain::new(config).unwrap();
        assert_eq!(brain.name(), "OpenAiBrain");
    }

    #[test]
    fn test_first_content_skips_null() {
        let completion = completion_with(vec![None, Some("answer")]);
        assert_eq!(first_content(completion).unwrap(), "answer");
    }

    #[test]
    fn test_first_content_blank_is_empty_response() {
        let completion = completion_with(vec![Some("   ")]);
        assert!(matches!(first_content(completion), Err(BrainError::EmptyResponse)));

        let completion = completion_with(vec![]);
        assert!(matches!(first_content(completion), Err(BrainError::EmptyResponse)));
    }

    #[test]
    fn test_api_failure_uses_error_message() {
        let err = api_failure(401, r#"{"error": {"message": "bad key"}}"#);
        assert_eq!(err.to_string(), "processing failed: API error (401): bad key");

        let err = api_failure(502, "upstream down");
        assert_eq!(err.to_string(), "processing failed: API error (502): upstream down");
    }
}
