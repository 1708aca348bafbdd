//! Model client for text generation using an OpenAI-compatible API

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::{GenerationRequest, TextProvider};
use crate::error::ProviderError;

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Configuration for the text-generation model
#[derive(Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model_name: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom settings
    pub fn new(base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Build a config from the process environment
    ///
    /// A missing credential is left empty; requests will fail at call time.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("NOORDEEN_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var(API_KEY_ENV).unwrap_or_default(),
            model_name: env::var("NOORDEEN_MODEL").unwrap_or(defaults.model_name),
            max_tokens: env::var("NOORDEEN_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: env::var("NOORDEEN_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Client for an OpenAI-compatible chat completion endpoint
pub struct ModelClient {
    config: ModelConfig,
    client: Client<OpenAIConfig>,
}

impl ModelClient {
    /// Create a new ModelClient
    ///
    /// Never fails: without a credential the client is still built and the
    /// provider rejects requests later.
    pub fn new(config: ModelConfig) -> Self {
        if !config.has_credential() {
            warn!(
                "{} is not set; requests to {} will fail until a credential is configured",
                API_KEY_ENV, config.base_url
            );
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(&config.api_key);

        let client = Client::with_config(openai_config).with_backoff(single_attempt());

        Self { config, client }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Test connection to the model API by sending a simple request
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model_name)
            .max_tokens(5_u32)
            .temperature(0.0_f32)
            .messages(vec![MessageBuilder::user("Hi")?])
            .build()?;

        let response = self.client.chat().create(request).await?;

        if response.choices.is_empty() {
            return Err(ProviderError::Unavailable(
                "Received empty response from API".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl TextProvider for ModelClient {
    fn model_id(&self) -> &str {
        &self.config.model_name
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, ProviderError> {
        let messages = vec![
            MessageBuilder::system(request.system_instruction)?,
            MessageBuilder::user(&request.user_content)?,
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model_name)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .messages(messages)
            .build()?;

        debug!(model = %self.config.model_name, "sending chat completion request");
        let response = self.client.chat().create(request).await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

/// Backoff policy that gives up after the first failed attempt
///
/// `async-openai` retries rate-limited requests by default; each dispatch must
/// reach the provider exactly once.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Helper for building request messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Create a system message
    pub fn system(content: &str) -> Result<ChatCompletionRequestMessage, ProviderError> {
        Ok(ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into())
    }

    /// Create a plain-text user message
    pub fn user(text: &str) -> Result<ChatCompletionRequestMessage, ProviderError> {
        Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()?
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model_name, "gemini-3-flash-preview");
        assert!(!config.has_credential());
    }

    #[test]
    fn test_model_config_builder() {
        let config = ModelConfig::new("http://custom:8080", "custom-model")
            .with_api_key("test-key")
            .with_max_tokens(256)
            .with_temperature(0.1);

        assert_eq!(config.base_url, "http://custom:8080");
        assert_eq!(config.model_name, "custom-model");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.max_tokens, 256);
        assert!(config.has_credential());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ModelConfig::default().with_api_key("secret-value");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_client_without_credential() {
        let client = ModelClient::new(ModelConfig::default().with_api_key("   "));
        assert_eq!(client.model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn test_message_builder() {
        let system = MessageBuilder::system("be brief").unwrap();
        assert!(matches!(system, ChatCompletionRequestMessage::System(_)));

        let user = MessageBuilder::user("নামাজের গুরুত্ব কী?").unwrap();
        assert!(matches!(user, ChatCompletionRequestMessage::User(_)));
    }
}
