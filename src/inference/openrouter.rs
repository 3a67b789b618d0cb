//! OpenRouter gateway for rooftop image analysis.
//!
//! Sends one chat-completion request per analysis: a system message pinning
//! the reply shape and a user message carrying the prompt text plus the
//! image as a base64 data URL.

use crate::error::{Result, RoofwattError};
use crate::inference::gateway::{InferenceGateway, InferenceRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default OpenRouter chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-prover-v2:free";

const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Configuration for connecting to the OpenRouter API.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            api_url: std::env::var("OPENROUTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            model: std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_millis(
                std::env::var("OPENROUTER_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
        }
    }
}

/// Gateway for the OpenRouter hosted-model service.
pub struct OpenRouterGateway {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterGateway {
    /// Create a gateway configured from the environment.
    pub fn new() -> Self {
        Self::with_config(OpenRouterConfig::default())
    }

    /// Create a gateway with custom configuration.
    pub fn with_config(config: OpenRouterConfig) -> Self {
        let client = Client::builder().timeout(config.timeout).build().unwrap();

        Self { client, config }
    }

    /// Create a gateway with a custom API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::with_config(OpenRouterConfig {
            api_key: api_key.into(),
            ..Default::default()
        })
    }

    /// The model this gateway sends requests to.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl Default for OpenRouterGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceGateway for OpenRouterGateway {
    async fn complete(&self, request: &InferenceRequest) -> Result<String> {
        if self.config.api_key.is_empty() {
            return Err(RoofwattError::Config(
                "OPENROUTER_API_KEY is not set; cannot reach the model endpoint".to_string(),
            ));
        }

        info!("Delegating rooftop analysis to OpenRouter");
        debug!(
            model = %self.config.model,
            image_bytes = request.image.bytes.len(),
            "Sending completion request"
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": request.system_prompt
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": request.user_prompt },
                        { "type": "image_url", "image_url": { "url": request.image.to_data_url() } }
                    ]
                }
            ]
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoofwattError::Timeout(format!("model endpoint did not answer in time: {e}"))
                } else {
                    RoofwattError::Network(format!("failed to reach model endpoint: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RoofwattError::Api(format!(
                "OpenRouter API error {status}: {error_text}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RoofwattError::Api(format!("unreadable OpenRouter response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(RoofwattError::Api(error.message));
        }

        parsed
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                RoofwattError::Api("response contained no completion text".to_string())
            })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
