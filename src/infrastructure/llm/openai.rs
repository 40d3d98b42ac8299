use crate::domain::error::ProviderError;
use crate::domain::ports::llm_provider::{LlmProvider, ModelConfig};
use crate::infrastructure::http::{build_client, status_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions (also works with OpenAI-compatible local servers
/// through `base_url`).
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChat {
    pub fn new(api_key: String, model: Option<String>, timeout_secs: u64) -> Self {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(
        api_key: String,
        model: Option<String>,
        timeout_secs: u64,
        base_url: String,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key,
            model: model.unwrap_or_else(|| "gpt-4o".to_string()),
            base_url,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str, config: &ModelConfig) -> ChatRequest<'a> {
        if config.top_k.is_some() {
            debug!("top_k is not supported by chat completions; ignoring");
        }
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_output_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiChat {
    fn name(&self) -> &str {
        "openai"
    }

    fn check_ready(&self) -> Result<(), ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Config("OpenAI API key is not set".into()));
        }
        Ok(())
    }

    async fn generate(&self, prompt: &str, config: &ModelConfig) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt, config))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let result: ChatResponse = resp.json().await?;
        first_choice(result)
    }
}

fn first_choice(result: ChatResponse) -> Result<String, ProviderError> {
    result
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Empty("no choices in completion".into()))
}
