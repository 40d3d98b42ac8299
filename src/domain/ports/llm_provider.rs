use crate::domain::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling options passed through to the model. `None` leaves the
/// provider's default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Sampling randomness
    pub temperature: Option<f32>,
    /// Nucleus sampling mass
    pub top_p: Option<f32>,
    /// Top-k sampling cutoff; not every provider supports it
    pub top_k: Option<u32>,
    /// Response length cap
    pub max_output_tokens: Option<u32>,
}

impl ModelConfig {
    /// Near-deterministic, short answers for entity extraction.
    pub fn extraction() -> Self {
        Self {
            temperature: Some(0.0),
            top_p: Some(1.0),
            top_k: Some(1),
            max_output_tokens: Some(64),
        }
    }

    /// Room for a full write-up.
    pub fn synthesis() -> Self {
        Self {
            temperature: Some(0.4),
            top_p: Some(0.95),
            top_k: Some(40),
            max_output_tokens: Some(1024),
        }
    }
}

/// Text-in/text-out language model. The response carries no guaranteed
/// structure; callers parse it themselves.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Checks local prerequisites (credentials) without touching the network.
    fn check_ready(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn generate(&self, prompt: &str, config: &ModelConfig) -> Result<String, ProviderError>;
}
