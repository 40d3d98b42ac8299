use thiserror::Error;

/// Pipeline-level error taxonomy.
///
/// `DataUnavailable` and `ExtractionAmbiguous` are absorbed by the stage that
/// raises them (sentinel substitution). `SynthesisFailed` and
/// `ConfigurationInvalid` end the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Configuration invalid: {0}")]
    ConfigurationInvalid(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Extraction ambiguous: {0}")]
    ExtractionAmbiguous(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),
}

/// Errors raised by provider adapters (quote, news, LLM).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// HTTP or network error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error (missing API key, etc.)
    #[error("Config error: {0}")]
    Config(String),

    /// Provider answered but had nothing usable
    #[error("Empty response: {0}")]
    Empty(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Parse(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}
