use crate::domain::error::ProviderError;
use async_trait::async_trait;

/// Raw quote fields as a provider reports them. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderQuote {
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
    pub display_name: Option<String>,
}

/// Source of current quotes (Yahoo Finance, a broker API, a test double).
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// One network call per invocation; no caching is implied.
    async fn get_quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError>;
}
