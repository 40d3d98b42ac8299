use crate::domain::error::ProviderError;
use crate::domain::values::market_scope::MarketScope;
use async_trait::async_trait;
use std::fmt;

/// What a news provider hands back before headline extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsPayload {
    /// Structured feed: titles, newest first.
    Titles(Vec<String>),
    /// Raw page to scrape headlines from.
    Html(String),
}

/// What to pull news for: the whole market of `scope`, or the given tickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub scope: MarketScope,
    pub symbols: Vec<String>,
}

impl NewsQuery {
    pub fn market(scope: MarketScope) -> Self {
        Self {
            scope,
            symbols: Vec::new(),
        }
    }

    pub fn for_symbols(scope: MarketScope, symbols: Vec<String>) -> Self {
        Self { scope, symbols }
    }

    pub fn is_market_wide(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for NewsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_market_wide() {
            write!(f, "{}", self.scope)
        } else {
            write!(f, "{} ({})", self.symbols.join(", "), self.scope)
        }
    }
}

/// Pluggable headline source. Implementations either call a structured feed
/// or fetch a raw page; headline filtering happens in the news source, not
/// here.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// `limit` is a hint; feed providers may use it as the page size.
    async fn fetch(&self, query: &NewsQuery, limit: usize) -> Result<NewsPayload, ProviderError>;
}
