use crate::domain::error::ProviderError;
use crate::domain::ports::news_provider::{NewsPayload, NewsProvider, NewsQuery};
use crate::domain::values::market_scope::MarketScope;
use crate::infrastructure::http::{build_client, status_error};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Structured headline feed backed by the Yahoo Finance search endpoint.
pub struct YahooNewsFeed {
    client: reqwest::Client,
    base_url: String,
}

impl YahooNewsFeed {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(timeout_secs: u64, base_url: String) -> Self {
        Self {
            client: build_client(timeout_secs),
            base_url,
        }
    }

    /// One search term per ticker, or a single market-wide term.
    fn search_terms(query: &NewsQuery) -> Vec<String> {
        if !query.is_market_wide() {
            return query.symbols.clone();
        }
        let term = match query.scope {
            MarketScope::Domestic => "Taiwan stock market",
            MarketScope::International => "stock market",
        };
        vec![term.to_string()]
    }

    async fn search(&self, term: &str, limit: usize) -> Result<SearchResponse, ProviderError> {
        let resp = self
            .client
            .get(format!("{}/v1/finance/search", self.base_url))
            .query(&[
                ("q", term.to_string()),
                ("quotesCount", "0".to_string()),
                ("newsCount", limit.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.json().await?)
    }
}

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    provider_publish_time: Option<i64>,
}

#[async_trait]
impl NewsProvider for YahooNewsFeed {
    fn name(&self) -> &str {
        "yahoo_news_feed"
    }

    /// A ticker whose search fails is skipped; the fetch only fails when
    /// every search does.
    async fn fetch(&self, query: &NewsQuery, limit: usize) -> Result<NewsPayload, ProviderError> {
        let terms = Self::search_terms(query);
        let results = join_all(terms.iter().map(|t| self.search(t, limit))).await;

        let mut news = Vec::new();
        let mut last_error = None;
        for (term, result) in terms.iter().zip(results) {
            match result {
                Ok(data) => news.extend(data.news),
                Err(e) => {
                    warn!("News search for {term:?} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if news.is_empty() => Err(e),
            _ => Ok(NewsPayload::Titles(titles_newest_first(SearchResponse { news }))),
        }
    }
}

/// Items without a timestamp keep their relative order after dated ones.
fn titles_newest_first(data: SearchResponse) -> Vec<String> {
    let mut items: Vec<(Option<i64>, String)> = data
        .news
        .into_iter()
        .filter_map(|n| n.title.map(|t| (n.provider_publish_time, t)))
        .collect();
    items.sort_by(|a, b| b.0.cmp(&a.0));
    items.into_iter().map(|(_, t)| t).collect()
}
