use crate::domain::error::ProviderError;
use crate::domain::ports::news_provider::{NewsPayload, NewsProvider, NewsQuery};
use crate::domain::values::market_scope::MarketScope;
use crate::infrastructure::http::{build_client, status_error};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

pub const DOMESTIC_NEWS_URL: &str = "https://tw.stock.yahoo.com/news/";
pub const INTERNATIONAL_NEWS_URL: &str = "https://finance.yahoo.com/topic/stock-market-news/";
/// Per-ticker pages; `{symbol}` is replaced with the ticker.
pub const DOMESTIC_SYMBOL_NEWS_URL: &str = "https://tw.stock.yahoo.com/quote/{symbol}/news";
pub const INTERNATIONAL_SYMBOL_NEWS_URL: &str = "https://finance.yahoo.com/quote/{symbol}/news/";

/// Fetches news pages and hands back the raw HTML. Headline extraction
/// happens downstream.
pub struct HtmlPageNews {
    client: reqwest::Client,
    domestic_url: String,
    international_url: String,
    domestic_symbol_url: String,
    international_symbol_url: String,
}

impl HtmlPageNews {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_urls(
            timeout_secs,
            DOMESTIC_NEWS_URL.to_string(),
            INTERNATIONAL_NEWS_URL.to_string(),
        )
    }

    pub fn with_urls(timeout_secs: u64, domestic_url: String, international_url: String) -> Self {
        Self {
            client: build_client(timeout_secs),
            domestic_url,
            international_url,
            domestic_symbol_url: DOMESTIC_SYMBOL_NEWS_URL.to_string(),
            international_symbol_url: INTERNATIONAL_SYMBOL_NEWS_URL.to_string(),
        }
    }

    fn market_url(&self, scope: MarketScope) -> &str {
        match scope {
            MarketScope::Domestic => &self.domestic_url,
            MarketScope::International => &self.international_url,
        }
    }

    /// Taiwan tickers are looked up on the Taiwan site.
    fn symbol_url(&self, symbol: &str) -> String {
        match MarketScope::for_symbol(symbol) {
            MarketScope::Domestic => self.domestic_symbol_url.replace("{symbol}", symbol),
            MarketScope::International => self.international_symbol_url.replace("{symbol}", symbol),
        }
    }

    fn urls_for(&self, query: &NewsQuery) -> Vec<String> {
        if query.is_market_wide() {
            vec![self.market_url(query.scope).to_string()]
        } else {
            query.symbols.iter().map(|s| self.symbol_url(s)).collect()
        }
    }

    async fn page(&self, url: &str) -> Result<String, ProviderError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl NewsProvider for HtmlPageNews {
    fn name(&self) -> &str {
        "html_page"
    }

    /// Pages are concatenated in query order so the scraper sees one
    /// document.
    async fn fetch(&self, query: &NewsQuery, _limit: usize) -> Result<NewsPayload, ProviderError> {
        let urls = self.urls_for(query);
        let pages = join_all(urls.iter().map(|u| self.page(u))).await;

        let mut html = String::new();
        let mut last_error = None;
        for (url, page) in urls.iter().zip(pages) {
            match page {
                Ok(body) => {
                    html.push_str(&body);
                    html.push('\n');
                }
                Err(e) => {
                    warn!("News page {url} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        if html.trim().is_empty() {
            return Err(last_error.unwrap_or_else(|| ProviderError::Empty(format!("empty page for {query}"))));
        }
        Ok(NewsPayload::Html(html))
    }
}
