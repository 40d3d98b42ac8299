pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::news_source::NewsBatch;
use crate::application::pipeline::PipelineController;
use crate::config::{LlmBackend, NewsMode, PipelineSettings, Settings};
use crate::domain::entities::pipeline_run::{EntrySource, PipelineRun};
use crate::domain::entities::quote_snapshot::QuoteSnapshot;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::ports::news_provider::{NewsProvider, NewsQuery};
use crate::domain::ports::quote_provider::QuoteProvider;
use crate::domain::values::market_scope::MarketScope;
use crate::domain::values::symbol::normalize_symbol;
use crate::infrastructure::llm::gemini::GeminiClient;
use crate::infrastructure::llm::openai::OpenAiChat;
use crate::infrastructure::news::html_page::HtmlPageNews;
use crate::infrastructure::news::yahoo_search::YahooNewsFeed;
use crate::infrastructure::quotes::yahoo::YahooQuoteProvider;
use std::sync::Arc;

pub struct MarketBrief {
    controller: PipelineController,
}

impl MarketBrief {
    /// Wires the default adapters (Yahoo quotes, Yahoo news feed or page
    /// scraper, OpenAI or Gemini) from `settings`.
    ///
    /// A missing API key does not fail here; runs fail in `Idle` instead,
    /// so quote and headline lookups still work without one.
    pub fn new(settings: &Settings) -> Self {
        let timeout = settings.http_timeout_secs;
        let api_key = settings.llm_api_key.clone().unwrap_or_default();
        let model = Some(settings.model());

        let quotes: Arc<dyn QuoteProvider> = Arc::new(YahooQuoteProvider::new(timeout));
        let news: Arc<dyn NewsProvider> = match settings.news_mode {
            NewsMode::Feed => Arc::new(YahooNewsFeed::new(timeout)),
            NewsMode::Scrape => Arc::new(HtmlPageNews::new(timeout)),
        };
        let llm: Arc<dyn LlmProvider> = match settings.llm_backend {
            LlmBackend::OpenAi => Arc::new(OpenAiChat::new(api_key, model, timeout)),
            LlmBackend::Gemini => Arc::new(GeminiClient::new(api_key, model, timeout)),
        };

        Self::with_providers(quotes, news, llm, settings.pipeline.clone())
    }

    pub fn with_providers(
        quotes: Arc<dyn QuoteProvider>,
        news: Arc<dyn NewsProvider>,
        llm: Arc<dyn LlmProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            controller: PipelineController::new(quotes, news, llm, settings),
        }
    }

    // Delegating methods
    pub async fn analyze(&self, symbol: &str) -> PipelineRun {
        self.controller.run(EntrySource::Symbol(symbol.to_string())).await
    }

    pub async fn scan(&self, symbols: Vec<String>) -> PipelineRun {
        self.controller.run(EntrySource::Watchlist(symbols)).await
    }

    pub async fn discover(&self, scope: MarketScope) -> PipelineRun {
        self.controller.run(EntrySource::News(scope)).await
    }

    pub async fn run(&self, entry: EntrySource) -> PipelineRun {
        self.controller.run(entry).await
    }

    pub async fn quotes(&self, symbols: &[String]) -> Vec<QuoteSnapshot> {
        self.controller.quote_fetcher().fetch_all(symbols).await
    }

    pub async fn headlines(&self, scope: MarketScope, limit: Option<usize>) -> NewsBatch {
        self.news(&NewsQuery::market(scope), limit).await
    }

    /// News for specific tickers. Malformed tickers are skipped; the scope
    /// follows the first remaining one.
    pub async fn symbol_headlines(&self, symbols: &[String], limit: Option<usize>) -> NewsBatch {
        let symbols: Vec<String> = symbols
            .iter()
            .filter_map(|s| normalize_symbol(s).ok())
            .collect();
        if symbols.is_empty() {
            return NewsBatch::default();
        }
        self.news(&EntrySource::Watchlist(symbols).news_query(), limit).await
    }

    async fn news(&self, query: &NewsQuery, limit: Option<usize>) -> NewsBatch {
        let limit = limit.unwrap_or(self.controller.settings().headline_limit);
        self.controller.news_source().fetch_headlines(query, limit).await
    }
}
