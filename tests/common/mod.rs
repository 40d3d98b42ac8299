//! Shared test helpers: in-memory providers.

#![allow(dead_code)]

use async_trait::async_trait;
use marketbrief::config::PipelineSettings;
use marketbrief::domain::error::ProviderError;
use marketbrief::domain::ports::llm_provider::{LlmProvider, ModelConfig};
use marketbrief::domain::ports::news_provider::{NewsPayload, NewsProvider, NewsQuery};
use marketbrief::domain::ports::quote_provider::{ProviderQuote, QuoteProvider};
use marketbrief::MarketBrief;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Quotes from a fixed table; unknown symbols fail like a provider outage.
#[derive(Default)]
pub struct StaticQuotes {
    table: HashMap<String, ProviderQuote>,
    pub calls: AtomicUsize,
}

impl StaticQuotes {
    pub fn with(mut self, symbol: &str, name: &str, price: f64, change_percent: f64) -> Self {
        self.table.insert(
            symbol.to_string(),
            ProviderQuote {
                price: Some(price),
                change_percent: Some(change_percent),
                volume: Some(1_000_000),
                display_name: Some(name.to_string()),
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for StaticQuotes {
    fn name(&self) -> &str {
        "static_quotes"
    }

    async fn get_quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::Status {
                status: 404,
                body: format!("no quote for {symbol}"),
            })
    }
}

/// Returns the same payload (or error) for every query, and records the
/// queries it was asked.
pub struct StaticNews {
    result: Result<NewsPayload, ProviderError>,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<NewsQuery>>,
}

impl StaticNews {
    pub fn titles(titles: &[&str]) -> Self {
        Self {
            result: Ok(NewsPayload::Titles(titles.iter().map(|t| t.to_string()).collect())),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn html(page: &str) -> Self {
        Self {
            result: Ok(NewsPayload::Html(page.to_string())),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(ProviderError::Network("connection refused".into())),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<NewsQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsProvider for StaticNews {
    fn name(&self) -> &str {
        "static_news"
    }

    async fn fetch(&self, query: &NewsQuery, _limit: usize) -> Result<NewsPayload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        self.result.clone()
    }
}

type Responder = Box<dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync>;

enum Script {
    Sequence(Mutex<VecDeque<Result<String, ProviderError>>>),
    Respond(Responder),
}

/// LLM double. Either replays a fixed sequence of answers or answers from a
/// function of the prompt. Every prompt is recorded.
pub struct ScriptedLlm {
    script: Script,
    ready: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn sequence(answers: Vec<Result<&str, ProviderError>>) -> Self {
        Self {
            script: Script::Sequence(Mutex::new(
                answers.into_iter().map(|a| a.map(str::to_string)).collect(),
            )),
            ready: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn respond<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            script: Script::Respond(Box::new(f)),
            ready: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credentials(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    fn check_ready(&self) -> Result<(), ProviderError> {
        if self.ready {
            Ok(())
        } else {
            Err(ProviderError::Config("API key is not set".into()))
        }
    }

    async fn generate(&self, prompt: &str, _config: &ModelConfig) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Sequence(queue) => queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".into()))),
            Script::Respond(f) => f(prompt),
        }
    }
}

pub fn is_extraction_prompt(prompt: &str) -> bool {
    prompt.starts_with("You identify tradable instruments")
}

pub fn setup(
    quotes: Arc<StaticQuotes>,
    news: Arc<StaticNews>,
    llm: Arc<ScriptedLlm>,
) -> MarketBrief {
    setup_with(quotes, news, llm, PipelineSettings::default())
}

pub fn setup_with(
    quotes: Arc<StaticQuotes>,
    news: Arc<StaticNews>,
    llm: Arc<ScriptedLlm>,
    settings: PipelineSettings,
) -> MarketBrief {
    MarketBrief::with_providers(quotes, news, llm, settings)
}
