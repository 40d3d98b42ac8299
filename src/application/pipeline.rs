//! Pipeline controller: sequences the stages of one recommendation run.
//!
//! `Idle -> Fetching -> Compacting -> Extracting -> Synthesizing -> Done`,
//! with `Failed` reachable from any stage. The controller holds no mutable
//! state, so concurrent runs on one controller never interact.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::compactor::{compact, compact_with_extra_quotes};
use crate::application::entity_extractor::EntityExtractor;
use crate::application::news_source::NewsSource;
use crate::application::quote_fetcher::QuoteFetcher;
use crate::application::synthesizer::Synthesizer;
use crate::config::PipelineSettings;
use crate::domain::entities::extracted_entities::ExtractedEntities;
use crate::domain::entities::pipeline_run::{EntrySource, PipelineRun};
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::ports::news_provider::NewsProvider;
use crate::domain::ports::quote_provider::QuoteProvider;
use crate::domain::values::symbol::normalize_symbol;

pub struct PipelineController {
    quotes: QuoteFetcher,
    news: NewsSource,
    extractor: EntityExtractor,
    synthesizer: Synthesizer,
    llm: Arc<dyn LlmProvider>,
    settings: PipelineSettings,
}

impl PipelineController {
    pub fn new(
        quote_provider: Arc<dyn QuoteProvider>,
        news_provider: Arc<dyn NewsProvider>,
        llm: Arc<dyn LlmProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            quotes: QuoteFetcher::new(quote_provider),
            news: NewsSource::new(news_provider),
            extractor: EntityExtractor::new(llm.clone(), settings.max_entities),
            synthesizer: Synthesizer::new(llm.clone(), settings.language),
            llm,
            settings,
        }
    }

    pub fn quote_fetcher(&self) -> &QuoteFetcher {
        &self.quotes
    }

    pub fn news_source(&self) -> &NewsSource {
        &self.news
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs the whole pipeline for `entry`. Always returns the run; check
    /// [`PipelineRun::outcome`] for the recommendation or the failure.
    pub async fn run(&self, entry: EntrySource) -> PipelineRun {
        let mut run = PipelineRun::new(entry);
        info!(run = %run.id, entry = ?run.entry, "Pipeline run started");

        // Idle: everything that can be checked without the network.
        match self.validate(&run.entry) {
            Ok(normalized) => run.entry = normalized,
            Err(e) => return self.finish_failed(run, e),
        }
        let seeds = run.entry.seeds();
        run.advance();

        // Fetching: seeded entries read their own tickers' news.
        let news_query = run.entry.news_query();
        let (quotes, batch) = tokio::join!(
            self.quotes.fetch_all(&seeds),
            self.news.fetch_headlines(&news_query, self.settings.headline_limit)
        );
        run.quotes = quotes;
        run.headlines = batch.headlines;
        run.news_error = batch.error.map(|e| e.to_string());

        if !seeds.is_empty() && run.quotes.iter().all(|q| q.is_unknown()) && run.headlines.is_empty() {
            let e = DomainError::DataUnavailable(format!(
                "no quote for {} and no headlines",
                seeds.join(", ")
            ));
            return self.finish_failed(run, e);
        }
        run.advance();

        // Compacting
        let context = compact(&run.quotes, &run.headlines, self.settings.char_budget);
        info!(
            run = %run.id,
            quotes = context.quotes.len(),
            headlines = context.headlines.len(),
            "Context compacted"
        );
        let headlines_in_context = context.headlines.clone();
        run.context = Some(context);
        run.advance();

        // Extracting
        let entities = self.extractor.extract(&headlines_in_context).await;
        run.entities = Some(entities.clone());
        run.advance();

        // Synthesizing: quote whatever the news surfaced that we have not
        // quoted yet. Those quotes only get the budget the seed quotes and
        // headlines leave over.
        let first_round = run.quotes.len();
        let quoted: HashSet<&str> = run.quotes.iter().map(|q| q.symbol.as_str()).collect();
        let second_round: Vec<String> = entities
            .symbols
            .iter()
            .filter(|s| !quoted.contains(s.as_str()))
            .cloned()
            .collect();
        if !second_round.is_empty() {
            info!(run = %run.id, symbols = ?second_round, "Fetching quotes for extracted tickers");
            let extra = self.quotes.fetch_all(&second_round).await;
            run.quotes.extend(extra);
        }
        let (seed_quotes, extra_quotes) = run.quotes.split_at(first_round);
        let context = compact_with_extra_quotes(
            seed_quotes,
            &run.headlines,
            extra_quotes,
            self.settings.char_budget,
        );

        let candidates = if seeds.is_empty() {
            entities
        } else {
            ExtractedEntities::from_symbols(seeds)
        };

        let news_available = !run.headlines.is_empty();
        let outcome = self
            .synthesizer
            .synthesize(&context, &candidates, news_available)
            .await;
        run.context = Some(context);
        match outcome {
            Ok(rec) => {
                run.recommendation = Some(rec);
                run.advance();
                info!(run = %run.id, "Pipeline run done");
                run
            }
            Err(e) => self.finish_failed(run, e),
        }
    }

    /// Normalizes the entry's tickers and checks credentials.
    fn validate(&self, entry: &EntrySource) -> Result<EntrySource, DomainError> {
        self.llm
            .check_ready()
            .map_err(|e| DomainError::ConfigurationInvalid(format!("{}: {e}", self.llm.name())))?;

        match entry {
            EntrySource::Symbol(s) => Ok(EntrySource::Symbol(normalize_symbol(s)?)),
            EntrySource::Watchlist(list) => {
                if list.is_empty() {
                    return Err(DomainError::ConfigurationInvalid("watchlist is empty".into()));
                }
                let mut normalized: Vec<String> = Vec::with_capacity(list.len());
                for s in list {
                    let s = normalize_symbol(s)?;
                    if !normalized.contains(&s) {
                        normalized.push(s);
                    }
                }
                Ok(EntrySource::Watchlist(normalized))
            }
            EntrySource::News(scope) => Ok(EntrySource::News(*scope)),
        }
    }

    fn finish_failed(&self, mut run: PipelineRun, error: DomainError) -> PipelineRun {
        warn!(run = %run.id, stage = %run.stage(), "Pipeline run failed: {error}");
        run.fail(error);
        run
    }
}
