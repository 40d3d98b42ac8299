use crate::domain::entities::compacted_context::CompactedContext;
use crate::domain::entities::extracted_entities::ExtractedEntities;
use crate::domain::entities::headline::Headline;
use crate::domain::entities::quote_snapshot::QuoteSnapshot;
use crate::domain::entities::recommendation::Recommendation;
use crate::domain::error::DomainError;
use crate::domain::ports::news_provider::NewsQuery;
use crate::domain::values::market_scope::MarketScope;
use crate::domain::values::stage::Stage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// How a run picks the tickers it starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum EntrySource {
    /// Analyze one explicit ticker.
    Symbol(String),
    /// Scan a fixed watchlist and pick the best opportunity.
    Watchlist(Vec<String>),
    /// Let the news decide which tickers matter.
    News(MarketScope),
}

impl EntrySource {
    /// Tickers quoted before any news is read.
    pub fn seeds(&self) -> Vec<String> {
        match self {
            EntrySource::Symbol(s) => vec![s.clone()],
            EntrySource::Watchlist(v) => v.clone(),
            EntrySource::News(_) => Vec::new(),
        }
    }

    /// Which news scope to pull headlines from. Seeded entries follow the
    /// first ticker's exchange.
    pub fn news_scope(&self) -> MarketScope {
        match self {
            EntrySource::Symbol(s) => MarketScope::for_symbol(s),
            EntrySource::Watchlist(v) => v
                .first()
                .map(|s| MarketScope::for_symbol(s))
                .unwrap_or(MarketScope::International),
            EntrySource::News(scope) => *scope,
        }
    }

    /// News request for this entry: the seed tickers' own news, or the
    /// whole market for news-driven discovery.
    pub fn news_query(&self) -> NewsQuery {
        NewsQuery::for_symbols(self.news_scope(), self.seeds())
    }
}

/// The stage a run died in, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    #[serde(serialize_with = "serialize_error")]
    pub error: DomainError,
}

fn serialize_error<S: serde::Serializer>(e: &DomainError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&e.to_string())
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for StageFailure {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum RunState {
    Running { stage: Stage },
    Done,
    Failed(StageFailure),
}

/// Everything one pipeline run produced, stage by stage.
///
/// Fields filled before a failure stay populated so callers can show what
/// was gathered.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub id: String,
    pub entry: EntrySource,
    pub started_at: DateTime<Utc>,
    pub state: RunState,
    pub quotes: Vec<QuoteSnapshot>,
    pub headlines: Vec<Headline>,
    pub news_error: Option<String>,
    pub context: Option<CompactedContext>,
    pub entities: Option<ExtractedEntities>,
    pub recommendation: Option<Recommendation>,
}

impl PipelineRun {
    pub fn new(entry: EntrySource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entry,
            started_at: Utc::now(),
            state: RunState::Running { stage: Stage::Idle },
            quotes: Vec::new(),
            headlines: Vec::new(),
            news_error: None,
            context: None,
            entities: None,
            recommendation: None,
        }
    }

    /// Current stage; for a failed run, the stage that failed.
    pub fn stage(&self) -> Stage {
        match &self.state {
            RunState::Running { stage } => *stage,
            RunState::Done => Stage::Done,
            RunState::Failed(f) => f.stage,
        }
    }

    /// Moves to the next stage. Returns false when the run is already
    /// terminal.
    pub(crate) fn advance(&mut self) -> bool {
        let RunState::Running { stage } = self.state else {
            return false;
        };
        self.state = match stage.next() {
            Some(Stage::Done) | None => RunState::Done,
            Some(next) => RunState::Running { stage: next },
        };
        true
    }

    pub(crate) fn fail(&mut self, error: DomainError) {
        if let RunState::Running { stage } = self.state {
            self.state = RunState::Failed(StageFailure { stage, error });
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, RunState::Done)
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match &self.state {
            RunState::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// The recommendation, or the failure that prevented it. A run that has
    /// not reached `Done` reports its current stage as incomplete.
    pub fn outcome(&self) -> Result<&Recommendation, StageFailure> {
        if let Some(f) = self.failure() {
            return Err(f.clone());
        }
        self.recommendation.as_ref().ok_or_else(|| StageFailure {
            stage: self.stage(),
            error: DomainError::SynthesisFailed("run has not completed".into()),
        })
    }
}
