//! Runtime settings, read from `MARKETBRIEF_*` environment variables.
//!
//! Credentials live here and are handed to the providers at construction;
//! nothing is written back to disk.

use crate::domain::error::DomainError;
use std::str::FromStr;

pub const DEFAULT_HEADLINE_LIMIT: usize = 5;
pub const DEFAULT_CHAR_BUDGET: usize = 4000;
pub const DEFAULT_MAX_ENTITIES: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAi,
    Gemini,
}

impl LlmBackend {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "gpt-4o",
            LlmBackend::Gemini => "gemini-1.5-flash",
        }
    }

    /// Vendor-specific variable checked when `MARKETBRIEF_LLM_API_KEY` is unset.
    fn vendor_key_var(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LlmBackend::OpenAi),
            "gemini" | "google" => Ok(LlmBackend::Gemini),
            _ => Err(format!("Unknown LLM provider: {s}")),
        }
    }
}

/// Whether headlines come from a structured feed or a scraped page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsMode {
    Feed,
    Scrape,
}

impl FromStr for NewsMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feed" => Ok(NewsMode::Feed),
            "scrape" | "html" => Ok(NewsMode::Scrape),
            _ => Err(format!("Unknown news mode: {s}")),
        }
    }
}

/// Language the model writes its rationale in. Output labels stay English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseLanguage {
    #[default]
    English,
    TraditionalChinese,
}

impl ResponseLanguage {
    pub fn instruction(&self) -> &'static str {
        match self {
            ResponseLanguage::English => "Write the rationale and risk notes in English.",
            ResponseLanguage::TraditionalChinese => {
                "Write the rationale and risk notes in Traditional Chinese (繁體中文)."
            }
        }
    }
}

impl FromStr for ResponseLanguage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(ResponseLanguage::English),
            "zh-tw" | "zh_tw" | "zh-hant" | "chinese" => Ok(ResponseLanguage::TraditionalChinese),
            _ => Err(format!("Unknown response language: {s}")),
        }
    }
}

/// Knobs the pipeline itself reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub headline_limit: usize,
    pub char_budget: usize,
    pub max_entities: usize,
    pub language: ResponseLanguage,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            headline_limit: DEFAULT_HEADLINE_LIMIT,
            char_budget: DEFAULT_CHAR_BUDGET,
            max_entities: DEFAULT_MAX_ENTITIES,
            language: ResponseLanguage::English,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub llm_backend: LlmBackend,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub news_mode: NewsMode,
    pub http_timeout_secs: u64,
    pub pipeline: PipelineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_backend: LlmBackend::OpenAi,
            llm_api_key: None,
            llm_model: None,
            news_mode: NewsMode::Feed,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            pipeline: PipelineSettings::default(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] over an arbitrary lookup, so tests do
    /// not have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let llm_backend = parse_or(get("MARKETBRIEF_LLM_PROVIDER"), LlmBackend::OpenAi)?;
        let llm_api_key = get("MARKETBRIEF_LLM_API_KEY").or_else(|| get(llm_backend.vendor_key_var()));

        let pipeline = PipelineSettings {
            headline_limit: parse_or(get("MARKETBRIEF_HEADLINE_LIMIT"), DEFAULT_HEADLINE_LIMIT)?,
            char_budget: parse_or(get("MARKETBRIEF_CHAR_BUDGET"), DEFAULT_CHAR_BUDGET)?,
            max_entities: parse_or(get("MARKETBRIEF_MAX_ENTITIES"), DEFAULT_MAX_ENTITIES)?,
            language: parse_or(get("MARKETBRIEF_LANGUAGE"), ResponseLanguage::English)?,
        };

        Ok(Self {
            llm_backend,
            llm_api_key,
            llm_model: get("MARKETBRIEF_LLM_MODEL"),
            news_mode: parse_or(get("MARKETBRIEF_NEWS_MODE"), NewsMode::Feed)?,
            http_timeout_secs: parse_or(get("MARKETBRIEF_HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?,
            pipeline,
        })
    }

    pub fn model(&self) -> String {
        self.llm_model
            .clone()
            .unwrap_or_else(|| self.llm_backend.default_model().to_string())
    }
}

fn parse_or<T>(value: Option<String>, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|e| DomainError::ConfigurationInvalid(format!("{v}: {e}"))),
    }
}
