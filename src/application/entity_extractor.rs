//! Entity extraction: asks the LLM which tickers the headlines are about.
//!
//! This stage never fails the run: provider errors and unusable answers
//! degrade to the empty set.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::prompts::{entity_extraction_prompt, ENTITY_DELIMITER, NONE_SENTINEL};
use crate::domain::entities::extracted_entities::ExtractedEntities;
use crate::domain::entities::headline::Headline;
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::{LlmProvider, ModelConfig};
use crate::domain::values::symbol::is_valid_symbol;

pub struct EntityExtractor {
    llm: Arc<dyn LlmProvider>,
    max_entities: usize,
}

impl EntityExtractor {
    pub fn new(llm: Arc<dyn LlmProvider>, max_entities: usize) -> Self {
        Self { llm, max_entities }
    }

    pub async fn extract(&self, headlines: &[Headline]) -> ExtractedEntities {
        if headlines.is_empty() {
            info!("No headlines to extract entities from");
            return ExtractedEntities::none();
        }

        let prompt = entity_extraction_prompt(headlines, self.max_entities);
        let response = match self.llm.generate(&prompt, &ModelConfig::extraction()).await {
            Ok(text) => text,
            Err(e) => {
                let err = DomainError::ExtractionAmbiguous(format!("{}: {e}", self.llm.name()));
                warn!("{err}; continuing with no entities");
                return ExtractedEntities::none();
            }
        };

        match parse_entities(&response, self.max_entities) {
            Ok(entities) => {
                info!("Extracted {} entities: {:?}", entities.len(), entities.symbols);
                entities
            }
            Err(err) => {
                warn!("{err}; continuing with no entities");
                ExtractedEntities::none()
            }
        }
    }
}

/// Parses an extraction answer.
///
/// Splits on the delimiter (newlines count too), trims each token and drops
/// empty ones. `NONE` anywhere in the answer, as a token or as a word inside
/// one and in any casing, makes the whole answer the empty set. Tokens that do not look like tickers are skipped; if nothing
/// usable is left the answer is `ExtractionAmbiguous`. At most
/// `max_entities` symbols are kept, in order of first appearance.
pub fn parse_entities(response: &str, max_entities: usize) -> Result<ExtractedEntities, DomainError> {
    let tokens: Vec<String> = response
        .split(|c| c == ENTITY_DELIMITER || c == '\n')
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| mentions_none(t)) {
        return Ok(ExtractedEntities::none());
    }

    let mut ordered: Vec<String> = Vec::new();
    for token in &tokens {
        let symbol = token.to_uppercase();
        if is_valid_symbol(&symbol) && !ordered.contains(&symbol) {
            ordered.push(symbol);
        }
    }

    if ordered.is_empty() {
        return Err(DomainError::ExtractionAmbiguous(format!(
            "no ticker in model answer {:?}",
            truncate(response, 80)
        )));
    }

    ordered.truncate(max_entities);
    Ok(ExtractedEntities {
        symbols: ordered.into_iter().collect::<BTreeSet<_>>(),
    })
}

/// True when any word of `token` is the sentinel, e.g. `MSFT NONE` or
/// `None of the others apply`.
fn mentions_none(token: &str) -> bool {
    token
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w.eq_ignore_ascii_case(NONE_SENTINEL))
}

fn clean_token(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '[' | ']' | '(' | ')' | '*' | '.' | ';')
        })
        .to_string()
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
