use crate::domain::entities::headline::Headline;
use crate::domain::entities::quote_snapshot::QuoteSnapshot;
use serde::Serialize;

pub const QUOTES_HEADER: &str = "QUOTES";
pub const HEADLINES_HEADER: &str = "HEADLINES";

/// Quotes and headlines that fit inside `char_budget` once rendered.
///
/// Only [`crate::application::compactor::compact`] builds these, so
/// `render().chars().count() <= char_budget` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactedContext {
    pub quotes: Vec<QuoteSnapshot>,
    pub headlines: Vec<Headline>,
    pub char_budget: usize,
}

impl CompactedContext {
    pub(crate) fn new(
        quotes: Vec<QuoteSnapshot>,
        headlines: Vec<Headline>,
        char_budget: usize,
    ) -> Self {
        Self {
            quotes,
            headlines,
            char_budget,
        }
    }

    /// Serialized context. A section header is only emitted when its
    /// section has at least one line.
    pub fn render(&self) -> String {
        render_parts(&self.quotes, &self.headlines)
    }
}

pub(crate) fn render_parts(quotes: &[QuoteSnapshot], headlines: &[Headline]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(quotes.len() + headlines.len() + 2);
    if !quotes.is_empty() {
        lines.push(QUOTES_HEADER.to_string());
        lines.extend(quotes.iter().map(QuoteSnapshot::context_line));
    }
    if !headlines.is_empty() {
        lines.push(HEADLINES_HEADER.to_string());
        lines.extend(headlines.iter().map(Headline::context_line));
    }
    lines.join("\n")
}
