//! Recommendation synthesis: the second LLM call.
//!
//! The model is asked for labelled lines (`SYMBOL:`, `ACTION:`, ...), and
//! [`parse_recommendation`] reads them back leniently. Price levels in the
//! answer are taken as given.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{info, warn};

use crate::application::prompts::recommendation_prompt;
use crate::config::ResponseLanguage;
use crate::domain::entities::compacted_context::CompactedContext;
use crate::domain::entities::extracted_entities::ExtractedEntities;
use crate::domain::entities::recommendation::{Recommendation, NO_SYMBOL};
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::{LlmProvider, ModelConfig};
use crate::domain::values::action::Action;
use crate::domain::values::price::PriceRange;

pub const NO_NEWS_NOTE: &str = "No recent news headlines were available for this analysis.";
pub const NO_SIGNAL_RATIONALE: &str =
    "No actionable opportunity: the news did not point at any specific ticker, so there is no signal to trade on.";
pub const NO_SIGNAL_RISK: &str = "Acting without a clear signal exposes the position to unmanaged risk.";

static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[\s\-*#>]*(?:\d+[.)]\s*)?\**\s*(symbol|ticker|action|entry(?:[ _]price)?|target|take[ _-]?profit|stop(?:[ _-]?loss)?|rationale|reason|risks?(?:[ _]notes?)?)\s*\**\s*[:：]\s*\**\s*(.*)$",
    )
    .expect("static regex")
});
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("static regex"));

pub struct Synthesizer {
    llm: Arc<dyn LlmProvider>,
    language: ResponseLanguage,
}

impl Synthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>, language: ResponseLanguage) -> Self {
        Self { llm, language }
    }

    /// Produces one recommendation for the candidates in `entities`.
    ///
    /// With no candidates the model is still asked, but the result is always
    /// `Watch` and a provider failure falls back to a fixed explanation.
    /// With candidates, a provider failure or blank answer is
    /// `SynthesisFailed`. When `news_available` is false the rationale
    /// opens with [`NO_NEWS_NOTE`].
    pub async fn synthesize(
        &self,
        context: &CompactedContext,
        entities: &ExtractedEntities,
        news_available: bool,
    ) -> Result<Recommendation, DomainError> {
        let focus: Vec<String> = entities.symbols.iter().cloned().collect();
        let prompt = recommendation_prompt(context, &focus, news_available, self.language);

        let answer = self
            .llm
            .generate(&prompt, &ModelConfig::synthesis())
            .await
            .map_err(|e| DomainError::SynthesisFailed(format!("{}: {e}", self.llm.name())))
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(DomainError::SynthesisFailed(format!(
                        "{} returned an empty response",
                        self.llm.name()
                    )))
                } else {
                    Ok(text)
                }
            });

        let mut rec = match (answer, focus.is_empty()) {
            (Ok(text), false) => parse_recommendation(&text, &focus),
            (Ok(text), true) => no_signal_from(parse_recommendation(&text, &focus)),
            (Err(e), false) => return Err(e),
            (Err(e), true) => {
                warn!("{e}; using the fixed no-signal recommendation");
                Recommendation::watch(NO_SYMBOL, NO_SIGNAL_RATIONALE, NO_SIGNAL_RISK)
            }
        };

        if !news_available {
            rec.rationale = format!("{NO_NEWS_NOTE} {}", rec.rationale);
        }

        info!("Recommendation for {}: {}", rec.symbol, rec.action);
        Ok(rec)
    }
}

/// Forces a parsed answer into the no-signal shape.
fn no_signal_from(parsed: Recommendation) -> Recommendation {
    let rationale = if parsed.rationale.trim().is_empty() {
        NO_SIGNAL_RATIONALE.to_string()
    } else {
        parsed.rationale
    };
    let risk = if parsed.risk_notes.trim().is_empty() {
        NO_SIGNAL_RISK.to_string()
    } else {
        parsed.risk_notes
    };
    Recommendation::watch(NO_SYMBOL, rationale, risk)
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Symbol,
    Action,
    Entry,
    Target,
    Stop,
    Rationale,
    Risk,
}

impl Field {
    fn from_label(label: &str) -> Self {
        let l = label.to_lowercase();
        if l == "symbol" || l == "ticker" {
            Field::Symbol
        } else if l == "action" {
            Field::Action
        } else if l.starts_with("entry") {
            Field::Entry
        } else if l == "target" || l.starts_with("take") {
            Field::Target
        } else if l.starts_with("stop") {
            Field::Stop
        } else if l.starts_with("risk") {
            Field::Risk
        } else {
            Field::Rationale
        }
    }
}

/// Reads a labelled answer into a recommendation.
///
/// `focus` is the candidate list; a `SYMBOL` outside it is replaced by the
/// first candidate (or [`NO_SYMBOL`] when there are none). A missing or
/// unreadable action becomes `Watch`. Without a `RATIONALE` line, the whole
/// answer is used as rationale.
pub fn parse_recommendation(text: &str, focus: &[String]) -> Recommendation {
    let mut symbol: Option<String> = None;
    let mut action: Option<Action> = None;
    let mut entry: Option<PriceRange> = None;
    let mut target: Option<f64> = None;
    let mut stop: Option<f64> = None;
    let mut rationale: Vec<String> = Vec::new();
    let mut risk: Vec<String> = Vec::new();
    let mut current: Option<Field> = None;

    for line in text.lines() {
        if let Some(caps) = LABEL_LINE.captures(line) {
            let field = Field::from_label(&caps[1]);
            let value = caps[2].trim().trim_end_matches('*').trim().to_string();
            current = Some(field);
            match field {
                Field::Symbol => symbol = Some(value),
                Field::Action => action = parse_action(&value),
                Field::Entry => entry = parse_range(&value),
                Field::Target => target = first_number(&value),
                Field::Stop => stop = first_number(&value),
                Field::Rationale => push_nonempty(&mut rationale, &value),
                Field::Risk => push_nonempty(&mut risk, &value),
            }
            continue;
        }
        match current {
            Some(Field::Rationale) => push_nonempty(&mut rationale, line.trim()),
            Some(Field::Risk) => push_nonempty(&mut risk, line.trim()),
            _ => {}
        }
    }

    let symbol = symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| focus.iter().any(|f| f == s))
        .or_else(|| focus.first().cloned())
        .unwrap_or_else(|| NO_SYMBOL.to_string());

    let rationale = if rationale.is_empty() {
        text.trim().to_string()
    } else {
        rationale.join("\n")
    };

    Recommendation {
        symbol,
        action: action.unwrap_or(Action::Watch),
        entry_price: entry,
        take_profit: target,
        stop_loss: stop,
        rationale,
        risk_notes: risk.join("\n"),
    }
}

fn push_nonempty(lines: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        lines.push(value.to_string());
    }
}

/// Words that turn "buy" into "do not buy".
const NEGATIONS: [&str; 7] = ["not", "no", "don", "dont", "never", "avoid", "without"];

/// The whole value first, then a single action word inside a sentence. A
/// negated sentence reads as no action.
fn parse_action(value: &str) -> Option<Action> {
    if let Ok(a) = value.parse() {
        return Some(a);
    }
    let words: Vec<String> = value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    if words.iter().any(|w| NEGATIONS.contains(&w.as_str())) {
        return None;
    }
    words.iter().find_map(|w| w.parse().ok())
}

fn is_not_applicable(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v.is_empty() || v.starts_with("n/a") || v == "na" || v.starts_with("none") || v == "-"
}

fn numbers(value: &str) -> Vec<f64> {
    if is_not_applicable(value) {
        return Vec::new();
    }
    NUMBER
        .find_iter(value)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0)
        .collect()
}

fn first_number(value: &str) -> Option<f64> {
    numbers(value).into_iter().next()
}

fn parse_range(value: &str) -> Option<PriceRange> {
    match numbers(value).as_slice() {
        [] => None,
        [single] => Some(PriceRange::single(*single)),
        [a, b, ..] => Some(PriceRange::new(*a, *b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    const ANSWER: &str = "SYMBOL: AAPL\n\
        ACTION: BUY\n\
        ENTRY: 148.50 - 151\n\
        TARGET: $165\n\
        STOP: 142.00\n\
        RATIONALE: Earnings beat and raised guidance.\n\
        Services revenue keeps compounding.\n\
        RISK: Valuation is stretched.\n";

    #[test]
    fn test_parses_full_answer() {
        let rec = parse_recommendation(ANSWER, &focus(&["AAPL"]));
        assert_eq!(rec.symbol, "AAPL");
        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.entry_price, Some(PriceRange::new(148.5, 151.0)));
        assert_eq!(rec.take_profit, Some(165.0));
        assert_eq!(rec.stop_loss, Some(142.0));
        assert_eq!(
            rec.rationale,
            "Earnings beat and raised guidance.\nServices revenue keeps compounding."
        );
        assert_eq!(rec.risk_notes, "Valuation is stretched.");
    }

    #[test]
    fn test_markdown_and_synonyms() {
        let text = "**Symbol:** msft\n- **Action**: Bullish\n**Entry Price:** 1,050\n**Stop Loss:** N/A\n**Risks:** rates";
        let rec = parse_recommendation(text, &focus(&["AAPL", "MSFT"]));
        assert_eq!(rec.symbol, "MSFT");
        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.entry_price, Some(PriceRange::single(1050.0)));
        assert_eq!(rec.stop_loss, None);
        assert_eq!(rec.risk_notes, "rates");
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_first_candidate() {
        let rec = parse_recommendation("SYMBOL: GME\nACTION: SELL", &focus(&["AAPL", "MSFT"]));
        assert_eq!(rec.symbol, "AAPL");
        assert_eq!(rec.action, Action::Sell);
    }

    #[test]
    fn test_free_text_answer() {
        let text = "The outlook is mixed; I would wait.";
        let rec = parse_recommendation(text, &[]);
        assert_eq!(rec.symbol, NO_SYMBOL);
        assert_eq!(rec.action, Action::Watch);
        assert_eq!(rec.rationale, text);
        assert_eq!(rec.entry_price, None);
    }

    #[test]
    fn test_chinese_action_and_fullwidth_colon() {
        let rec = parse_recommendation("ACTION：看空\nRATIONALE：外資賣超", &focus(&["2330.TW"]));
        assert_eq!(rec.action, Action::Sell);
        assert_eq!(rec.rationale, "外資賣超");
        assert_eq!(rec.symbol, "2330.TW");
    }

    #[test]
    fn test_action_inside_sentence() {
        assert_eq!(parse_action("We recommend to HOLD for now"), Some(Action::Hold));
        assert_eq!(parse_action("unclear"), None);
    }

    #[test]
    fn test_negated_action_is_not_taken() {
        assert_eq!(parse_action("do not buy yet"), None);
        assert_eq!(parse_action("Don't sell into weakness"), None);
        assert_eq!(parse_action("avoid buying here"), None);
        let rec = parse_recommendation("ACTION: do not buy yet", &focus(&["AAPL"]));
        assert_eq!(rec.action, Action::Watch);
    }
}
