//! Prompt templates for the two LLM stages.

use crate::config::ResponseLanguage;
use crate::domain::entities::compacted_context::CompactedContext;
use crate::domain::entities::headline::Headline;

/// Token the extraction model answers with when no ticker is actionable.
pub const NONE_SENTINEL: &str = "NONE";

/// Delimiter between tickers in the extraction answer.
pub const ENTITY_DELIMITER: char = ',';

pub fn entity_extraction_prompt(headlines: &[Headline], max_entities: usize) -> String {
    let mut news = String::new();
    for h in headlines {
        news.push_str(&h.context_line());
        news.push('\n');
    }

    format!(
        "You identify tradable instruments mentioned in financial news.\n\
         \n\
         Headlines (newest first):\n\
         {news}\n\
         List at most {max_entities} ticker symbols that these headlines are \
         actionable for. Use canonical exchange-qualified tickers as Yahoo \
         Finance writes them (e.g. AAPL, 2330.TW, 6488.TWO).\n\
         Answer with the tickers separated by \"{ENTITY_DELIMITER}\" and nothing else.\n\
         If no headline points at a specific tradable instrument, answer exactly {NONE_SENTINEL}."
    )
}

/// `news_available` is whether any headline was fetched at all; headlines
/// dropped by the budget do not count as missing news.
pub fn recommendation_prompt(
    context: &CompactedContext,
    focus: &[String],
    news_available: bool,
    language: ResponseLanguage,
) -> String {
    let rendered = context.render();
    let context_block = if rendered.is_empty() {
        "(no market data available)".to_string()
    } else {
        rendered
    };

    let news_note = if news_available {
        ""
    } else {
        "No recent headlines were available; say so and weigh the quote data accordingly.\n"
    };

    let task = if focus.is_empty() {
        "No ticker stood out in the news. Declare that there is no actionable \
         opportunity today, use ACTION: WATCH, SYMBOL: N/A and N/A for all price levels."
            .to_string()
    } else {
        format!(
            "Candidate tickers: {}.\n\
             Pick the single most actionable candidate and give today's strategy for it.",
            focus.join(", ")
        )
    };

    format!(
        "You are a senior investment analyst.\n\
         \n\
         Market context:\n\
         {context_block}\n\
         \n\
         {task}\n\
         {news_note}\
         {language}\n\
         \n\
         Reply using exactly these labelled lines:\n\
         SYMBOL: <ticker>\n\
         ACTION: <BUY | SELL | HOLD | WATCH>\n\
         ENTRY: <price or low-high range, or N/A>\n\
         TARGET: <take-profit price, or N/A>\n\
         STOP: <stop-loss price, or N/A>\n\
         RATIONALE: <why, combining the news and market mood>\n\
         RISK: <main risks to this view>",
        language = language.instruction(),
    )
}
