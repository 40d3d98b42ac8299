use crate::domain::values::action::Action;
use crate::domain::values::price::PriceRange;
use serde::{Deserialize, Serialize};

/// Symbol reported when a run found nothing actionable.
pub const NO_SYMBOL: &str = "MARKET";

/// Final output of a pipeline run.
///
/// Price levels are advisory text from the model; nothing checks them
/// against live quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub action: Action,
    pub entry_price: Option<PriceRange>,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub rationale: String,
    pub risk_notes: String,
}

impl Recommendation {
    /// `Watch` recommendation carrying no price levels.
    pub fn watch(symbol: impl Into<String>, rationale: impl Into<String>, risk_notes: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            action: Action::Watch,
            entry_price: None,
            take_profit: None,
            stop_loss: None,
            rationale: rationale.into(),
            risk_notes: risk_notes.into(),
        }
    }
}
