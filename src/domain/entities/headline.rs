use crate::domain::values::market_scope::MarketScope;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub text: String,
    pub source_market: MarketScope,
}

impl Headline {
    pub fn new(text: impl Into<String>, source_market: MarketScope) -> Self {
        Self {
            text: text.into(),
            source_market,
        }
    }

    pub fn context_line(&self) -> String {
        format!("- [{}] {}", self.source_market, self.text)
    }
}
