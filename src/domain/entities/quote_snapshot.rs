use crate::domain::values::price::Price;
use serde::{Deserialize, Serialize};

/// Normalized quote for one ticker. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub display_name: String,
    pub price: Price,
    pub change_percent: f64,
    pub volume: u64,
}

impl QuoteSnapshot {
    pub fn new(
        symbol: String,
        display_name: String,
        price: Price,
        change_percent: f64,
        volume: u64,
    ) -> Self {
        Self {
            symbol,
            display_name,
            price,
            change_percent,
            volume,
        }
    }

    /// Snapshot used when the provider had nothing usable for `symbol`.
    pub fn unknown(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            display_name: symbol.clone(),
            symbol,
            price: Price::Unknown,
            change_percent: 0.0,
            volume: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        !self.price.is_known()
    }

    /// One-line rendering used in the LLM context.
    pub fn context_line(&self) -> String {
        match self.price {
            Price::Known(p) => format!(
                "{} ({}): price {:.2}, change {:+.2}%, volume {}",
                self.symbol, self.display_name, p, self.change_percent, self.volume
            ),
            Price::Unknown => format!(
                "{} ({}): price unknown",
                self.symbol, self.display_name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let q = QuoteSnapshot::unknown("TSLA");
        assert!(q.is_unknown());
        assert_eq!(q.display_name, "TSLA");
        assert_eq!(q.volume, 0);
        assert_eq!(q.change_percent, 0.0);
    }

    #[test]
    fn test_context_line() {
        let q = QuoteSnapshot::new(
            "AAPL".into(),
            "Apple Inc.".into(),
            Price::Known(150.0),
            1.2,
            1_000,
        );
        assert_eq!(
            q.context_line(),
            "AAPL (Apple Inc.): price 150.00, change +1.20%, volume 1000"
        );
        assert_eq!(
            QuoteSnapshot::unknown("X").context_line(),
            "X (X): price unknown"
        );
    }
}
