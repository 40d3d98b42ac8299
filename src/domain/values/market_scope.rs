use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which market a headline (or a news request) covers.
///
/// `Domestic` is the Taiwan market; `International` is everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketScope {
    Domestic,
    International,
}

const DOMESTIC_SUFFIXES: [&str; 2] = [".TW", ".TWO"];

impl MarketScope {
    /// Scope implied by a ticker's exchange suffix.
    pub fn for_symbol(symbol: &str) -> Self {
        let upper = symbol.trim().to_uppercase();
        if DOMESTIC_SUFFIXES.iter().any(|s| upper.ends_with(s)) {
            MarketScope::Domestic
        } else {
            MarketScope::International
        }
    }
}

impl fmt::Display for MarketScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketScope::Domestic => write!(f, "domestic"),
            MarketScope::International => write!(f, "international"),
        }
    }
}

impl FromStr for MarketScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "domestic" | "tw" => Ok(MarketScope::Domestic),
            "international" | "intl" | "us" => Ok(MarketScope::International),
            _ => Err(format!("Unknown market scope: {s}")),
        }
    }
}
