use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    Watch,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
            Action::Hold => write!(f, "hold"),
            Action::Watch => write!(f, "watch"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    /// Accepts the canonical names plus the synonyms models tend to answer
    /// with, including the Traditional Chinese bullish/bearish/wait terms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s
            .trim()
            .trim_matches(|c: char| c == '*' || c == '.' || c == '"' || c == '\'')
            .to_lowercase();
        match word.as_str() {
            "buy" | "long" | "bullish" | "strong buy" | "看多" | "買進" => Ok(Action::Buy),
            "sell" | "short" | "bearish" | "strong sell" | "看空" | "賣出" => Ok(Action::Sell),
            "hold" | "持有" => Ok(Action::Hold),
            "watch" | "wait" | "neutral" | "none" | "觀望" => Ok(Action::Watch),
            _ => Err(format!("Unknown action: {s}")),
        }
    }
}
