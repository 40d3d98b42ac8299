use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tickers found in the news. An empty set means "no actionable entities",
/// which is a valid outcome and not an extraction failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub symbols: BTreeSet<String>,
}

impl ExtractedEntities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}
