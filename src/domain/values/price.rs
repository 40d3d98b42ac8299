use serde::{Deserialize, Serialize};
use std::fmt;

/// Last traded price, or `Unknown` when the provider had nothing usable.
///
/// `Unknown` is a sentinel, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Price {
    Known(f64),
    #[default]
    Unknown,
}

impl Price {
    /// Builds a price from an optional provider value. Non-finite or
    /// non-positive values collapse to `Unknown`.
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Price::Known(v),
            _ => Price::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Price::Known(_))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Known(v) => write!(f, "{v:.2}"),
            Price::Unknown => write!(f, "unknown"),
        }
    }
}

/// Inclusive entry price band. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn single(price: f64) -> Self {
        Self { low: price, high: price }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{:.2}", self.low)
        } else {
            write!(f, "{:.2}-{:.2}", self.low, self.high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option_sentinels() {
        assert_eq!(Price::from_option(Some(150.0)), Price::Known(150.0));
        assert_eq!(Price::from_option(None), Price::Unknown);
        assert_eq!(Price::from_option(Some(f64::NAN)), Price::Unknown);
        assert_eq!(Price::from_option(Some(0.0)), Price::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::Known(12.345).to_string(), "12.35");
        assert_eq!(Price::Unknown.to_string(), "unknown");
        assert_eq!(PriceRange::new(151.0, 148.5).to_string(), "148.50-151.00");
        assert_eq!(PriceRange::single(10.0).to_string(), "10.00");
    }
}
