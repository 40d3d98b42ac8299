//! Ticker normalisation and validation.

use crate::domain::error::DomainError;

/// Longest ticker accepted, suffix included (e.g. "BRK-B", "2330.TW", "^TWII").
pub const MAX_SYMBOL_LEN: usize = 20;

/// Trims and upper-cases `raw`, then checks it looks like an
/// exchange-qualified ticker.
pub fn normalize_symbol(raw: &str) -> Result<String, DomainError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(DomainError::ConfigurationInvalid(
            "ticker symbol is empty".into(),
        ));
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(DomainError::ConfigurationInvalid(format!(
            "ticker symbol too long: {symbol}"
        )));
    }
    if !is_valid_symbol(&symbol) {
        return Err(DomainError::ConfigurationInvalid(format!(
            "malformed ticker symbol: {raw}"
        )));
    }
    Ok(symbol)
}

/// Shape check on an already upper-cased symbol.
pub fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_uppercase() || first.is_ascii_digit() || first == '^') {
        return false;
    }
    symbol.chars().count() <= MAX_SYMBOL_LEN
        && chars.all(|c| {
            c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '=' | '^')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_exchange_qualified() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("2330.tw").unwrap(), "2330.TW");
        assert_eq!(normalize_symbol("^TWII").unwrap(), "^TWII");
        assert_eq!(normalize_symbol("BRK-B").unwrap(), "BRK-B");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
        assert!(normalize_symbol("APPLE INC").is_err());
        assert!(normalize_symbol(".TW").is_err());
        assert!(normalize_symbol("ABCDEFGHIJKLMNOPQRSTUVWXYZ").is_err());
    }

    #[test]
    fn test_is_valid_symbol_requires_uppercase() {
        assert!(is_valid_symbol("MSFT"));
        assert!(!is_valid_symbol("msft"));
        assert!(!is_valid_symbol("NONE!"));
    }
}
