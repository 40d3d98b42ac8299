//! Quote fetcher: turns provider quotes into snapshots, absorbing every
//! provider failure into the `Unknown` sentinel.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::entities::quote_snapshot::QuoteSnapshot;
use crate::domain::ports::quote_provider::{ProviderQuote, QuoteProvider};
use crate::domain::values::price::Price;
use crate::domain::values::symbol::normalize_symbol;

pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Never fails. A malformed symbol or a provider error yields
    /// [`QuoteSnapshot::unknown`]; malformed symbols skip the network call.
    pub async fn fetch(&self, symbol: &str) -> QuoteSnapshot {
        let symbol = match normalize_symbol(symbol) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping quote for {symbol:?}: {e}");
                return QuoteSnapshot::unknown(symbol.trim());
            }
        };

        match self.provider.get_quote(&symbol).await {
            Ok(raw) => {
                debug!("{} quoted {symbol}", self.provider.name());
                snapshot_from(symbol, raw)
            }
            Err(e) => {
                warn!("{} failed to quote {symbol}: {e}", self.provider.name());
                QuoteSnapshot::unknown(symbol)
            }
        }
    }

    /// Fetches every symbol concurrently. Output order matches input order.
    pub async fn fetch_all(&self, symbols: &[String]) -> Vec<QuoteSnapshot> {
        join_all(symbols.iter().map(|s| self.fetch(s))).await
    }
}

fn snapshot_from(symbol: String, raw: ProviderQuote) -> QuoteSnapshot {
    let display_name = raw
        .display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| symbol.clone());
    let change_percent = raw.change_percent.filter(|c| c.is_finite()).unwrap_or(0.0);

    QuoteSnapshot::new(
        symbol,
        display_name,
        Price::from_option(raw.price),
        change_percent,
        raw.volume.unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeQuotes {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuoteProvider for FakeQuotes {
        fn name(&self) -> &str {
            "fake"
        }

        async fn get_quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match symbol {
                "AAPL" => Ok(ProviderQuote {
                    price: Some(150.0),
                    change_percent: Some(1.2),
                    volume: Some(1_000),
                    display_name: Some("Apple Inc.".into()),
                }),
                "HALF" => Ok(ProviderQuote {
                    price: Some(10.0),
                    ..Default::default()
                }),
                _ => Err(ProviderError::Network("connection reset".into())),
            }
        }
    }

    fn fetcher() -> (QuoteFetcher, Arc<FakeQuotes>) {
        let provider = Arc::new(FakeQuotes {
            calls: AtomicUsize::new(0),
        });
        (QuoteFetcher::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_fetch_success_normalizes_symbol() {
        let (f, _) = fetcher();
        let q = f.fetch(" aapl ").await;
        assert_eq!(q.symbol, "AAPL");
        assert_eq!(q.display_name, "Apple Inc.");
        assert_eq!(q.price, Price::Known(150.0));
        assert_eq!(q.volume, 1_000);
    }

    #[tokio::test]
    async fn test_missing_fields_become_sentinels() {
        let (f, _) = fetcher();
        let q = f.fetch("HALF").await;
        assert_eq!(q.price, Price::Known(10.0));
        assert_eq!(q.display_name, "HALF");
        assert_eq!(q.change_percent, 0.0);
        assert_eq!(q.volume, 0);
    }

    #[tokio::test]
    async fn test_provider_error_yields_unknown() {
        let (f, _) = fetcher();
        let q = f.fetch("MSFT").await;
        assert_eq!(q, QuoteSnapshot::unknown("MSFT"));
    }

    #[tokio::test]
    async fn test_malformed_symbol_skips_network() {
        let (f, provider) = fetcher();
        for bad in ["", "   ", "not a ticker", "$$$"] {
            let q = f.fetch(bad).await;
            assert!(q.is_unknown());
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_order_and_isolates_failures() {
        let (f, _) = fetcher();
        let symbols: Vec<String> = vec!["MSFT".into(), "AAPL".into(), "".into()];
        let quotes = f.fetch_all(&symbols).await;
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].symbol, "MSFT");
        assert!(quotes[0].is_unknown());
        assert_eq!(quotes[1].price, Price::Known(150.0));
        assert!(quotes[2].is_unknown());
    }
}
