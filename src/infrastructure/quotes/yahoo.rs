use crate::domain::error::ProviderError;
use crate::domain::ports::quote_provider::{ProviderQuote, QuoteProvider};
use crate::infrastructure::http::{build_client, status_error};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance quotes via the v8 chart API (no auth required).
pub struct YahooQuoteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooQuoteProvider {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(timeout_secs: u64, base_url: String) -> Self {
        Self {
            client: build_client(timeout_secs),
            base_url,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, serde::Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    regular_market_volume: Option<u64>,
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn get_quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError> {
        let url = format!(
            "{}/v8/finance/chart/{symbol}?range=1d&interval=1d",
            self.base_url
        );

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let data: ChartResponse = resp.json().await?;
        quote_from_chart(data)
    }
}

fn quote_from_chart(data: ChartResponse) -> Result<ProviderQuote, ProviderError> {
    if let Some(err) = data.chart.error.filter(|e| !e.is_null()) {
        return Err(ProviderError::Parse(format!("Yahoo error: {err}")));
    }

    let meta = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ProviderError::Empty("no chart results".into()))?
        .meta;

    let change_percent = match (meta.regular_market_price, meta.chart_previous_close) {
        (Some(price), Some(prev)) if prev > 0.0 => Some((price - prev) / prev * 100.0),
        _ => None,
    };

    Ok(ProviderQuote {
        price: meta.regular_market_price,
        change_percent,
        volume: meta.regular_market_volume,
        display_name: meta.short_name.or(meta.long_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ProviderQuote, ProviderError> {
        quote_from_chart(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(YahooQuoteProvider::new(5).name(), "yahoo_finance");
    }

    #[test]
    fn test_chart_meta_to_quote() {
        let q = parse(
            r#"{"chart":{"result":[{"meta":{"symbol":"AAPL","shortName":"Apple Inc.",
                "regularMarketPrice":151.8,"chartPreviousClose":150.0,
                "regularMarketVolume":1234}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(q.price, Some(151.8));
        assert!((q.change_percent.unwrap() - 1.2).abs() < 1e-9);
        assert_eq!(q.volume, Some(1234));
        assert_eq!(q.display_name.as_deref(), Some("Apple Inc."));
    }

    #[test]
    fn test_missing_fields_stay_missing() {
        let q = parse(r#"{"chart":{"result":[{"meta":{"symbol":"X"}}],"error":null}}"#).unwrap();
        assert_eq!(q, ProviderQuote::default());
    }

    #[test]
    fn test_error_payload() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
        let err = parse(r#"{"chart":{"result":[],"error":null}}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Empty(_)));
    }
}
