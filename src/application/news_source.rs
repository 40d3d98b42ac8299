//! News source pulls headlines from a provider and filters them down to
//! clean, de-duplicated titles.
//!
//! Two provider shapes are supported: a structured feed that already returns
//! titles, and a raw HTML page that has to be scraped. Scraping is tied to
//! the provider's current page layout; when that layout changes the page
//! simply stops yielding headlines and the run continues without news.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::entities::headline::Headline;
use crate::domain::error::DomainError;
use crate::domain::ports::news_provider::{NewsPayload, NewsProvider, NewsQuery};

/// Candidates shorter than this are navigation or UI text.
pub const MIN_HEADLINE_CHARS: usize = 10;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->")
        .expect("static regex")
});
static HEADLINE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:a|h[1-6])\b[^>]*>(.*?)</(?:a|h[1-6])\s*>").expect("static regex")
});
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Result of one headline fetch. An empty list with an error means the
/// provider failed; an empty list without one means there was no news.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsBatch {
    pub headlines: Vec<Headline>,
    #[serde(serialize_with = "serialize_opt_error")]
    pub error: Option<DomainError>,
}

fn serialize_opt_error<S: serde::Serializer>(
    e: &Option<DomainError>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match e {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

pub struct NewsSource {
    provider: Arc<dyn NewsProvider>,
}

impl NewsSource {
    pub fn new(provider: Arc<dyn NewsProvider>) -> Self {
        Self { provider }
    }

    /// Fetches at most `limit` headlines for `query`, newest first.
    pub async fn fetch_headlines(&self, query: &NewsQuery, limit: usize) -> NewsBatch {
        if limit == 0 {
            return NewsBatch::default();
        }

        let scope = query.scope;
        let payload = match self.provider.fetch(query, limit).await {
            Ok(p) => p,
            Err(e) => {
                warn!("{} news fetch failed for {query}: {e}", self.provider.name());
                return NewsBatch {
                    headlines: Vec::new(),
                    error: Some(DomainError::DataUnavailable(format!(
                        "{} ({query}): {e}",
                        self.provider.name()
                    ))),
                };
            }
        };

        let titles = match payload {
            NewsPayload::Titles(titles) => filter_titles(titles, limit),
            NewsPayload::Html(html) => extract_headlines_from_html(&html, limit),
        };

        if titles.is_empty() {
            info!("{} returned no usable headlines for {query}", self.provider.name());
        } else {
            info!(
                "{} returned {} headlines for {query}",
                self.provider.name(),
                titles.len()
            );
        }

        NewsBatch {
            headlines: titles
                .into_iter()
                .map(|t| Headline::new(t, scope))
                .collect(),
            error: None,
        }
    }
}

/// Normalizes feed titles with the same rules the scraper applies.
pub fn filter_titles<I>(titles: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in titles {
        if out.len() >= limit {
            break;
        }
        let title = clean_text(&raw);
        if title.chars().count() < MIN_HEADLINE_CHARS {
            continue;
        }
        if seen.insert(title.clone()) {
            out.push(title);
        }
    }
    out
}

/// Scrapes headline candidates (link and heading text) from a page in
/// document order, keeping at most `limit` that pass the length filter.
pub fn extract_headlines_from_html(html: &str, limit: usize) -> Vec<String> {
    let stripped = SCRIPT_OR_STYLE.replace_all(html, " ");
    let candidates = HEADLINE_ELEMENT
        .captures_iter(&stripped)
        .filter_map(|c| c.get(1))
        .map(|m| ANY_TAG.replace_all(m.as_str(), " ").into_owned());
    filter_titles(candidates, limit)
}

fn clean_text(raw: &str) -> String {
    let decoded = decode_entities(raw);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ProviderError;
    use crate::domain::values::market_scope::MarketScope;
    use async_trait::async_trait;

    struct StaticNews(Result<NewsPayload, ProviderError>);

    #[async_trait]
    impl NewsProvider for StaticNews {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, _query: &NewsQuery, _limit: usize) -> Result<NewsPayload, ProviderError> {
            self.0.clone()
        }
    }

    const PAGE: &str = r#"
        <html><head><style>.a { color: red }</style>
        <script>var title = "<a>Not a headline at all</a>";</script></head>
        <body>
          <nav><a href="/">Home</a><a href="/markets">Markets</a></nav>
          <h3><a href="/n/1">TSMC shares climb on &amp; AI demand</a></h3>
          <a href="/n/2"><span>Fed holds</span>   rates steady
             for third meeting</a>
          <h3><a href="/n/1">TSMC shares climb on &amp; AI demand</a></h3>
          <a href="/n/3">Apple beats earnings</a>
          <a href="/n/4">Oil slides as supply grows</a>
        </body></html>
    "#;

    #[test]
    fn test_html_extraction_filters_dedups_and_limits() {
        let titles = extract_headlines_from_html(PAGE, 10);
        assert_eq!(
            titles,
            vec![
                "TSMC shares climb on & AI demand".to_string(),
                "Fed holds rates steady for third meeting".to_string(),
                "Apple beats earnings".to_string(),
                "Oil slides as supply grows".to_string(),
            ]
        );
    }

    #[test]
    fn test_html_extraction_stops_at_limit() {
        let titles = extract_headlines_from_html(PAGE, 2);
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1], "Fed holds rates steady for third meeting");
    }

    #[test]
    fn test_changed_layout_yields_nothing() {
        assert!(extract_headlines_from_html("<div>Layout changed entirely</div>", 5).is_empty());
    }

    #[test]
    fn test_filter_titles_min_length_boundary() {
        let titles = filter_titles(
            vec!["123456789".to_string(), "1234567890".to_string()],
            5,
        );
        assert_eq!(titles, vec!["1234567890".to_string()]);
    }

    #[tokio::test]
    async fn test_feed_payload_tagged_with_scope() {
        let source = NewsSource::new(Arc::new(StaticNews(Ok(NewsPayload::Titles(vec![
            "Taiex closes at record high".into(),
            "short".into(),
        ])))));
        let batch = source
            .fetch_headlines(&NewsQuery::for_symbols(MarketScope::Domestic, vec!["2330.TW".into()]), 5)
            .await;
        assert!(batch.error.is_none());
        assert_eq!(
            batch.headlines,
            vec![Headline::new("Taiex closes at record high", MarketScope::Domestic)]
        );
    }

    #[tokio::test]
    async fn test_provider_failure_is_empty_plus_error() {
        let source = NewsSource::new(Arc::new(StaticNews(Err(ProviderError::Network(
            "timeout".into(),
        )))));
        let batch = source
            .fetch_headlines(&NewsQuery::market(MarketScope::International), 5)
            .await;
        assert!(batch.headlines.is_empty());
        assert!(matches!(batch.error, Some(DomainError::DataUnavailable(_))));
    }
}
