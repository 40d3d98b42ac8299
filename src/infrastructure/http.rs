use std::time::Duration;

/// Browser-like agent; Yahoo rejects obvious bot agents on some endpoints.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Shared client builder. The timeout is the only time limit any provider
/// call has; there are no retries.
pub fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Reads the body of a failed response into a `Status` error.
pub async fn status_error(resp: reqwest::Response) -> crate::domain::error::ProviderError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    crate::domain::error::ProviderError::Status {
        status,
        body: body.chars().take(500).collect(),
    }
}
