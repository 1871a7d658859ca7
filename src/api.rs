//! Weather API client for Weatherbit integration
//!
//! This module provides the HTTP transport for the "current conditions"
//! endpoint. Retries on transient failures are handled by the
//! `reqwest-retry` middleware with an exponential backoff policy.

use crate::config::WeatherConfig;
use crate::models::Coordinate;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{
    Jitter, RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Statuses worth another attempt
const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Source of raw current-weather payloads.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait WeatherTransport: Send + Sync {
    /// Fetch the provider's current-conditions body for `coordinate`.
    ///
    /// Errors describe the transport failure (network, timeout, non-success
    /// status after retries); the caller decides how to surface them.
    async fn fetch_current(&self, coordinate: Coordinate) -> Result<String>;
}

/// Retry classification for Weatherbit responses.
///
/// Connection failures and timeouts are retried through
/// `default_on_request_failure`; of the HTTP statuses only 429 and the
/// 500/502/503/504 family are transient.
pub struct UpstreamRetryStrategy;

impl RetryableStrategy for UpstreamRetryStrategy {
    fn handle(
        &self,
        res: &std::result::Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) => classify_status(response.status()),
            Err(error) => default_on_request_failure(error),
        }
    }
}

fn classify_status(status: StatusCode) -> Option<Retryable> {
    if status.is_success() {
        None
    } else if RETRYABLE_STATUSES.contains(&status) {
        debug!("Transient HTTP status {}, will retry", status);
        Some(Retryable::Transient)
    } else {
        Some(Retryable::Fatal)
    }
}

/// Exponential backoff: `base`, `2 * base`, `4 * base`, ... without jitter,
/// bounded to `max_attempts - 1` retries.
#[must_use]
pub fn retry_policy(config: &WeatherConfig) -> ExponentialBackoff {
    let retries = config.max_attempts.saturating_sub(1);
    let min = Duration::from_millis(config.backoff_base_ms);
    let max = min.saturating_mul(2_u32.saturating_pow(retries));

    ExponentialBackoff::builder()
        .retry_bounds(min, max)
        .jitter(Jitter::None)
        .base(2)
        .build_with_max_retries(retries)
}

/// Weatherbit "current conditions" client
pub struct WeatherbitClient {
    /// HTTP client with the retry middleware mounted
    client: ClientWithMiddleware,
    /// Full URL of the current endpoint
    endpoint: String,
    api_key: String,
    language: String,
    units: String,
}

impl WeatherbitClient {
    /// Create a new Weatherbit client. Fails when no API key is configured.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("BelWeather/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy(config),
                UpstreamRetryStrategy,
            ))
            .build();

        Ok(Self {
            client,
            endpoint: format!("{}/current", config.base_url.trim_end_matches('/')),
            api_key,
            language: config.language.clone(),
            units: config.units.clone(),
        })
    }

    fn request_url(&self, coordinate: Coordinate) -> Result<Url> {
        let lat = coordinate.latitude.to_string();
        let lon = coordinate.longitude.to_string();
        Url::parse_with_params(
            &self.endpoint,
            [
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("key", self.api_key.as_str()),
                ("lang", self.language.as_str()),
                ("units", self.units.as_str()),
            ],
        )
        .with_context(|| format!("Invalid weather endpoint: {}", self.endpoint))
    }

    /// Errors wrapped by the retry middleware may still carry the request URL,
    /// where the key appears percent-encoded
    fn redact(&self, text: &str, url: &Url) -> String {
        let encoded_key = url
            .query()
            .into_iter()
            .flat_map(|query| query.split('&'))
            .find_map(|pair| pair.strip_prefix("key="))
            .filter(|key| !key.is_empty());

        let text = match encoded_key {
            Some(encoded_key) => text.replace(encoded_key, "***"),
            None => text.to_string(),
        };
        text.replace(self.api_key.as_str(), "***")
    }
}

/// Describe a failed request without the URL, which carries the API key
fn describe_request_error(error: reqwest_middleware::Error) -> anyhow::Error {
    match error {
        reqwest_middleware::Error::Reqwest(err) => anyhow::Error::new(err.without_url()),
        reqwest_middleware::Error::Middleware(err) => err,
    }
}

#[async_trait]
impl WeatherTransport for WeatherbitClient {
    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn fetch_current(&self, coordinate: Coordinate) -> Result<String> {
        let url = self.request_url(coordinate)?;
        let start_time = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                let cause = format!("{:#}", describe_request_error(e));
                anyhow!("Network error: {}", self.redact(&cause, &url))
            })?;

        let status = response.status();
        let duration = start_time.elapsed();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            duration.as_secs_f64()
        );

        if !status.is_success() {
            warn!("Weather provider request failed with {}", status);
            bail!(
                "Weather provider returned HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            );
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to read response body: {:#}",
                    anyhow::Error::new(e.without_url())
                )
            })?;

        info!(
            "Retrieved current weather in {:.3}s ({} bytes)",
            duration.as_secs_f64(),
            body.len()
        );

        if duration.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", duration.as_secs_f64());
        }

        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use reqwest_retry::{RetryDecision, RetryPolicy};
    use rstest::rstest;
    use std::time::SystemTime;

    fn test_config() -> WeatherConfig {
        WeatherConfig {
            api_key: Some("test_api_key_123".to_string()),
            ..WeatherConfig::default()
        }
    }

    #[rstest]
    #[case(StatusCode::TOO_MANY_REQUESTS)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(StatusCode::BAD_GATEWAY)]
    #[case(StatusCode::SERVICE_UNAVAILABLE)]
    #[case(StatusCode::GATEWAY_TIMEOUT)]
    fn test_transient_statuses(#[case] status: StatusCode) {
        assert!(matches!(classify_status(status), Some(Retryable::Transient)));
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST)]
    #[case(StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::FORBIDDEN)]
    #[case(StatusCode::NOT_FOUND)]
    #[case(StatusCode::NOT_IMPLEMENTED)]
    fn test_fatal_statuses(#[case] status: StatusCode) {
        assert!(matches!(classify_status(status), Some(Retryable::Fatal)));
    }

    #[test]
    fn test_success_is_not_retried() {
        assert!(classify_status(StatusCode::OK).is_none());
    }

    /// Delay the policy asks for before retry number `n_past_retries + 1`
    fn wait_before_retry(policy: &ExponentialBackoff, n_past_retries: u32) -> Option<Duration> {
        let now = SystemTime::now();
        match policy.should_retry(now, n_past_retries) {
            RetryDecision::Retry { execute_after } => {
                Some(execute_after.duration_since(now).unwrap())
            }
            RetryDecision::DoNotRetry => None,
        }
    }

    #[test]
    fn test_default_backoff_schedule() {
        let policy = retry_policy(&WeatherConfig::default());

        let first = wait_before_retry(&policy, 0).unwrap();
        assert!(
            first >= Duration::from_millis(500) && first < Duration::from_millis(750),
            "{first:?}"
        );

        let second = wait_before_retry(&policy, 1).unwrap();
        assert!(
            second >= Duration::from_secs(1) && second < Duration::from_millis(1250),
            "{second:?}"
        );

        // three attempts in total
        assert!(wait_before_retry(&policy, 2).is_none());
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let config = WeatherConfig {
            max_attempts: 1,
            ..WeatherConfig::default()
        };
        assert!(wait_before_retry(&retry_policy(&config), 0).is_none());
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = WeatherConfig::default();
        let result = WeatherbitClient::new(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_url() {
        let client = WeatherbitClient::new(&test_config()).unwrap();
        let url = client.request_url(Coordinate::new(52.43, 30.98)).unwrap();

        assert_eq!(url.path(), "/v2.0/current");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("lat".to_string(), "52.43".to_string()),
                ("lon".to_string(), "30.98".to_string()),
                ("key".to_string(), "test_api_key_123".to_string()),
                ("lang".to_string(), "ru".to_string()),
                ("units".to_string(), "M".to_string()),
            ]
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let config = WeatherConfig {
            base_url: "http://localhost:1234/".to_string(),
            ..test_config()
        };
        let client = WeatherbitClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "http://localhost:1234/current");
    }

    #[rstest]
    #[case("test_api_key_123")]
    #[case("abc+def/ghi=123")]
    #[case("key with spaces&more")]
    fn test_redact_scrubs_raw_and_encoded_key(#[case] api_key: &str) {
        let config = WeatherConfig {
            api_key: Some(api_key.to_string()),
            ..test_config()
        };
        let client = WeatherbitClient::new(&config).unwrap();
        let url = client.request_url(Coordinate::new(52.43, 30.98)).unwrap();

        let message = format!("error sending request for url ({url}) with key {api_key}");
        let redacted = client.redact(&message, &url);

        assert!(!redacted.contains(api_key), "{redacted}");
        let encoded = url.query().unwrap().split('&').find_map(|p| p.strip_prefix("key=")).unwrap();
        assert!(!redacted.contains(encoded), "{redacted}");
        assert!(redacted.contains("lat=52.43"));
    }

    #[tokio::test]
    async fn test_stub_transport_counts_calls() {
        let stub = testing::StubTransport::body("{}");
        stub.fetch_current(Coordinate::new(0.0, 0.0)).await.unwrap();
        stub.fetch_current(Coordinate::new(0.0, 0.0)).await.unwrap();
        assert_eq!(stub.calls(), 2);

        let failing = testing::StubTransport::failing("boom");
        let err = failing.fetch_current(Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
