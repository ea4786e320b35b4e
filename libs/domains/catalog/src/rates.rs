//! EUR to USD exchange rate providers.
//!
//! The live provider queries the Croatian National Bank (HNB) daily rate
//! endpoint. Rate values arrive as strings with a comma decimal separator
//! (e.g. `"1,0545"`). Any failure to fetch or parse falls back to a rate
//! of 1.0 so that reads keep working when the rate source is down.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default HNB API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.hnb.hr";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Provider of the current EUR to USD exchange rate.
///
/// Implementations never fail; they return a fallback rate of 1.0 when
/// the real rate cannot be determined.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn usd_rate(&self) -> f64;
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate response contained no records")]
    Empty,

    #[error("could not parse rate value '{value}'")]
    Parse { value: String },
}

/// One record of the HNB daily exchange rate response
#[derive(Debug, Deserialize)]
struct ExchangeRate {
    srednji_tecaj: String,
}

/// Parse an HNB mid rate string, which uses a comma decimal separator
fn parse_mid_rate(raw: &str) -> Result<f64, RateError> {
    raw.replace(',', ".").parse().map_err(|_| RateError::Parse {
        value: raw.to_string(),
    })
}

/// Live rate client backed by the HNB daily exchange rate API
pub struct HnbRateClient {
    http: reqwest::Client,
    base_url: String,
}

impl HnbRateClient {
    /// Client against the public HNB API
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL, used for configuration overrides
    /// and tests
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn fetch_rate(&self) -> Result<f64, RateError> {
        let url = format!("{}/tecajn-eur/v3", self.base_url.trim_end_matches('/'));

        let rates: Vec<ExchangeRate> = self
            .http
            .get(url)
            .query(&[("valuta", "USD")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let record = rates.first().ok_or(RateError::Empty)?;
        parse_mid_rate(&record.srednji_tecaj)
    }
}

#[async_trait]
impl RateProvider for HnbRateClient {
    async fn usd_rate(&self) -> f64 {
        tracing::info!("Finding USD rate");
        match self.fetch_rate().await {
            Ok(rate) => {
                tracing::info!(rate, "Found USD rate");
                rate
            }
            Err(e) => {
                tracing::warn!(error = %e, "USD rate not found, defaulting to 1.0");
                1.0
            }
        }
    }
}

/// Fixed-rate provider for development and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedRateProvider {
    rate: f64,
}

impl FixedRateProvider {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    async fn usd_rate(&self) -> f64 {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    #[test]
    fn test_parse_mid_rate_with_comma_separator() {
        assert_eq!(parse_mid_rate("1,0545").unwrap(), 1.0545);
        assert_eq!(parse_mid_rate("1.0545").unwrap(), 1.0545);
    }

    #[test]
    fn test_parse_mid_rate_rejects_garbage() {
        let err = parse_mid_rate("n/a").unwrap_err();
        assert!(matches!(err, RateError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_fixed_rate_provider_returns_given_rate() {
        let provider = FixedRateProvider::new(1.25);
        assert_eq!(provider.usd_rate().await, 1.25);
    }

    async fn spawn_rate_server(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/tecajn-eur/v3",
            get(move || async move {
                (
                    status,
                    [("content-type", "application/json")],
                    body,
                )
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_usd_rate_from_server() {
        let base_url = spawn_rate_server(
            StatusCode::OK,
            r#"[{"broj_tecajnice":"40","datum_primjene":"2025-02-26","srednji_tecaj":"1,0545","valuta":"USD"}]"#,
        )
        .await;

        let client = HnbRateClient::with_base_url(base_url).unwrap();
        assert_eq!(client.usd_rate().await, 1.0545);
    }

    #[tokio::test]
    async fn test_usd_rate_falls_back_on_server_error() {
        let base_url = spawn_rate_server(StatusCode::INTERNAL_SERVER_ERROR, "").await;

        let client = HnbRateClient::with_base_url(base_url).unwrap();
        assert_eq!(client.usd_rate().await, 1.0);
    }

    #[tokio::test]
    async fn test_usd_rate_falls_back_on_empty_response() {
        let base_url = spawn_rate_server(StatusCode::OK, "[]").await;

        let client = HnbRateClient::with_base_url(base_url).unwrap();
        assert_eq!(client.usd_rate().await, 1.0);
    }

    #[tokio::test]
    async fn test_usd_rate_falls_back_when_unreachable() {
        // Port 1 is never listening
        let client = HnbRateClient::with_base_url("http://127.0.0.1:1").unwrap();
        assert_eq!(client.usd_rate().await, 1.0);
    }
}
