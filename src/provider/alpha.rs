//! Alpha Vantage REST client.
//!
//! One HTTP GET per call against the `TIME_SERIES_DAILY_ADJUSTED` function.
//! The endpoint always returns the full series; incremental fetches filter
//! client-side.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use tracing::{debug, info, warn};

use super::dto::DailySeriesResponse;
use super::PriceProvider;
use crate::config::ProviderConfig;
use crate::domain::{DailyRecord, Symbol};
use crate::error::ProviderError;

/// Time-series function requested from the provider; fixed for this app.
const DAILY_ADJUSTED: &str = "TIME_SERIES_DAILY_ADJUSTED";

/// HTTP client for the Alpha Vantage query API.
pub struct AlphaVantageClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    /// Create a client against the given base URL with the given key.
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: HttpClient::new(),
            base_url,
            api_key,
        }
    }

    /// Build a client from provider configuration, honoring its timeout.
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Issue the daily-adjusted query for `symbol` and classify the body.
    async fn query(&self, symbol: &Symbol) -> Result<DailySeriesResponse, ProviderError> {
        debug!(%symbol, function = DAILY_ADJUSTED, "Querying provider");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("function", DAILY_ADJUSTED),
                ("apikey", self.api_key.as_str()),
                ("symbol", symbol.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: DailySeriesResponse = response.json().await?;

        if body.error_message.is_some() {
            return Err(ProviderError::InvalidSymbol {
                symbol: symbol.to_string(),
            });
        }
        if let Some(note) = body.note {
            return Err(ProviderError::RateLimited { note });
        }

        Ok(body)
    }

    /// Fetch and convert the full series, newest first.
    async fn fetch_series(
        &self,
        symbol: &Symbol,
    ) -> Result<(NaiveDate, Vec<DailyRecord>), ProviderError> {
        let body = self.query(symbol).await?;

        let meta = body.meta.ok_or_else(|| ProviderError::Malformed {
            reason: "response without Meta Data block".into(),
        })?;
        let series = body.series.ok_or_else(|| ProviderError::Malformed {
            reason: "response without Time Series (Daily) block".into(),
        })?;

        let refresh_date = meta.refresh_date()?;

        // BTreeMap iterates ascending by date; reverse to newest-first.
        let mut records = series
            .into_iter()
            .map(|(date, factors)| factors.into_record(date))
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();

        info!(%symbol, rows = records.len(), %refresh_date, "Fetched daily series");
        Ok((refresh_date, records))
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageClient {
    async fn full_history(
        &self,
        symbol: &Symbol,
    ) -> Result<(NaiveDate, Vec<DailyRecord>), ProviderError> {
        self.fetch_series(symbol).await
    }

    async fn latest_refresh_date(&self, symbol: &Symbol) -> Result<NaiveDate, ProviderError> {
        let body = self.query(symbol).await?;
        let meta = body.meta.ok_or_else(|| ProviderError::Malformed {
            reason: "response without Meta Data block".into(),
        })?;
        meta.refresh_date()
    }

    async fn new_history(
        &self,
        symbol: &Symbol,
        since: NaiveDate,
    ) -> Result<Vec<DailyRecord>, ProviderError> {
        let (_, records) = self.fetch_series(symbol).await?;
        let fresh: Vec<DailyRecord> = records
            .into_iter()
            .filter(|record| record.recorded_date > since)
            .collect();
        debug!(%symbol, %since, rows = fresh.len(), "Filtered new history");
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_keeps_base_url_and_key() {
        let config = ProviderConfig {
            api_url: "https://example.test/query".into(),
            api_key: "demo".into(),
            timeout_ms: 1_000,
        };
        let client = AlphaVantageClient::from_config(&config);
        assert_eq!(client.base_url, "https://example.test/query");
        assert_eq!(client.api_key, "demo");
    }
}
