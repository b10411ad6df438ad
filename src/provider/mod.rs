//! Market-data provider port and the Alpha Vantage adapter.

pub mod alpha;
pub mod dto;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DailyRecord, Symbol};
use crate::error::ProviderError;

pub use alpha::AlphaVantageClient;

/// Outbound port for the daily price-history provider.
///
/// Every call is one synchronous network round trip with the transport's
/// configured timeout; there is no retry policy.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch the full daily history for a symbol along with the provider's
    /// last-refreshed date.
    async fn full_history(
        &self,
        symbol: &Symbol,
    ) -> Result<(NaiveDate, Vec<DailyRecord>), ProviderError>;

    /// Fetch only the provider's most-recent available date for a symbol,
    /// independent of anything stored locally.
    async fn latest_refresh_date(&self, symbol: &Symbol) -> Result<NaiveDate, ProviderError>;

    /// Fetch records dated strictly after `since`.
    ///
    /// The provider has no server-side delta query; the full series is
    /// retrieved and filtered client-side.
    async fn new_history(
        &self,
        symbol: &Symbol,
        since: NaiveDate,
    ) -> Result<Vec<DailyRecord>, ProviderError>;
}
