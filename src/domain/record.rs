//! Daily OHLCV price records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of adjusted price history for a single company.
///
/// Records are insert-only once stored; late historical corrections are not
/// handled. Prices are exact decimals, volume is a share count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub recorded_date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adjusted_close: Decimal,
    pub volume: i64,
    pub dividend_amount: Decimal,
    pub split_coefficient: Decimal,
}

impl DailyRecord {
    /// Per-day trend: close price minus open price.
    #[must_use]
    pub fn trend(&self) -> Decimal {
        self.close - self.open
    }
}
