//! Wire types for the Alpha Vantage daily-adjusted endpoint.
//!
//! The provider returns every numeric factor as a string; this module owns
//! the mapping from those strings into domain records.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::DailyRecord;
use crate::error::ProviderError;

/// Top-level response body.
///
/// Exactly one of the branches is populated: an error indicator, a
/// rate-limit note, or the metadata plus time-series payload.
#[derive(Debug, Deserialize)]
pub struct DailySeriesResponse {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Meta Data")]
    pub meta: Option<MetaData>,

    #[serde(rename = "Time Series (Daily)")]
    pub series: Option<BTreeMap<NaiveDate, RawDailyFactors>>,
}

#[derive(Debug, Deserialize)]
pub struct MetaData {
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: String,
}

/// The eight string-valued factors of one trading day.
#[derive(Debug, Deserialize)]
pub struct RawDailyFactors {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. adjusted close")]
    pub adjusted_close: String,
    #[serde(rename = "6. volume")]
    pub volume: String,
    #[serde(rename = "7. dividend amount")]
    pub dividend_amount: String,
    #[serde(rename = "8. split coefficient")]
    pub split_coefficient: String,
}

impl MetaData {
    /// Parse the last-refreshed field, dropping a trailing time component
    /// (`2019-07-31 13:30:13` style) when the market is mid-session.
    pub fn refresh_date(&self) -> Result<NaiveDate, ProviderError> {
        let date_part = self
            .last_refreshed
            .split_whitespace()
            .next()
            .unwrap_or_default();
        date_part
            .parse()
            .map_err(|_| malformed("Last Refreshed", &self.last_refreshed))
    }
}

impl RawDailyFactors {
    /// Convert the string factors for `date` into a domain record.
    pub fn into_record(self, date: NaiveDate) -> Result<DailyRecord, ProviderError> {
        Ok(DailyRecord {
            recorded_date: date,
            open: parse_decimal("open", &self.open)?,
            high: parse_decimal("high", &self.high)?,
            low: parse_decimal("low", &self.low)?,
            close: parse_decimal("close", &self.close)?,
            adjusted_close: parse_decimal("adjusted close", &self.adjusted_close)?,
            volume: self
                .volume
                .parse()
                .map_err(|_| malformed("volume", &self.volume))?,
            dividend_amount: parse_decimal("dividend amount", &self.dividend_amount)?,
            split_coefficient: parse_decimal("split coefficient", &self.split_coefficient)?,
        })
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(value).map_err(|_| malformed(field, value))
}

fn malformed(field: &str, value: &str) -> ProviderError {
    ProviderError::Malformed {
        reason: format!("field '{field}' holds unparseable value '{value}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HAPPY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Time Series with Splits and Dividend Events",
            "2. Symbol": "ACME",
            "3. Last Refreshed": "2024-03-01",
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern"
        },
        "Time Series (Daily)": {
            "2024-03-01": {
                "1. open": "100.0000",
                "2. high": "102.5000",
                "3. low": "99.1000",
                "4. close": "101.2500",
                "5. adjusted close": "101.2500",
                "6. volume": "1234567",
                "7. dividend amount": "0.0000",
                "8. split coefficient": "1.0000"
            }
        }
    }"#;

    #[test]
    fn parses_happy_body() {
        let body: DailySeriesResponse = serde_json::from_str(HAPPY_BODY).unwrap();
        assert!(body.error_message.is_none());
        assert!(body.note.is_none());

        let meta = body.meta.unwrap();
        assert_eq!(
            meta.refresh_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        let series = body.series.unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = series
            .into_iter()
            .next()
            .map(|(d, factors)| factors.into_record(d).unwrap())
            .unwrap();
        assert_eq!(record.recorded_date, date);
        assert_eq!(record.open, dec!(100.0000));
        assert_eq!(record.close, dec!(101.2500));
        assert_eq!(record.volume, 1_234_567);
    }

    #[test]
    fn parses_error_body() {
        let body: DailySeriesResponse =
            serde_json::from_str(r#"{"Error Message": "Invalid API call."}"#).unwrap();
        assert!(body.error_message.is_some());
        assert!(body.meta.is_none());
    }

    #[test]
    fn parses_rate_limit_body() {
        let body: DailySeriesResponse =
            serde_json::from_str(r#"{"Note": "Thank you for using Alpha Vantage!"}"#).unwrap();
        assert!(body.note.is_some());
    }

    #[test]
    fn refresh_date_drops_time_component() {
        let meta = MetaData {
            last_refreshed: "2019-07-31 13:30:13".into(),
        };
        assert_eq!(
            meta.refresh_date().unwrap(),
            NaiveDate::from_ymd_opt(2019, 7, 31).unwrap()
        );
    }

    #[test]
    fn unparseable_factor_is_reported_with_field_name() {
        let factors = RawDailyFactors {
            open: "not-a-number".into(),
            high: "1".into(),
            low: "1".into(),
            close: "1".into(),
            adjusted_close: "1".into(),
            volume: "1".into(),
            dividend_amount: "0".into(),
            split_coefficient: "1".into(),
        };
        let err = factors
            .into_record(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("open"));
    }
}
