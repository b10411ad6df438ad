//! Database row types for Diesel ORM.
//!
//! Dates are stored as `YYYY-MM-DD` text (lexicographic order matches
//! chronological order) and prices as decimal strings for exact round-trips.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{daily_records, symbols};
use crate::domain::{DailyRecord, Symbol, SymbolMeta};
use crate::error::StoreError;

/// Database row for symbol metadata.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = symbols)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SymbolRow {
    pub symbol: String,
    pub last_refreshed: String,
}

/// Database row for one trading day of one company.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = daily_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyRecordRow {
    pub symbol: String,
    pub recorded_date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub adjusted_close: String,
    pub volume: i64,
    pub dividend_amount: String,
    pub split_coefficient: String,
}

impl SymbolRow {
    pub fn new(symbol: &Symbol, last_refreshed: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_string(),
            last_refreshed: last_refreshed.to_string(),
        }
    }

    pub fn into_meta(self) -> Result<SymbolMeta, StoreError> {
        Ok(SymbolMeta {
            symbol: parse_symbol(&self.symbol)?,
            last_refreshed: parse_date(&self.last_refreshed)?,
        })
    }
}

impl DailyRecordRow {
    pub fn new(symbol: &Symbol, record: &DailyRecord) -> Self {
        Self {
            symbol: symbol.to_string(),
            recorded_date: record.recorded_date.to_string(),
            open: record.open.to_string(),
            high: record.high.to_string(),
            low: record.low.to_string(),
            close: record.close.to_string(),
            adjusted_close: record.adjusted_close.to_string(),
            volume: record.volume,
            dividend_amount: record.dividend_amount.to_string(),
            split_coefficient: record.split_coefficient.to_string(),
        }
    }

    pub fn into_record(self) -> Result<DailyRecord, StoreError> {
        Ok(DailyRecord {
            recorded_date: parse_date(&self.recorded_date)?,
            open: parse_price(&self.open)?,
            high: parse_price(&self.high)?,
            low: parse_price(&self.low)?,
            close: parse_price(&self.close)?,
            adjusted_close: parse_price(&self.adjusted_close)?,
            volume: self.volume,
            dividend_amount: parse_price(&self.dividend_amount)?,
            split_coefficient: parse_price(&self.split_coefficient)?,
        })
    }
}

pub(crate) fn parse_symbol(raw: &str) -> Result<Symbol, StoreError> {
    Symbol::new(raw).map_err(|e| StoreError::Corrupt {
        reason: format!("stored symbol '{raw}': {e}"),
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, StoreError> {
    raw.parse().map_err(|_| StoreError::Corrupt {
        reason: format!("stored date '{raw}' is not YYYY-MM-DD"),
    })
}

pub(crate) fn parse_price(raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw).map_err(|_| StoreError::Corrupt {
        reason: format!("stored price '{raw}' is not a decimal"),
    })
}
