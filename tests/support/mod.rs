#![allow(dead_code)]

//! Shared test fixtures: a scripted provider and in-memory stores.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stockledger::domain::{DailyRecord, Symbol};
use stockledger::error::ProviderError;
use stockledger::provider::PriceProvider;
use stockledger::store::db::{create_pool, run_migrations, DbPool};
use stockledger::store::SqliteStore;

/// A provider whose answers are scripted per symbol.
#[derive(Default)]
pub struct ScriptedProvider {
    series: HashMap<String, ScriptedSeries>,
    failing: HashSet<String>,
}

pub struct ScriptedSeries {
    pub last_refreshed: NaiveDate,
    pub records: Vec<DailyRecord>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a full-history answer for `symbol`.
    pub fn with_series(
        mut self,
        symbol: &Symbol,
        last_refreshed: NaiveDate,
        records: Vec<DailyRecord>,
    ) -> Self {
        self.series.insert(
            symbol.to_string(),
            ScriptedSeries {
                last_refreshed,
                records,
            },
        );
        self
    }

    /// Make every call for `symbol` fail with a malformed-response error.
    pub fn with_failure(mut self, symbol: &Symbol) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    fn lookup(&self, symbol: &Symbol) -> Result<&ScriptedSeries, ProviderError> {
        if self.failing.contains(symbol.as_str()) {
            return Err(ProviderError::Malformed {
                reason: "scripted failure".into(),
            });
        }
        self.series
            .get(symbol.as_str())
            .ok_or_else(|| ProviderError::InvalidSymbol {
                symbol: symbol.to_string(),
            })
    }
}

#[async_trait]
impl PriceProvider for ScriptedProvider {
    async fn full_history(
        &self,
        symbol: &Symbol,
    ) -> Result<(NaiveDate, Vec<DailyRecord>), ProviderError> {
        let series = self.lookup(symbol)?;
        Ok((series.last_refreshed, series.records.clone()))
    }

    async fn latest_refresh_date(&self, symbol: &Symbol) -> Result<NaiveDate, ProviderError> {
        Ok(self.lookup(symbol)?.last_refreshed)
    }

    async fn new_history(
        &self,
        symbol: &Symbol,
        since: NaiveDate,
    ) -> Result<Vec<DailyRecord>, ProviderError> {
        let series = self.lookup(symbol)?;
        Ok(series
            .records
            .iter()
            .filter(|record| record.recorded_date > since)
            .cloned()
            .collect())
    }
}

/// Fresh in-memory database with migrations applied.
pub fn memory_pool() -> DbPool {
    let pool = create_pool(":memory:").expect("pool");
    run_migrations(&pool).expect("migrations");
    pool
}

pub fn memory_store() -> SqliteStore {
    SqliteStore::new(memory_pool())
}

pub fn symbol(raw: &str) -> Symbol {
    Symbol::new(raw).expect("valid test symbol")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// A one-day record with the given open and close; other factors filled in.
pub fn record(day: NaiveDate, open: Decimal, close: Decimal) -> DailyRecord {
    DailyRecord {
        recorded_date: day,
        open,
        high: close.max(open),
        low: close.min(open),
        close,
        adjusted_close: close,
        volume: 10_000,
        dividend_amount: dec!(0),
        split_coefficient: dec!(1),
    }
}
