//! Refresh and trend engine.
//!
//! Orchestrates the provider and the store: first-time company loads,
//! incremental refresh across all tracked symbols, calendar-validated
//! single-record fetches, and the trend statistics.

pub mod export;

use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::{longest_positive_run, DailyRecord, Symbol, TrendPoint, TrendRun};
use crate::error::{EngineError, StoreError};
use crate::provider::PriceProvider;
use crate::store::{CrossTrend, SqliteStore};

/// Result of a first-time company load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadOutcome {
    /// History fetched and persisted.
    Loaded {
        rows: usize,
        last_refreshed: NaiveDate,
    },
    /// The company was already tracked; nothing was written. A normal
    /// outcome, not an error.
    AlreadyLoaded,
}

/// Per-symbol results of a [`Engine::refresh_all`] sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshSummary {
    pub refreshed: Vec<RefreshedSymbol>,
    pub unchanged: Vec<Symbol>,
    pub failed: Vec<FailedSymbol>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshedSymbol {
    pub symbol: Symbol,
    pub rows: usize,
    pub last_refreshed: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedSymbol {
    pub symbol: Symbol,
    pub reason: String,
}

impl RefreshSummary {
    /// Total rows appended across the sweep.
    #[must_use]
    pub fn rows_appended(&self) -> usize {
        self.refreshed.iter().map(|r| r.rows).sum()
    }
}

/// The engine over a price provider, the SQLite store, and the export dir.
///
/// The engine never writes rows itself; every mutation goes through the
/// store's transactional operations.
pub struct Engine<P> {
    provider: P,
    store: SqliteStore,
    export_dir: PathBuf,
}

impl<P: PriceProvider> Engine<P> {
    pub fn new(provider: P, store: SqliteStore, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            store,
            export_dir: export_dir.into(),
        }
    }

    /// Load a company's full history for the first time.
    ///
    /// Runs CheckExisting, FetchRemote, Persist. Persistence is a single
    /// transaction; if another load of the same ticker slips in between the
    /// check and the write, the metadata primary key turns this call into
    /// [`LoadOutcome::AlreadyLoaded`] instead of a partial double-write.
    pub async fn load_company(&self, symbol: &Symbol) -> Result<LoadOutcome, EngineError> {
        if self.store.list_symbols()?.contains(symbol) {
            info!(%symbol, "Company already loaded");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let (last_refreshed, records) = self.provider.full_history(symbol).await?;

        match self
            .store
            .register_company(symbol, last_refreshed, &records)
        {
            Ok(rows) => {
                info!(%symbol, rows, %last_refreshed, "Company loaded");
                Ok(LoadOutcome::Loaded {
                    rows,
                    last_refreshed,
                })
            }
            Err(StoreError::DuplicateSymbol { .. }) => {
                // Lost the race to a concurrent load; the other writer won.
                info!(%symbol, "Company loaded concurrently");
                Ok(LoadOutcome::AlreadyLoaded)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Check every tracked symbol against the provider and append whatever
    /// is new. One symbol's failure is recorded and the sweep continues.
    pub async fn refresh_all(&self) -> Result<RefreshSummary, EngineError> {
        let mut summary = RefreshSummary::default();

        for meta in self.store.refresh_dates()? {
            match self.refresh_one(&meta.symbol, meta.last_refreshed).await {
                Ok(Some(refreshed)) => summary.refreshed.push(refreshed),
                Ok(None) => summary.unchanged.push(meta.symbol),
                Err(err) => {
                    error!(symbol = %meta.symbol, error = %err, "Refresh failed");
                    summary.failed.push(FailedSymbol {
                        symbol: meta.symbol,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            refreshed = summary.refreshed.len(),
            unchanged = summary.unchanged.len(),
            failed = summary.failed.len(),
            rows = summary.rows_appended(),
            "Refresh sweep complete"
        );
        Ok(summary)
    }

    async fn refresh_one(
        &self,
        symbol: &Symbol,
        stored: NaiveDate,
    ) -> Result<Option<RefreshedSymbol>, EngineError> {
        let remote = self.provider.latest_refresh_date(symbol).await?;
        if remote <= stored {
            return Ok(None);
        }

        let records = self.provider.new_history(symbol, stored).await?;
        let rows = if records.is_empty() {
            // Remote advertises a newer date but returned no rows past the
            // stored one; still move the bookmark so the sweep stays
            // idempotent.
            self.store.update_refresh_date(symbol, remote)?;
            0
        } else {
            self.store.append_records(symbol, remote, &records)?
        };

        Ok(Some(RefreshedSymbol {
            symbol: symbol.clone(),
            rows,
            last_refreshed: remote,
        }))
    }

    /// Fetch one stored record after calendar validation, emitting the JSON
    /// export side effect on success.
    pub fn fetch_record(
        &self,
        symbol: &Symbol,
        date: NaiveDate,
    ) -> Result<DailyRecord, EngineError> {
        validate_trading_date(date, Local::now().date_naive())?;

        let record = self
            .store
            .get_record(symbol, date)?
            .ok_or_else(|| EngineError::NotFound {
                symbol: symbol.clone(),
                date,
            })?;

        // Audit side channel only; a failed export never fails the fetch.
        if let Err(err) = export::export_record(&self.export_dir, symbol, &record) {
            warn!(%symbol, error = %err, "Record export failed");
        }

        Ok(record)
    }

    /// Per-day trend series for one company, most recent first.
    pub fn trend_series(&self, symbol: &Symbol) -> Result<Vec<TrendPoint>, EngineError> {
        Ok(self.store.trend_series(symbol)?)
    }

    /// Average trend across all tracked companies for one date.
    pub fn avg_trend(&self, date: NaiveDate) -> Result<Decimal, EngineError> {
        validate_trading_date(date, Local::now().date_naive())?;

        match self.store.cross_trend(date)? {
            CrossTrend::Average(avg) => Ok(avg),
            CrossTrend::NoSymbols => Err(EngineError::NoSymbols),
            CrossTrend::MissingRecord { symbol } => Err(EngineError::MissingRecord { symbol, date }),
        }
    }

    /// Longest run of strictly positive trend days for one company.
    /// `None` when the series is empty or never positive.
    pub fn trend_period(&self, symbol: &Symbol) -> Result<Option<TrendRun>, EngineError> {
        let series = self.store.trend_series(symbol)?;
        Ok(longest_positive_run(&series))
    }

    /// All tracked symbols.
    pub fn list_symbols(&self) -> Result<Vec<Symbol>, EngineError> {
        Ok(self.store.list_symbols()?)
    }

    /// Tracked symbols with their last-refreshed dates.
    pub fn refresh_dates(&self) -> Result<Vec<crate::domain::SymbolMeta>, EngineError> {
        Ok(self.store.refresh_dates()?)
    }
}

/// Reject dates no market data can exist for: future days and weekends.
fn validate_trading_date(date: NaiveDate, today: NaiveDate) -> Result<(), EngineError> {
    if date > today {
        return Err(EngineError::FutureDate { date });
    }
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(EngineError::MarketClosed { date });
    }
    Ok(())
}
