//! SQLite-backed price store using Diesel.
//!
//! One generic `daily_records` table keyed by (symbol, date) holds every
//! company's history; the `symbols` table tracks refresh metadata. Each
//! operation checks a connection out of the pool for exactly its unit of
//! work; the connection returns to the pool on drop, success or failure.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::db::model::{parse_date, parse_price, DailyRecordRow, SymbolRow};
use super::db::schema::{daily_records, symbols};
use super::db::{DbConn, DbPool};
use super::CrossTrend;
use crate::domain::{DailyRecord, Symbol, SymbolMeta, TrendPoint};
use crate::error::StoreError;

/// SQLite store over a Diesel r2d2 pool.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Insert one symbol metadata row.
    ///
    /// A primary-key conflict maps to [`StoreError::DuplicateSymbol`]; the
    /// constraint is what makes concurrent loads of the same ticker safe.
    pub fn register_symbol(
        &self,
        symbol: &Symbol,
        last_refreshed: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(symbols::table)
            .values(&SymbolRow::new(symbol, last_refreshed))
            .execute(&mut conn)
            .map_err(|e| insert_error(symbol, e))?;
        Ok(())
    }

    /// Insert a batch of daily records for one symbol in a single
    /// transaction. Returns the number of rows written.
    pub fn insert_records(
        &self,
        symbol: &Symbol,
        records: &[DailyRecord],
    ) -> Result<usize, StoreError> {
        let rows: Vec<DailyRecordRow> = records
            .iter()
            .map(|record| DailyRecordRow::new(symbol, record))
            .collect();

        let mut conn = self.conn()?;
        let written = conn
            .transaction(|conn| {
                diesel::insert_into(daily_records::table)
                    .values(&rows)
                    .execute(conn)
            })
            .map_err(|e| insert_error(symbol, e))?;

        info!(%symbol, rows = written, "Inserted daily records");
        Ok(written)
    }

    /// Register a new company: metadata row plus its full history, all in
    /// one transaction with rollback on any failure.
    pub fn register_company(
        &self,
        symbol: &Symbol,
        last_refreshed: NaiveDate,
        records: &[DailyRecord],
    ) -> Result<usize, StoreError> {
        let meta = SymbolRow::new(symbol, last_refreshed);
        let rows: Vec<DailyRecordRow> = records
            .iter()
            .map(|record| DailyRecordRow::new(symbol, record))
            .collect();

        let mut conn = self.conn()?;
        let written = conn
            .transaction(|conn| {
                diesel::insert_into(symbols::table)
                    .values(&meta)
                    .execute(conn)?;
                diesel::insert_into(daily_records::table)
                    .values(&rows)
                    .execute(conn)
            })
            .map_err(|e| insert_error(symbol, e))?;

        info!(%symbol, rows = written, %last_refreshed, "Registered company");
        Ok(written)
    }

    /// All tracked symbols, alphabetical.
    pub fn list_symbols(&self) -> Result<Vec<Symbol>, StoreError> {
        let mut conn = self.conn()?;
        let raw: Vec<String> = symbols::table
            .select(symbols::symbol)
            .order(symbols::symbol.asc())
            .load(&mut conn)
            .map_err(db_error)?;

        raw.iter()
            .map(|s| super::db::model::parse_symbol(s))
            .collect()
    }

    /// (symbol, last_refreshed) for every tracked company.
    pub fn refresh_dates(&self) -> Result<Vec<SymbolMeta>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<SymbolRow> = symbols::table
            .order(symbols::symbol.asc())
            .load(&mut conn)
            .map_err(db_error)?;

        rows.into_iter().map(SymbolRow::into_meta).collect()
    }

    /// Overwrite a symbol's last-refreshed date.
    pub fn update_refresh_date(
        &self,
        symbol: &Symbol,
        new_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::update(symbols::table.find(symbol.to_string()))
            .set(symbols::last_refreshed.eq(new_date.to_string()))
            .execute(&mut conn)
            .map_err(db_error)?;
        Ok(())
    }

    /// Refresh path: append new records and advance the refresh date in one
    /// transaction. Returns the number of rows appended.
    pub fn append_records(
        &self,
        symbol: &Symbol,
        new_date: NaiveDate,
        records: &[DailyRecord],
    ) -> Result<usize, StoreError> {
        let rows: Vec<DailyRecordRow> = records
            .iter()
            .map(|record| DailyRecordRow::new(symbol, record))
            .collect();

        let mut conn = self.conn()?;
        let written = conn
            .transaction(|conn| {
                let written = diesel::insert_into(daily_records::table)
                    .values(&rows)
                    .execute(conn)?;
                diesel::update(symbols::table.find(symbol.to_string()))
                    .set(symbols::last_refreshed.eq(new_date.to_string()))
                    .execute(conn)?;
                Ok::<usize, DieselError>(written)
            })
            .map_err(|e| insert_error(symbol, e))?;

        info!(%symbol, rows = written, %new_date, "Appended new records");
        Ok(written)
    }

    /// Single record lookup. `None` means "no row", which is not a fault.
    pub fn get_record(
        &self,
        symbol: &Symbol,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, StoreError> {
        let mut conn = self.conn()?;
        let row: Option<DailyRecordRow> = daily_records::table
            .find((symbol.to_string(), date.to_string()))
            .first(&mut conn)
            .optional()
            .map_err(db_error)?;

        row.map(DailyRecordRow::into_record).transpose()
    }

    /// Per-day trend series for one company, descending by date.
    ///
    /// The trend (close minus open) is computed here at the store boundary;
    /// callers never see raw price columns.
    pub fn trend_series(&self, symbol: &Symbol) -> Result<Vec<TrendPoint>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<(String, String, String)> = daily_records::table
            .filter(daily_records::symbol.eq(symbol.to_string()))
            .select((
                daily_records::recorded_date,
                daily_records::open,
                daily_records::close,
            ))
            .order(daily_records::recorded_date.desc())
            .load(&mut conn)
            .map_err(db_error)?;

        debug!(%symbol, points = rows.len(), "Loaded trend series");
        rows.into_iter()
            .map(|(date, open, close)| {
                Ok(TrendPoint {
                    date: parse_date(&date)?,
                    trend: parse_price(&close)? - parse_price(&open)?,
                })
            })
            .collect()
    }

    /// Average trend across all tracked companies for one date.
    pub fn cross_trend(&self, date: NaiveDate) -> Result<CrossTrend, StoreError> {
        let tracked = self.list_symbols()?;
        if tracked.is_empty() {
            return Ok(CrossTrend::NoSymbols);
        }

        let mut conn = self.conn()?;
        let mut total = Decimal::ZERO;
        for symbol in &tracked {
            let row: Option<(String, String)> = daily_records::table
                .find((symbol.to_string(), date.to_string()))
                .select((daily_records::open, daily_records::close))
                .first(&mut conn)
                .optional()
                .map_err(db_error)?;

            match row {
                Some((open, close)) => {
                    total += parse_price(&close)? - parse_price(&open)?;
                }
                None => {
                    return Ok(CrossTrend::MissingRecord {
                        symbol: symbol.clone(),
                    })
                }
            }
        }

        let count = Decimal::from(tracked.len() as u64);
        Ok(CrossTrend::Average(total / count))
    }
}

fn db_error(e: DieselError) -> StoreError {
    StoreError::Database(e.to_string())
}

fn insert_error(symbol: &Symbol, e: DieselError) -> StoreError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::DuplicateSymbol {
                symbol: symbol.to_string(),
            }
        }
        other => StoreError::Database(other.to_string()),
    }
}
