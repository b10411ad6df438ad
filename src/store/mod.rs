//! Persistence layer: schema ownership and all read/write access.
//!
//! The store is the sole writer of price data; the engine never touches rows
//! directly. All faults surface as typed [`StoreError`](crate::error::StoreError)
//! values; "no rows" is `Option::None` or a dedicated variant, never an error.

pub mod db;
pub mod sqlite;

use rust_decimal::Decimal;

use crate::domain::Symbol;

pub use sqlite::SqliteStore;

/// Outcome of the cross-company trend query for one date.
///
/// The three cases are deliberately distinct: an empty ledger and a company
/// missing that date's record are different answers, not the same sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossTrend {
    /// Average of close minus open across all tracked companies.
    Average(Decimal),
    /// No companies are tracked yet.
    NoSymbols,
    /// A tracked company has no record for the requested date.
    MissingRecord { symbol: Symbol },
}
