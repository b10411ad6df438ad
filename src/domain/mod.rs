//! Domain types: validated symbols, daily price records, trend statistics.

pub mod record;
pub mod symbol;
pub mod trend;

pub use record::DailyRecord;
pub use symbol::{Symbol, SymbolError, SymbolMeta};
pub use trend::{longest_positive_run, TrendPoint, TrendRun};
