use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Symbol;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors reported by the market-data provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider does not know the requested ticker.
    #[error("invalid symbol '{symbol}': provider has no such ticker")]
    InvalidSymbol { symbol: String },

    /// The provider's call-frequency quota is exhausted.
    #[error("rate limited by provider: {note}")]
    RateLimited { note: String },

    /// The response body did not match the expected wire shape.
    #[error("malformed provider response: {reason}")]
    Malformed { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced by the persistence layer.
///
/// Every store fault is a typed variant; "no rows" is expressed as
/// `Option::None` from the individual operations, never as an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    /// The symbols table already holds a row for this ticker. Doubles as
    /// the idempotent-insert guard against two concurrent loads.
    #[error("symbol '{symbol}' is already registered")]
    DuplicateSymbol { symbol: String },

    /// A stored value failed to parse back into its domain type.
    #[error("corrupt stored value: {reason}")]
    Corrupt { reason: String },
}

/// Engine-level outcomes that the presentation layer switches on by kind.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no price data can exist for the future date {date}")]
    FutureDate { date: NaiveDate },

    #[error("market closed on {date}: weekend")]
    MarketClosed { date: NaiveDate },

    #[error("no record stored for {symbol} on {date}")]
    NotFound { symbol: Symbol, date: NaiveDate },

    #[error("no companies loaded yet")]
    NoSymbols,

    #[error("{symbol} has no record for {date}, cross-company average unavailable")]
    MissingRecord { symbol: Symbol, date: NaiveDate },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Symbol(#[from] crate::domain::SymbolError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_render_their_context() {
        let err = ProviderError::InvalidSymbol {
            symbol: "BOGUS".into(),
        };
        assert!(err.to_string().contains("BOGUS"));

        let err = ProviderError::RateLimited {
            note: "5 calls per minute".into(),
        };
        assert!(err.to_string().contains("5 calls per minute"));
    }

    #[test]
    fn engine_error_wraps_store_error_transparently() {
        let store = StoreError::Database("locked".into());
        let engine: EngineError = store.into();
        assert_eq!(engine.to_string(), "database error: locked");
    }
}
