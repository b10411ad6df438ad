//! stockledger - Daily equity price history with trend statistics.
//!
//! Fetches daily adjusted price history from a market-data provider,
//! persists it per company in SQLite, and derives per-day and
//! cross-company trend statistics.
//!
//! # Architecture
//!
//! - [`domain`] - Validated symbols, daily records, trend math
//! - [`provider`] - The [`provider::PriceProvider`] port and the
//!   Alpha Vantage HTTP adapter
//! - [`store`] - SQLite persistence behind typed results; sole writer of
//!   price data
//! - [`engine`] - Orchestration: first-time loads, incremental refresh,
//!   calendar-validated fetches, trend queries
//! - [`config`] - TOML configuration with env credential override
//! - [`error`] - Layered error types
//! - [`cli`] - Thin presentation layer over the engine

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod provider;
pub mod store;
