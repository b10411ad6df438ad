//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Daily equity price ledger with incremental refresh and trend statistics
#[derive(Parser, Debug)]
#[command(name = "stockledger")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "stockledger.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a new company's full price history
    Load {
        /// Ticker symbol, e.g. MSFT
        symbol: String,
    },

    /// Refresh all tracked companies with newly available data
    Refresh,

    /// Fetch one stored daily record (writes the JSON audit export)
    Record {
        /// Ticker symbol
        symbol: String,
        /// Trading date, YYYY-MM-DD
        date: NaiveDate,
    },

    /// Show the per-day trend series for a company
    Trend {
        /// Ticker symbol
        symbol: String,
    },

    /// Average trend across all tracked companies for one date
    AvgTrend {
        /// Trading date, YYYY-MM-DD
        date: NaiveDate,
    },

    /// Longest run of strictly positive trend days for a company
    TrendPeriod {
        /// Ticker symbol
        symbol: String,
    },

    /// List tracked companies with their refresh dates
    Symbols,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `stockledger config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a configuration template to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Display the effective configuration with defaults applied
    Show,
    /// Validate the configuration file
    Validate,
}
