//! CLI output formatting.
//!
//! Human-readable lines with colored symbols, plus a JSON mode for
//! scripting. Severity is derived from typed error kinds, never from
//! message text.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde_json::json;

use crate::error::{EngineError, Error, ProviderError};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Global output configuration singleton.
static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags. Call once, early.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if config.quiet {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Print an informational line.
pub fn info(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("info", json!({ "message": message }));
        return;
    }
    if config.quiet {
        return;
    }
    println!("  {} {}", "·".cyan(), message);
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();
    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if config.quiet {
        return;
    }
    println!("  {:<18} {}", label.dimmed(), value);
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if config.quiet {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print an arbitrary JSON payload (JSON mode only).
pub fn payload(kind: &str, value: serde_json::Value) {
    if read_config().json {
        emit_json_line(kind, value);
    }
}

/// Severity categories the presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Expected user-facing condition: bad date, unknown record, empty
    /// ledger, unknown ticker, provider quota.
    Warning,
    /// Operational fault: transport, database, malformed data.
    Error,
}

/// Map a typed error to its severity. Switches on kind, never on text.
#[must_use]
pub fn severity_of(err: &Error) -> Severity {
    match err {
        Error::Engine(engine) => match engine {
            EngineError::FutureDate { .. }
            | EngineError::MarketClosed { .. }
            | EngineError::NotFound { .. }
            | EngineError::NoSymbols
            | EngineError::MissingRecord { .. } => Severity::Warning,
            EngineError::Provider(provider) => provider_severity(provider),
            EngineError::Store(_) => Severity::Error,
        },
        Error::Provider(provider) => provider_severity(provider),
        Error::Symbol(_) => Severity::Warning,
        _ => Severity::Error,
    }
}

fn provider_severity(err: &ProviderError) -> Severity {
    match err {
        ProviderError::InvalidSymbol { .. } | ProviderError::RateLimited { .. } => {
            Severity::Warning
        }
        ProviderError::Malformed { .. } | ProviderError::Http(_) => Severity::Error,
    }
}

/// Print a failure with severity-appropriate styling to stderr.
pub fn report(err: &Error) {
    let config = read_config();
    let severity = severity_of(err);

    if config.json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": {
                    "severity": match severity {
                        Severity::Warning => "warning",
                        Severity::Error => "error",
                    },
                    "message": err.to_string(),
                },
            })
        );
        return;
    }

    match severity {
        Severity::Warning => eprintln!("  {} {}", "⚠".yellow(), err),
        Severity::Error => eprintln!("  {} {}", "×".red(), err),
    }
}
