//! CLI dispatch: wires config, store, provider, and engine together and
//! renders engine outcomes.

use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use super::command::{Cli, Commands, ConfigCommand};
use super::output::{self, OutputConfig};
use crate::config::Config;
use crate::domain::Symbol;
use crate::engine::{Engine, LoadOutcome};
use crate::error::{ConfigError, Result};
use crate::provider::AlphaVantageClient;
use crate::store::{db, SqliteStore};

/// Entry point called from `main` with parsed arguments.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
    });

    match cli.command {
        Commands::Config(command) => config_command(command, &cli.config),
        command => {
            let config = Config::load(&cli.config)?;
            config.init_logging();
            let engine = build_engine(&config)?;
            dispatch(command, &engine).await
        }
    }
}

fn build_engine(config: &Config) -> Result<Engine<AlphaVantageClient>> {
    let pool = db::create_pool(&config.database.path.to_string_lossy())?;
    db::run_migrations(&pool)?;
    let store = SqliteStore::new(pool);
    let provider = AlphaVantageClient::from_config(&config.provider);
    Ok(Engine::new(provider, store, config.export.dir.clone()))
}

async fn dispatch(command: Commands, engine: &Engine<AlphaVantageClient>) -> Result<()> {
    match command {
        Commands::Load { symbol } => {
            let symbol = Symbol::new(&symbol)?;
            match engine.load_company(&symbol).await? {
                LoadOutcome::Loaded {
                    rows,
                    last_refreshed,
                } => {
                    output::payload(
                        "loaded",
                        json!({ "symbol": &symbol, "rows": rows, "last_refreshed": last_refreshed }),
                    );
                    output::success(&format!(
                        "loaded {symbol}: {rows} records through {last_refreshed}"
                    ));
                }
                LoadOutcome::AlreadyLoaded => {
                    output::payload("already_loaded", json!({ "symbol": &symbol }));
                    output::info(&format!("{symbol} is already loaded"));
                }
            }
        }

        Commands::Refresh => {
            let summary = engine.refresh_all().await?;
            output::payload("refresh", serde_json::to_value(&summary)?);
            for refreshed in &summary.refreshed {
                output::success(&format!(
                    "{}: {} new records through {}",
                    refreshed.symbol, refreshed.rows, refreshed.last_refreshed
                ));
            }
            for symbol in &summary.unchanged {
                output::info(&format!("{symbol} is up to date"));
            }
            for failed in &summary.failed {
                output::field(failed.symbol.as_str(), format!("failed: {}", failed.reason));
            }
        }

        Commands::Record { symbol, date } => {
            let symbol = Symbol::new(&symbol)?;
            let record = engine.fetch_record(&symbol, date)?;
            output::payload(
                "record",
                json!({ "symbol": &symbol, "record": &record }),
            );
            output::section(&format!("{symbol} {date}"));
            output::field("open", record.open);
            output::field("high", record.high);
            output::field("low", record.low);
            output::field("close", record.close);
            output::field("adjusted close", record.adjusted_close);
            output::field("volume", record.volume);
            output::field("dividend", record.dividend_amount);
            output::field("split", record.split_coefficient);
        }

        Commands::Trend { symbol } => {
            let symbol = Symbol::new(&symbol)?;
            let series = engine.trend_series(&symbol)?;
            output::payload("trend", serde_json::to_value(&series)?);
            if !output::is_json() {
                let lines: Vec<TrendLine> = series
                    .iter()
                    .map(|point| TrendLine {
                        date: point.date.to_string(),
                        trend: point.trend.to_string(),
                    })
                    .collect();
                print_table(Table::new(lines));
            }
        }

        Commands::AvgTrend { date } => {
            let average = engine.avg_trend(date)?;
            output::payload("avg_trend", json!({ "date": date, "average": average }));
            output::field(&date.to_string(), average.round_dp(4));
        }

        Commands::TrendPeriod { symbol } => {
            let symbol = Symbol::new(&symbol)?;
            match engine.trend_period(&symbol)? {
                Some(run) => {
                    output::payload("trend_period", serde_json::to_value(run)?);
                    output::success(&format!(
                        "{symbol}: {} positive days, {} through {}",
                        run.days, run.start, run.end
                    ));
                }
                None => {
                    output::payload("trend_period", json!(null));
                    output::info(&format!("{symbol} has no positive trend run"));
                }
            }
        }

        Commands::Symbols => {
            let metas = engine.refresh_dates()?;
            output::payload("symbols", serde_json::to_value(&metas)?);
            if !output::is_json() {
                if metas.is_empty() {
                    output::info("no companies loaded yet");
                } else {
                    let lines: Vec<SymbolLine> = metas
                        .iter()
                        .map(|meta| SymbolLine {
                            symbol: meta.symbol.to_string(),
                            last_refreshed: meta.last_refreshed.to_string(),
                        })
                        .collect();
                    print_table(Table::new(lines));
                }
            }
        }

        // Handled before the engine is built.
        Commands::Config(_) => unreachable!("config commands dispatch earlier"),
    }

    Ok(())
}

fn config_command(command: ConfigCommand, path: &std::path::Path) -> Result<()> {
    match command {
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(ConfigError::InvalidValue {
                    field: "config",
                    reason: format!("{} exists, pass --force to overwrite", path.display()),
                }
                .into());
            }
            std::fs::write(path, Config::template())?;
            output::success(&format!("wrote {}", path.display()));
            Ok(())
        }
        ConfigCommand::Show => {
            let config = Config::load(path)?;
            output::section("provider");
            output::field("api_url", &config.provider.api_url);
            output::field("api_key", mask(&config.provider.api_key));
            output::field("timeout_ms", config.provider.timeout_ms);
            output::section("database");
            output::field("path", config.database.path.display());
            output::section("export");
            output::field("dir", config.export.dir.display());
            output::section("logging");
            output::field("level", &config.logging.level);
            output::field("format", &config.logging.format);
            Ok(())
        }
        ConfigCommand::Validate => {
            Config::load(path)?;
            output::success("configuration is valid");
            Ok(())
        }
    }
}

fn print_table(mut table: Table) {
    table.with(Style::rounded());
    println!("{table}");
}

/// Credentials are shown truncated, never in full.
fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".into()
    } else {
        let head: String = secret.chars().take(4).collect();
        format!("{head}****")
    }
}

#[derive(Tabled)]
struct SymbolLine {
    #[tabled(rename = "symbol")]
    symbol: String,
    #[tabled(rename = "last refreshed")]
    last_refreshed: String,
}

#[derive(Tabled)]
struct TrendLine {
    #[tabled(rename = "date")]
    date: String,
    #[tabled(rename = "trend")]
    trend: String,
}
