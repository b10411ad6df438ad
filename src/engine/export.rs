//! JSON export side channel for single-record fetches.
//!
//! Every successful record fetch drops an audit document into the export
//! directory. This is a logging side effect, not a queryable interface.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::domain::{DailyRecord, Symbol};
use crate::error::Result;

/// Wire-compatible envelope: `{"symbol": ..., "Stock_record": {...}}`.
#[derive(Serialize)]
struct ExportEnvelope<'a> {
    symbol: &'a Symbol,
    #[serde(rename = "Stock_record")]
    stock_record: &'a DailyRecord,
}

/// Write `record` to `<dir>/<SYMBOL>_<timestamp>.json`, creating the
/// directory on demand. Returns the path written.
pub fn export_record(dir: &Path, symbol: &Symbol, record: &DailyRecord) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let filename = format!("{}_{}.json", symbol, Utc::now().format("%Y%m%d%H%M%S%3f"));
    let path = dir.join(filename);

    let envelope = ExportEnvelope {
        symbol,
        stock_record: record,
    };
    let body = serde_json::to_string_pretty(&envelope)?;
    std::fs::write(&path, body)?;

    info!(%symbol, path = %path.display(), "Exported record");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> (Symbol, DailyRecord) {
        let symbol = Symbol::new("ACME").unwrap();
        let record = DailyRecord {
            recorded_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            open: dec!(100.00),
            high: dec!(102.50),
            low: dec!(99.10),
            close: dec!(101.25),
            adjusted_close: dec!(101.25),
            volume: 1_234_567,
            dividend_amount: dec!(0),
            split_coefficient: dec!(1),
        };
        (symbol, record)
    }

    #[test]
    fn export_writes_wire_compatible_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let (symbol, record) = sample();

        let path = export_record(dir.path(), &symbol, &record).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ACME_"));
        assert!(name.ends_with(".json"));

        let body: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(body["symbol"], "ACME");
        assert_eq!(body["Stock_record"]["recorded_date"], "2024-03-01");
        assert_eq!(body["Stock_record"]["volume"], 1_234_567);
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("audit").join("records");
        let (symbol, record) = sample();

        let path = export_record(&nested, &symbol, &record).unwrap();
        assert!(path.exists());
    }
}
