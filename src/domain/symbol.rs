//! Validated ticker symbols.
//!
//! Symbols end up in SQL value contexts and in export file names, so they
//! are restricted to a safe identifier alphabet at construction time instead
//! of being interpolated as free-form strings.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest ticker the provider serves; anything longer is garbage input.
const MAX_SYMBOL_LEN: usize = 12;

/// Validation failures for ticker symbols.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SymbolError {
    #[error("symbol cannot be empty")]
    Empty,

    #[error("symbol '{0}' exceeds {MAX_SYMBOL_LEN} characters")]
    TooLong(String),

    #[error("symbol '{0}' contains characters outside [A-Za-z0-9.-]")]
    InvalidCharacter(String),
}

/// A validated, uppercased ticker identifier for a tracked company.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Validate and normalize a raw ticker string.
    ///
    /// Accepts ASCII alphanumerics plus `.` and `-` (as in `BRK.B`), at most
    /// [`MAX_SYMBOL_LEN`] characters, and stores the uppercase form.
    ///
    /// # Errors
    /// Returns a [`SymbolError`] describing the first rule violated.
    pub fn new(raw: &str) -> Result<Self, SymbolError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SymbolError::Empty);
        }
        if trimmed.len() > MAX_SYMBOL_LEN {
            return Err(SymbolError::TooLong(trimmed.to_string()));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(SymbolError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalized ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Metadata row for a tracked company: the ticker and the most recent date
/// for which price data is stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolMeta {
    pub symbol: Symbol,
    pub last_refreshed: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_uppercases_plain_tickers() {
        let symbol = Symbol::new("msft").unwrap();
        assert_eq!(symbol.as_str(), "MSFT");
    }

    #[test]
    fn accepts_class_share_tickers() {
        assert_eq!(Symbol::new("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Symbol::new("BF-B").unwrap().as_str(), "BF-B");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(Symbol::new("  ibm ").unwrap().as_str(), "IBM");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Symbol::new("   "), Err(SymbolError::Empty));
    }

    #[test]
    fn rejects_oversized_input() {
        let raw = "A".repeat(13);
        assert!(matches!(Symbol::new(&raw), Err(SymbolError::TooLong(_))));
    }

    #[test]
    fn rejects_injection_shaped_input() {
        for raw in ["ACME;DROP", "ACME'--", "A B", "ACME)"] {
            assert!(
                matches!(Symbol::new(raw), Err(SymbolError::InvalidCharacter(_))),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn serde_round_trip_preserves_normalization() {
        let symbol: Symbol = serde_json::from_str("\"acme\"").unwrap();
        assert_eq!(symbol.as_str(), "ACME");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"ACME\"");
    }
}
