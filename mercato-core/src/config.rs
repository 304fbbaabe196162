//! Configuration model for the collection jobs.
//!
//! The configuration is a single YAML document (`config.yaml` by
//! convention). Its symbol sections feed the [`SymbolRegistry`]; the scalar
//! settings are passed through unchanged to the fetch jobs, and the core
//! attaches no semantics to them.
//!
//! [`SymbolRegistry`]: crate::registry::SymbolRegistry

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MercatoError;
use crate::registry::IndexCode;

/// Lookback window plus sampling interval for a history fetch, in the
/// provider's own notation (e.g. `7d` / `1m`). Opaque to the core; parsed
/// at the provider boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    /// How far back to fetch (e.g. `7d`, `10y`).
    pub period: String,
    /// Sampling interval (e.g. `1m`, `1d`).
    pub interval: String,
}

/// The symbol-mapping sections of the configuration, one per provider
/// namespace.
///
/// Three sections run code-to-symbol; `symbols_investing_names` runs
/// label-to-code. That inversion mirrors the source data and is preserved
/// deliberately (see [`SymbolRegistry::resolve_label`]).
///
/// [`SymbolRegistry::resolve_label`]: crate::registry::SymbolRegistry::resolve_label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolsConfig {
    /// Yahoo Finance tickers per canonical code.
    #[serde(default)]
    pub symbols_yfinance: BTreeMap<IndexCode, String>,
    /// Charting-site symbols per canonical code.
    #[serde(default)]
    pub symbols_tradingview: BTreeMap<IndexCode, String>,
    /// Investing-site URL slugs per canonical code.
    #[serde(default)]
    pub symbols_news_investing: BTreeMap<IndexCode, String>,
    /// Investing-site display labels, mapping label back to canonical code.
    #[serde(default)]
    pub symbols_investing_names: BTreeMap<String, IndexCode>,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Symbol maps, one section per provider namespace.
    #[serde(flatten)]
    pub symbols: SymbolsConfig,

    /// Intraday lookback window.
    #[serde(default = "default_minute_period")]
    pub minute_period: String,
    /// Intraday sampling interval.
    #[serde(default = "default_minute_interval")]
    pub minute_interval: String,
    /// Long-horizon lookback window.
    #[serde(default = "default_daily_period")]
    pub daily_period: String,
    /// Long-horizon sampling interval.
    #[serde(default = "default_daily_interval")]
    pub daily_interval: String,
    /// Directory for CSV artifacts written by the jobs.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

fn default_minute_period() -> String {
    "7d".to_string()
}
fn default_minute_interval() -> String {
    "1m".to_string()
}
fn default_daily_period() -> String {
    "10y".to_string()
}
fn default_daily_interval() -> String {
    "1d".to_string()
}
fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

impl AppConfig {
    /// Load and parse the configuration from a YAML file.
    ///
    /// # Errors
    /// Returns [`MercatoError::Config`] when the file cannot be read or the
    /// document does not match the expected shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MercatoError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MercatoError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&raw)
    }

    /// Parse a YAML configuration document.
    ///
    /// # Errors
    /// Returns [`MercatoError::Config`] on malformed YAML or unknown index
    /// codes in the symbol sections.
    pub fn parse(raw: &str) -> Result<Self, MercatoError> {
        serde_yml::from_str(raw).map_err(|e| MercatoError::config(e.to_string()))
    }

    /// The intraday fetch window (`minute_period` / `minute_interval`).
    #[must_use]
    pub fn minute_window(&self) -> FetchWindow {
        FetchWindow {
            period: self.minute_period.clone(),
            interval: self.minute_interval.clone(),
        }
    }

    /// The long-horizon fetch window (`daily_period` / `daily_interval`).
    #[must_use]
    pub fn daily_window(&self) -> FetchWindow {
        FetchWindow {
            period: self.daily_period.clone(),
            interval: self.daily_interval.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbol_sections_and_scalars() {
        let yaml = r#"
symbols_yfinance:
  SPX500: "^GSPC"
  US30: "^DJI"
symbols_tradingview:
  SPX500: "SPX"
symbols_news_investing:
  SPX500: "us-spx-500"
symbols_investing_names:
  "S&P 500": SPX500
minute_period: "5d"
output_directory: "out"
"#;
        let cfg = AppConfig::parse(yaml).unwrap();
        assert_eq!(
            cfg.symbols.symbols_yfinance.get(&IndexCode::Spx500).unwrap(),
            "^GSPC"
        );
        assert_eq!(
            cfg.symbols.symbols_investing_names.get("S&P 500"),
            Some(&IndexCode::Spx500)
        );
        // Explicit scalar wins; omitted scalars fall back to defaults.
        assert_eq!(cfg.minute_period, "5d");
        assert_eq!(cfg.minute_interval, "1m");
        assert_eq!(cfg.daily_window().period, "10y");
        assert_eq!(cfg.output_directory, PathBuf::from("out"));
    }

    #[test]
    fn unknown_index_code_in_a_section_is_a_config_error() {
        let yaml = r#"
symbols_yfinance:
  SPX999: "^GSPC"
"#;
        let err = AppConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, MercatoError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = AppConfig::load("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, MercatoError::Config(_)));
    }
}
