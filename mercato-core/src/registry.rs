//! The canonical index universe and the cross-provider symbol registry.
//!
//! Every fetch job operates on the same fixed set of ten market indices,
//! identified by [`IndexCode`]. External providers each speak their own
//! symbol vocabulary; the [`SymbolRegistry`] translates between the
//! canonical codes and each provider's notation.
//!
//! The registry is built once from configuration, is immutable afterwards,
//! and may be shared across concurrently running jobs without
//! synchronization.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SymbolsConfig;
use crate::error::MercatoError;

/// Canonical identifier for a tracked market index.
///
/// Closed enumeration: the universe is fixed at these ten values and never
/// grows or shrinks at runtime. The serde representation matches the
/// spelling used in configuration files and storage rows (e.g. `SPX500`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexCode {
    /// Australian S&P/ASX 200.
    #[serde(rename = "AUS200")]
    Aus200,
    /// Spanish IBEX 35.
    #[serde(rename = "ESP35")]
    Esp35,
    /// Euro Stoxx 50.
    #[serde(rename = "EUSTX50")]
    Eustx50,
    /// French CAC 40.
    #[serde(rename = "FRA40")]
    Fra40,
    /// German DAX.
    #[serde(rename = "GER40")]
    Ger40,
    /// Japanese Nikkei 225.
    #[serde(rename = "JPN225")]
    Jpn225,
    /// Nasdaq 100.
    #[serde(rename = "NAS100")]
    Nas100,
    /// S&P 500.
    #[serde(rename = "SPX500")]
    Spx500,
    /// UK FTSE 100.
    #[serde(rename = "UK100")]
    Uk100,
    /// Dow Jones Industrial Average.
    #[serde(rename = "US30")]
    Us30,
}

impl IndexCode {
    /// The full index universe, in canonical (alphabetical) order.
    pub const ALL: [Self; 10] = [
        Self::Aus200,
        Self::Esp35,
        Self::Eustx50,
        Self::Fra40,
        Self::Ger40,
        Self::Jpn225,
        Self::Nas100,
        Self::Spx500,
        Self::Uk100,
        Self::Us30,
    ];

    /// Canonical string spelling, as used in configuration and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aus200 => "AUS200",
            Self::Esp35 => "ESP35",
            Self::Eustx50 => "EUSTX50",
            Self::Fra40 => "FRA40",
            Self::Ger40 => "GER40",
            Self::Jpn225 => "JPN225",
            Self::Nas100 => "NAS100",
            Self::Spx500 => "SPX500",
            Self::Uk100 => "UK100",
            Self::Us30 => "US30",
        }
    }
}

impl fmt::Display for IndexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexCode {
    type Err = MercatoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| MercatoError::InvalidArg(format!("unknown index code: {s}")))
    }
}

/// Forward provider namespaces: canonical code in, provider symbol out.
///
/// The display-label vocabulary of the investing site runs in the opposite
/// direction (label to code) and is deliberately *not* part of this enum;
/// see [`SymbolRegistry::resolve_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Yahoo Finance caret-style tickers (e.g. `^GSPC`).
    Yahoo,
    /// Charting-site EXCHANGE-CODE symbols (e.g. `NASDAQ-NDX`).
    TradingView,
    /// Investing-site URL slugs (e.g. `us-spx-500`).
    InvestingSlug,
}

impl Namespace {
    /// Stable name used in error messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yfinance",
            Self::TradingView => "tradingview",
            Self::InvestingSlug => "investing",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable cross-provider symbol mapping.
///
/// One forward map per provider namespace plus the inverse display-label
/// map. Constructed once from [`SymbolsConfig`] and read-only afterwards;
/// lookups never mutate, so a shared reference can serve any number of
/// concurrent jobs.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    yahoo: BTreeMap<IndexCode, String>,
    tradingview: BTreeMap<IndexCode, String>,
    investing_slug: BTreeMap<IndexCode, String>,
    labels: BTreeMap<String, IndexCode>,
}

impl SymbolRegistry {
    /// Build a registry from the symbol sections of the configuration.
    ///
    /// Validates that provider symbols are unique within each namespace; a
    /// collision would make reverse attribution ambiguous, so it is
    /// rejected as a configuration error rather than silently accepted.
    ///
    /// Entries may be missing (a code without a symbol in some namespace is
    /// a valid, if incomplete, configuration); the omission surfaces later
    /// as a [`MercatoError::LookupMiss`] from [`resolve`](Self::resolve).
    pub fn from_config(cfg: &SymbolsConfig) -> Result<Self, MercatoError> {
        for (ns, map) in [
            (Namespace::Yahoo, &cfg.symbols_yfinance),
            (Namespace::TradingView, &cfg.symbols_tradingview),
            (Namespace::InvestingSlug, &cfg.symbols_news_investing),
        ] {
            let mut seen = HashSet::new();
            for symbol in map.values() {
                if symbol.trim().is_empty() {
                    return Err(MercatoError::config(format!(
                        "empty symbol in {ns} namespace"
                    )));
                }
                if !seen.insert(symbol.as_str()) {
                    return Err(MercatoError::config(format!(
                        "duplicate symbol \"{symbol}\" in {ns} namespace"
                    )));
                }
            }
        }

        Ok(Self {
            yahoo: cfg.symbols_yfinance.clone(),
            tradingview: cfg.symbols_tradingview.clone(),
            investing_slug: cfg.symbols_news_investing.clone(),
            labels: cfg.symbols_investing_names.clone(),
        })
    }

    /// Translate a canonical code into the symbol a provider expects.
    ///
    /// # Errors
    /// Returns [`MercatoError::LookupMiss`] when the code has no entry in
    /// the requested namespace. The miss is surfaced, never defaulted: a
    /// missing symbol means the corresponding external fetch cannot run.
    pub fn resolve(&self, code: IndexCode, ns: Namespace) -> Result<&str, MercatoError> {
        let map = match ns {
            Namespace::Yahoo => &self.yahoo,
            Namespace::TradingView => &self.tradingview,
            Namespace::InvestingSlug => &self.investing_slug,
        };
        map.get(&code)
            .map(String::as_str)
            .ok_or_else(|| MercatoError::lookup_miss(format!("{code} in {ns} namespace")))
    }

    /// Translate a provider display label back into a canonical code.
    ///
    /// This is the one namespace whose source data runs label-to-code; the
    /// inversion is intentional and kept as a distinct operation so callers
    /// cannot accidentally use the wrong direction.
    ///
    /// # Errors
    /// Returns [`MercatoError::LookupMiss`] for unrecognized labels.
    pub fn resolve_label(&self, label: &str) -> Result<IndexCode, MercatoError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| MercatoError::lookup_miss(format!("display label \"{label}\"")))
    }

    /// Enumerate the fixed index universe.
    ///
    /// Callers iterate this once per run ("for every tracked index, fetch
    /// from provider X"). The order is the canonical order of
    /// [`IndexCode::ALL`]; configuration insertion order is not a contract.
    pub fn codes(&self) -> impl Iterator<Item = IndexCode> {
        IndexCode::ALL.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    const CONFIG: &str = include_str!("../../config.yaml");

    fn registry() -> SymbolRegistry {
        let cfg = AppConfig::parse(CONFIG).expect("default config parses");
        SymbolRegistry::from_config(&cfg.symbols).expect("default config is consistent")
    }

    #[test]
    fn every_code_resolves_in_every_forward_namespace() {
        let reg = registry();
        for code in reg.codes() {
            for ns in [
                Namespace::Yahoo,
                Namespace::TradingView,
                Namespace::InvestingSlug,
            ] {
                let sym = reg.resolve(code, ns).unwrap_or_else(|e| {
                    panic!("{code} missing in {ns}: {e}");
                });
                assert!(!sym.is_empty());
            }
        }
    }

    #[test]
    fn worked_example_spx500() {
        let reg = registry();
        assert_eq!(reg.resolve(IndexCode::Spx500, Namespace::Yahoo).unwrap(), "^GSPC");
        assert_eq!(
            reg.resolve(IndexCode::Spx500, Namespace::TradingView).unwrap(),
            "SPX"
        );
        assert_eq!(
            reg.resolve(IndexCode::Spx500, Namespace::InvestingSlug).unwrap(),
            "us-spx-500"
        );
        assert_eq!(reg.resolve_label("S&P 500").unwrap(), IndexCode::Spx500);
    }

    #[test]
    fn label_to_code_to_slug_is_consistent() {
        let reg = registry();
        let cfg = AppConfig::parse(CONFIG).unwrap();
        for label in cfg.symbols.symbols_investing_names.keys() {
            let code = reg.resolve_label(label).unwrap();
            // Every labeled code must also carry a slug in the same provider's
            // forward namespace.
            reg.resolve(code, Namespace::InvestingSlug)
                .unwrap_or_else(|e| panic!("{label} -> {code} has no slug: {e}"));
        }
    }

    #[test]
    fn unknown_label_is_a_lookup_miss() {
        let reg = registry();
        let err = reg.resolve_label("Hang Seng").unwrap_err();
        assert!(err.is_lookup_miss());
    }

    #[test]
    fn missing_namespace_entry_is_a_lookup_miss_not_a_default() {
        let yaml = r#"
symbols_yfinance:
  SPX500: "^GSPC"
symbols_tradingview: {}
symbols_news_investing:
  SPX500: "us-spx-500"
symbols_investing_names:
  "S&P 500": SPX500
"#;
        let cfg: SymbolsConfig = serde_yml::from_str(yaml).unwrap();
        let reg = SymbolRegistry::from_config(&cfg).unwrap();
        let err = reg
            .resolve(IndexCode::Spx500, Namespace::TradingView)
            .unwrap_err();
        assert!(matches!(err, MercatoError::LookupMiss { .. }));
        // Sibling namespaces are unaffected.
        assert_eq!(reg.resolve(IndexCode::Spx500, Namespace::Yahoo).unwrap(), "^GSPC");
    }

    #[test]
    fn duplicate_symbol_within_a_namespace_is_rejected() {
        let yaml = r#"
symbols_yfinance:
  SPX500: "^GSPC"
  US30: "^GSPC"
symbols_tradingview: {}
symbols_news_investing: {}
symbols_investing_names: {}
"#;
        let cfg: SymbolsConfig = serde_yml::from_str(yaml).unwrap();
        let err = SymbolRegistry::from_config(&cfg).unwrap_err();
        assert!(matches!(err, MercatoError::Config(_)));
    }

    #[test]
    fn resolve_is_idempotent() {
        let reg = registry();
        let first = reg.resolve(IndexCode::Ger40, Namespace::Yahoo).unwrap().to_string();
        for _ in 0..3 {
            assert_eq!(reg.resolve(IndexCode::Ger40, Namespace::Yahoo).unwrap(), first);
        }
    }

    #[test]
    fn codes_is_the_ten_element_universe() {
        let reg = registry();
        let codes: Vec<_> = reg.codes().collect();
        assert_eq!(codes.len(), 10);
        let unique: std::collections::HashSet<_> = codes.iter().copied().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn index_code_round_trips_through_str() {
        for code in IndexCode::ALL {
            assert_eq!(code.as_str().parse::<IndexCode>().unwrap(), code);
        }
        assert!("SPX999".parse::<IndexCode>().is_err());
    }
}
