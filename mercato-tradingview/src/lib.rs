//! mercato-tradingview
//!
//! Scraping connector for the charting site's per-index components pages.
//! A static fetch returns the server-rendered first page of constituents;
//! pagination beyond that requires a browser session and is out of scope.
#![warn(missing_docs)]

/// Pure HTML extraction functions.
pub mod parse;

use async_trait::async_trait;
use url::Url;

use mercato_core::{
    ComponentRow, ComponentsProvider, IndexCode, MercatoConnector, MercatoError,
};

const DEFAULT_BASE: &str = "https://www.tradingview.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Public connector type for the charting site.
pub struct TradingViewConnector {
    http: reqwest::Client,
    base: Url,
}

impl TradingViewConnector {
    /// Build with a fresh HTTP client against the production site.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be constructed, which is unexpected
    /// in normal environments.
    #[must_use]
    pub fn new_default() -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build reqwest client for TradingViewConnector");
        Self {
            http,
            base: Url::parse(DEFAULT_BASE).expect("default base url parses"),
        }
    }

    /// Build against an alternate base URL (tests, proxies).
    ///
    /// # Errors
    /// Returns `InvalidArg` when `base` is not a valid URL.
    pub fn with_base_url(base: &str) -> Result<Self, MercatoError> {
        let base =
            Url::parse(base).map_err(|e| MercatoError::InvalidArg(format!("base url: {e}")))?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MercatoError::connector("mercato-tradingview", e.to_string()))?;
        Ok(Self { http, base })
    }
}

#[async_trait]
impl ComponentsProvider for TradingViewConnector {
    async fn components(
        &self,
        code: IndexCode,
        symbol: &str,
    ) -> Result<Vec<ComponentRow>, MercatoError> {
        let url = self
            .base
            .join(&format!("/symbols/{symbol}/components/"))
            .map_err(|e| MercatoError::InvalidArg(format!("components url: {e}")))?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MercatoError::connector("mercato-tradingview", e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MercatoError::connector(
                "mercato-tradingview",
                format!("status {status} for {url}"),
            ));
        }
        let html = resp
            .text()
            .await
            .map_err(|e| MercatoError::connector("mercato-tradingview", e.to_string()))?;
        let rows = parse::parse_components(&html)?;
        tracing::debug!(%code, %symbol, rows = rows.len(), "parsed components table");
        Ok(rows)
    }
}

impl MercatoConnector for TradingViewConnector {
    fn name(&self) -> &'static str {
        "mercato-tradingview"
    }
    fn vendor(&self) -> &'static str {
        "TradingView"
    }

    fn as_components_provider(&self) -> Option<&dyn ComponentsProvider> {
        Some(self as &dyn ComponentsProvider)
    }
}
