//! mercato-investing
//!
//! Scraping connector for the investing news/quotes site. Serves three
//! capabilities from static page fetches: the site-wide major-indices
//! snapshot table, per-index technical summaries, and per-index news
//! listings.
//!
//! Fetching and parsing are split: `parse` holds pure extraction functions
//! over HTML, and the connector wires them to an HTTP client.
#![warn(missing_docs)]

/// Pure HTML extraction functions.
pub mod parse;

use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use mercato_core::{
    IndexCode, MercatoConnector, MercatoError, NewsItem, NewsProvider, SnapshotProvider,
    SnapshotRow, TechnicalSummary, TechnicalsProvider,
};

const DEFAULT_BASE: &str = "https://www.investing.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Public connector type for the investing site.
pub struct InvestingConnector {
    http: reqwest::Client,
    base: Url,
}

impl InvestingConnector {
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
            .expect("Failed to build reqwest client for InvestingConnector");
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
            .map_err(|e| MercatoError::connector("mercato-investing", e.to_string()))?;
        Ok(Self { http, base })
    }

    async fn fetch_page(&self, path: &str) -> Result<String, MercatoError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| MercatoError::InvalidArg(format!("url path {path}: {e}")))?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MercatoError::connector("mercato-investing", e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MercatoError::connector(
                "mercato-investing",
                format!("status {status} for {url}"),
            ));
        }
        resp.text()
            .await
            .map_err(|e| MercatoError::connector("mercato-investing", e.to_string()))
    }
}

#[async_trait]
impl SnapshotProvider for InvestingConnector {
    async fn snapshots(&self) -> Result<Vec<SnapshotRow>, MercatoError> {
        let html = self.fetch_page("/indices/major-indices").await?;
        parse::parse_major_indices(&html)
    }
}

#[async_trait]
impl TechnicalsProvider for InvestingConnector {
    async fn technicals(
        &self,
        code: IndexCode,
        symbol: &str,
    ) -> Result<TechnicalSummary, MercatoError> {
        let html = self
            .fetch_page(&format!("/indices/{symbol}-technical"))
            .await?;
        let ratings = parse::parse_technicals(&html)?;
        Ok(TechnicalSummary {
            code,
            ratings,
            captured_at: Utc::now(),
        })
    }
}

#[async_trait]
impl NewsProvider for InvestingConnector {
    async fn news(
        &self,
        code: IndexCode,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, MercatoError> {
        let html = self.fetch_page(&format!("/indices/{symbol}-news")).await?;
        let articles = parse::parse_news_list(&html);
        Ok(articles
            .into_iter()
            .take(limit)
            .map(|a| NewsItem {
                code,
                title: a.title,
                summary: a.summary,
                url: a.url,
                published_at: a.published_at,
            })
            .collect())
    }
}

impl MercatoConnector for InvestingConnector {
    fn name(&self) -> &'static str {
        "mercato-investing"
    }
    fn vendor(&self) -> &'static str {
        "Investing.com"
    }

    fn as_snapshot_provider(&self) -> Option<&dyn SnapshotProvider> {
        Some(self as &dyn SnapshotProvider)
    }

    fn as_technicals_provider(&self) -> Option<&dyn TechnicalsProvider> {
        Some(self as &dyn TechnicalsProvider)
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}
