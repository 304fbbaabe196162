//! mercato-yfinance
//!
//! Connector that implements the mercato history and news contracts on top
//! of the `yfinance-rs` client library.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `yfinance-rs`.
pub mod adapter;

use std::sync::Arc;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{RealAdapter, YfHistory, YfNews};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mercato_core::{
    CandleRow, FetchWindow, HistoryProvider, IndexCode, MercatoConnector, MercatoError, NewsItem,
    NewsProvider,
};
use paft::market::requests::history::Interval;
use yfinance_rs as yf;

#[cfg(not(feature = "test-adapters"))]
type AdapterArc = Arc<RealAdapter>;

#[cfg(feature = "test-adapters")]
type HistoryAdapter = Arc<dyn YfHistory>;
#[cfg(not(feature = "test-adapters"))]
type HistoryAdapter = AdapterArc;

#[cfg(feature = "test-adapters")]
type NewsAdapter = Arc<dyn YfNews>;
#[cfg(not(feature = "test-adapters"))]
type NewsAdapter = AdapterArc;

/// Public connector type. Production users will construct with
/// `YfConnector::new_default()`.
pub struct YfConnector {
    history: HistoryAdapter,
    news: NewsAdapter,
}

impl YfConnector {
    /// Build with a fresh `yfinance_rs::YfClient` inside.
    #[must_use]
    pub fn new_default() -> Self {
        let a = RealAdapter::new_default();
        Self::from_adapter(&a)
    }

    /// Build from an existing `yfinance_rs::YfClient`.
    #[must_use]
    pub fn new_with_client(client: yf::YfClient) -> Self {
        let a = RealAdapter::new(client);
        Self::from_adapter(&a)
    }

    /// For tests/injection (requires the `test-adapters` feature).
    ///
    /// Accepts a borrowed adapter to avoid unnecessary moves.
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(adapter: &A) -> Self {
        Self {
            history: adapter.clone_arc_history(),
            news: adapter.clone_arc_news(),
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter` by cloning it into shared handles.
    pub fn from_adapter(adapter: &RealAdapter) -> Self {
        let shared = Arc::new(adapter.clone());
        Self {
            history: Arc::clone(&shared),
            news: shared,
        }
    }
}

/// Parse a lookback period in Yahoo notation (`7d`, `3mo`, `10y`) into a
/// duration relative to now.
fn parse_period(s: &str) -> Result<Duration, MercatoError> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .filter(|&i| i > 0)
        .ok_or_else(|| MercatoError::InvalidArg(format!("invalid period: {s}")))?;
    let (n, unit) = s.split_at(split);
    let n: i64 = n
        .parse()
        .map_err(|_| MercatoError::InvalidArg(format!("invalid period: {s}")))?;
    match unit {
        "d" => Ok(Duration::days(n)),
        "wk" | "w" => Ok(Duration::weeks(n)),
        "mo" => Ok(Duration::days(n * 30)),
        "y" => Ok(Duration::days(n * 365)),
        _ => Err(MercatoError::InvalidArg(format!("invalid period: {s}"))),
    }
}

/// Parse a sampling interval in Yahoo notation into the provider's
/// `Interval` enum.
fn parse_interval(s: &str) -> Result<Interval, MercatoError> {
    match s.trim() {
        "1m" => Ok(Interval::I1m),
        "2m" => Ok(Interval::I2m),
        "5m" => Ok(Interval::I5m),
        "15m" => Ok(Interval::I15m),
        "30m" => Ok(Interval::I30m),
        "90m" => Ok(Interval::I90m),
        "1h" => Ok(Interval::I1h),
        "1d" => Ok(Interval::D1),
        "5d" => Ok(Interval::D5),
        "1wk" => Ok(Interval::W1),
        "1mo" => Ok(Interval::M1),
        "3mo" => Ok(Interval::M3),
        other => Err(MercatoError::InvalidArg(format!(
            "invalid interval: {other}"
        ))),
    }
}

fn to_candle_rows(code: IndexCode, resp: yf::HistoryResponse) -> Vec<CandleRow> {
    resp.candles
        .into_iter()
        .map(|c| CandleRow {
            code,
            ts: c.ts,
            open: c.open.amount(),
            high: c.high.amount(),
            low: c.low.amount(),
            close: c.close.amount(),
            volume: c.volume,
        })
        .collect()
}

#[async_trait]
impl HistoryProvider for YfConnector {
    async fn history(
        &self,
        code: IndexCode,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<CandleRow>, MercatoError> {
        let lookback = parse_period(&window.period)?;
        let interval = parse_interval(&window.interval)?;
        let end = Utc::now();
        let start = end - lookback;
        let yf_req = yf::core::services::HistoryRequest {
            range: None,
            period: Some((start.timestamp(), end.timestamp())),
            interval,
            include_prepost: false,
            include_actions: false,
            auto_adjust: true,
            keepna: false,
        };
        let raw = self.history.fetch_full(symbol, yf_req).await?;
        Ok(to_candle_rows(code, raw))
    }
}

#[async_trait]
impl NewsProvider for YfConnector {
    async fn news(
        &self,
        code: IndexCode,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, MercatoError> {
        let articles = self.news.news(symbol, limit).await?;
        // Articles without a canonical link cannot be keyed in storage and
        // are dropped.
        Ok(articles
            .into_iter()
            .filter_map(|a| {
                let url = a.link?;
                Some(NewsItem {
                    code,
                    title: a.title,
                    summary: None,
                    url,
                    published_at: Some(a.published_at),
                })
            })
            .take(limit)
            .collect())
    }
}

impl MercatoConnector for YfConnector {
    fn name(&self) -> &'static str {
        "mercato-yfinance"
    }
    fn vendor(&self) -> &'static str {
        "Yahoo Finance"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}
