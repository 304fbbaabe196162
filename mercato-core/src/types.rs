//! Row types produced by the connectors and consumed by the storage sinks.
//!
//! These are flat storage schemas, not a rich domain model: each struct
//! corresponds one-to-one with a database table, worksheet, or CSV artifact.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MercatoError;
use crate::registry::IndexCode;

/// One OHLCV bar for a tracked index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleRow {
    /// Canonical code the bar belongs to.
    pub code: IndexCode,
    /// Bar timestamp, UTC.
    pub ts: DateTime<Utc>,
    /// Opening price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume, when the provider reports one.
    pub volume: Option<u64>,
}

/// One news article attributed to a tracked index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Canonical code the article was fetched for.
    pub code: IndexCode,
    /// Headline.
    pub title: String,
    /// Article teaser/summary when the provider exposes one.
    pub summary: Option<String>,
    /// Canonical article URL.
    pub url: String,
    /// Publication timestamp, UTC, when parseable.
    pub published_at: Option<DateTime<Utc>>,
}

/// One raw row of the site-wide major-indices table, keyed by the
/// provider's display label. The label is resolved to an [`IndexCode`] by
/// the caller through the inverse namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Provider display label (e.g. `S&P 500`).
    pub name: String,
    /// Last traded price.
    pub last: Decimal,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Absolute change.
    pub change: Decimal,
    /// Percent change (e.g. `-0.42` for -0.42%).
    pub change_pct: Decimal,
    /// Quote time as displayed by the provider, if any.
    pub quoted_at: Option<String>,
}

/// A [`SnapshotRow`] whose label resolved to a canonical code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Canonical code.
    pub code: IndexCode,
    /// Last traded price.
    pub last: Decimal,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Absolute change.
    pub change: Decimal,
    /// Percent change.
    pub change_pct: Decimal,
    /// Collection timestamp, UTC.
    pub captured_at: DateTime<Utc>,
}

/// Aggregate technical rating as published by the analysis site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// Strong buy.
    StrongBuy,
    /// Buy.
    Buy,
    /// Neutral.
    Neutral,
    /// Sell.
    Sell,
    /// Strong sell.
    StrongSell,
}

impl Rating {
    /// Human-readable form matching the provider's wording.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Neutral => "Neutral",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = MercatoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong buy" => Ok(Self::StrongBuy),
            "buy" => Ok(Self::Buy),
            "neutral" => Ok(Self::Neutral),
            "sell" => Ok(Self::Sell),
            "strong sell" => Ok(Self::StrongSell),
            other => Err(MercatoError::Data(format!("unknown rating: {other}"))),
        }
    }
}

/// Ratings for a single analysis timeframe (e.g. `hourly`, `daily`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeRating {
    /// Timeframe label as published.
    pub timeframe: String,
    /// Overall summary rating.
    pub summary: Rating,
    /// Moving-averages rating.
    pub moving_averages: Rating,
    /// Oscillator/indicator rating.
    pub oscillators: Rating,
}

/// Technical summary for one index across the provider's timeframes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    /// Canonical code.
    pub code: IndexCode,
    /// One entry per published timeframe.
    pub ratings: Vec<TimeframeRating>,
    /// Collection timestamp, UTC.
    pub captured_at: DateTime<Utc>,
}

/// One constituent row of an index-components table.
///
/// Kept loosely typed: the charting site formats figures for display
/// (`2.51T`, `−0.12%`), and the rows are stored verbatim the way the
/// original pipeline did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRow {
    /// Constituent ticker symbol.
    pub symbol: String,
    /// Company name.
    pub name: Option<String>,
    /// Market capitalization, as displayed.
    pub market_cap: Option<String>,
    /// Last price, as displayed.
    pub price: Option<String>,
    /// Percent change, as displayed.
    pub change_pct: Option<String>,
    /// Volume, as displayed.
    pub volume: Option<String>,
    /// Relative volume, as displayed.
    pub rel_volume: Option<String>,
    /// Price/earnings ratio, as displayed.
    pub pe: Option<String>,
    /// Diluted EPS, as displayed.
    pub eps_dil: Option<String>,
    /// Diluted EPS growth, as displayed.
    pub eps_dil_growth: Option<String>,
    /// Dividend yield percent, as displayed.
    pub div_yield: Option<String>,
    /// Sector.
    pub sector: Option<String>,
    /// Analyst rating, as displayed.
    pub analyst_rating: Option<String>,
}

/// Sentiment classification for a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Positive sentiment.
    Positive,
    /// Neutral sentiment.
    Neutral,
    /// Negative sentiment.
    Negative,
}

impl SentimentLabel {
    /// Lowercase form matching the classifier's label vocabulary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = MercatoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(MercatoError::Data(format!(
                "unknown sentiment label: {other}"
            ))),
        }
    }
}

/// Sentiment label plus classifier confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Predicted label.
    pub label: SentimentLabel,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
}

/// LLM-generated news digest for one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDigest {
    /// Canonical code.
    pub code: IndexCode,
    /// One-paragraph summary of the recent articles.
    pub summary: String,
    /// Sentiment of the summary, when scored.
    pub sentiment: Option<Sentiment>,
    /// Newest source-article publication time covered by this digest.
    pub last_updated: Option<DateTime<Utc>>,
}
