use async_trait::async_trait;

use crate::config::FetchWindow;
use crate::error::MercatoError;
use crate::registry::IndexCode;
use crate::types::{CandleRow, ComponentRow, NewsItem, SnapshotRow, TechnicalSummary};

/// Focused role trait for connectors that provide OHLCV history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch history bars for one index.
    ///
    /// `symbol` is the provider-native symbol, already resolved through the
    /// registry by the caller; `code` only labels the returned rows.
    async fn history(
        &self,
        code: IndexCode,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<CandleRow>, MercatoError>;
}

/// Focused role trait for connectors that provide per-index news.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch up to `limit` recent articles for one index.
    async fn news(
        &self,
        code: IndexCode,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, MercatoError>;
}

/// Focused role trait for connectors that provide a site-wide price
/// snapshot of all major indices in a single request.
///
/// Rows come back keyed by the provider's display labels; callers resolve
/// those through the registry's inverse namespace.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetch the current snapshot table.
    async fn snapshots(&self) -> Result<Vec<SnapshotRow>, MercatoError>;
}

/// Focused role trait for connectors that provide technical-analysis
/// summaries.
#[async_trait]
pub trait TechnicalsProvider: Send + Sync {
    /// Fetch the technical summary for one index.
    async fn technicals(
        &self,
        code: IndexCode,
        symbol: &str,
    ) -> Result<TechnicalSummary, MercatoError>;
}

/// Focused role trait for connectors that provide index constituents.
#[async_trait]
pub trait ComponentsProvider: Send + Sync {
    /// Fetch the components table for one index.
    async fn components(
        &self,
        code: IndexCode,
        symbol: &str,
    ) -> Result<Vec<ComponentRow>, MercatoError>;
}

/// Primary connector interface: identity plus a capability directory.
///
/// Connectors advertise the role traits they implement by returning
/// `Some(self)` from the matching `as_*_provider` accessor; the default for
/// every capability is `None`. Jobs request the capability they need and
/// fail with [`MercatoError::Unsupported`] when the wired connector does
/// not offer it.
pub trait MercatoConnector: Send + Sync {
    /// Short, stable connector name (used in error tags and logs).
    fn name(&self) -> &'static str;

    /// Human-readable vendor/provider name.
    fn vendor(&self) -> &'static str;

    /// History capability, if implemented.
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        None
    }

    /// News capability, if implemented.
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        None
    }

    /// Snapshot capability, if implemented.
    fn as_snapshot_provider(&self) -> Option<&dyn SnapshotProvider> {
        None
    }

    /// Technicals capability, if implemented.
    fn as_technicals_provider(&self) -> Option<&dyn TechnicalsProvider> {
        None
    }

    /// Components capability, if implemented.
    fn as_components_provider(&self) -> Option<&dyn ComponentsProvider> {
        None
    }
}
