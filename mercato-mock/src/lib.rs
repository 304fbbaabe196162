use async_trait::async_trait;
use mercato_core::{
    CandleRow, ComponentRow, ComponentsProvider, FetchWindow, HistoryProvider, IndexCode,
    MercatoConnector, MercatoError, NewsItem, NewsProvider, SnapshotProvider, SnapshotRow,
    TechnicalSummary, TechnicalsProvider,
};

mod fixtures;

/// Mock connector for CI-safe tests. Provides deterministic data from
/// static fixtures for a subset of the index universe; codes without a
/// fixture answer with a lookup miss, which is exactly how a job
/// experiences a configuration hole.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn not_found(what: &str) -> MercatoError {
        MercatoError::lookup_miss(what.to_string())
    }

    fn maybe_fail(symbol: &str, capability: &'static str) -> Result<(), MercatoError> {
        if symbol == "FAIL" {
            return Err(MercatoError::connector(
                "mercato-mock",
                format!("forced failure: {capability}"),
            ));
        }
        Ok(())
    }
}

impl MercatoConnector for MockConnector {
    fn name(&self) -> &'static str {
        "mercato-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
    fn as_snapshot_provider(&self) -> Option<&dyn SnapshotProvider> {
        Some(self as &dyn SnapshotProvider)
    }
    fn as_technicals_provider(&self) -> Option<&dyn TechnicalsProvider> {
        Some(self as &dyn TechnicalsProvider)
    }
    fn as_components_provider(&self) -> Option<&dyn ComponentsProvider> {
        Some(self as &dyn ComponentsProvider)
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn history(
        &self,
        code: IndexCode,
        symbol: &str,
        _window: &FetchWindow,
    ) -> Result<Vec<CandleRow>, MercatoError> {
        Self::maybe_fail(symbol, "history")?;
        fixtures::history::by_code(code)
            .ok_or_else(|| Self::not_found(&format!("history for {code}")))
    }
}

#[async_trait]
impl NewsProvider for MockConnector {
    async fn news(
        &self,
        code: IndexCode,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, MercatoError> {
        Self::maybe_fail(symbol, "news")?;
        let items = fixtures::news::by_code(code)
            .ok_or_else(|| Self::not_found(&format!("news for {code}")))?;
        Ok(items.into_iter().take(limit).collect())
    }
}

#[async_trait]
impl SnapshotProvider for MockConnector {
    async fn snapshots(&self) -> Result<Vec<SnapshotRow>, MercatoError> {
        Ok(fixtures::snapshots::table())
    }
}

#[async_trait]
impl TechnicalsProvider for MockConnector {
    async fn technicals(
        &self,
        code: IndexCode,
        symbol: &str,
    ) -> Result<TechnicalSummary, MercatoError> {
        Self::maybe_fail(symbol, "technicals")?;
        fixtures::technicals::by_code(code)
            .ok_or_else(|| Self::not_found(&format!("technicals for {code}")))
    }
}

#[async_trait]
impl ComponentsProvider for MockConnector {
    async fn components(
        &self,
        code: IndexCode,
        symbol: &str,
    ) -> Result<Vec<ComponentRow>, MercatoError> {
        Self::maybe_fail(symbol, "components")?;
        fixtures::components::by_code(code)
            .ok_or_else(|| Self::not_found(&format!("components for {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn covered_codes_answer_and_uncovered_codes_miss() {
        let mock = MockConnector::new();
        let window = FetchWindow {
            period: "7d".into(),
            interval: "1m".into(),
        };
        assert!(
            !mock
                .history(IndexCode::Spx500, "SPX500", &window)
                .await
                .unwrap()
                .is_empty()
        );
        let err = mock
            .history(IndexCode::Esp35, "ESP35", &window)
            .await
            .unwrap_err();
        assert!(err.is_lookup_miss());
    }

    #[tokio::test]
    async fn forced_failure_symbol_trips_a_connector_error() {
        let mock = MockConnector::new();
        let err = mock.news(IndexCode::Spx500, "FAIL", 5).await.unwrap_err();
        assert!(matches!(err, MercatoError::Connector { .. }));
    }
}
