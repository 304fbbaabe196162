#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;

use mercato_core::MercatoError;
use yfinance_rs as yf;
use yf::core::HistoryService;

/// History abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait YfHistory: Send + Sync {
    /// Fetch full history for a symbol using a provider-specific request.
    async fn fetch_full(
        &self,
        symbol: &str,
        req: yf::core::services::HistoryRequest,
    ) -> Result<yf::HistoryResponse, MercatoError>;
}

/// News abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait YfNews: Send + Sync {
    /// Fetch up to `count` recent articles for a symbol.
    async fn news(
        &self,
        symbol: &str,
        count: usize,
    ) -> Result<Vec<yf::news::NewsArticle>, MercatoError>;
}

/// Real adapter backed by a single `YfClient` instance.
/// `YfClient` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    client: yf::YfClient,
}

impl RealAdapter {
    /// Build a default `YfClient` with a recommended user agent.
    ///
    /// # Panics
    /// Panics if building the underlying `YfClient` fails, which is
    /// unexpected in normal environments (invalid user agent configuration).
    #[must_use]
    pub fn new_default() -> Self {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .no_proxy()
            .build()
            .expect("Failed to build reqwest client for YfClient");
        Self {
            client: yf::YfClient::builder()
                .custom_client(http)
                .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36")
                .build()
                .expect("Failed to build YfClient with user agent"),
        }
    }

    /// Wrap an existing `YfClient`.
    #[must_use]
    pub const fn new(client: yf::YfClient) -> Self {
        Self { client }
    }
}

fn map_yf_err(e: &yf::YfError, context: &str) -> MercatoError {
    match e {
        yf::YfError::NotFound { .. } => MercatoError::lookup_miss(context.to_string()),
        yf::YfError::RateLimited { .. } => {
            MercatoError::connector("mercato-yfinance", format!("rate limit: {context}"))
        }
        yf::YfError::ServerError { status, .. } => MercatoError::connector(
            "mercato-yfinance",
            format!("server error {status}: {context}"),
        ),
        yf::YfError::Status { status, .. } => {
            MercatoError::connector("mercato-yfinance", format!("status {status}: {context}"))
        }
        other => MercatoError::connector("mercato-yfinance", other.to_string()),
    }
}

#[async_trait]
impl YfHistory for RealAdapter {
    async fn fetch_full(
        &self,
        symbol: &str,
        req: yf::core::services::HistoryRequest,
    ) -> Result<yf::HistoryResponse, MercatoError> {
        // `YfClient` implements `HistoryService`, which we use directly.
        self.client
            .fetch_full_history(symbol, req)
            .await
            .map_err(|e| map_yf_err(&e, &format!("history for {symbol}")))
    }
}

#[async_trait]
impl YfNews for RealAdapter {
    async fn news(
        &self,
        symbol: &str,
        count: usize,
    ) -> Result<Vec<yf::news::NewsArticle>, MercatoError> {
        let nb = yf::news::NewsBuilder::new(&self.client, symbol)
            .count(count as u32)
            .tab(yf::news::NewsTab::News);
        nb.fetch()
            .await
            .map_err(|e| map_yf_err(&e, &format!("news for {symbol}")))
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn YfHistory {
    /// Build a `YfHistory` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YfHistory>
    where
        F: Send
            + Sync
            + 'static
            + Fn(
                String,
                yf::core::services::HistoryRequest,
            ) -> Result<yf::HistoryResponse, MercatoError>,
    {
        struct FnHist<F>(F);
        #[async_trait]
        impl<F> YfHistory for FnHist<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(
                    String,
                    yf::core::services::HistoryRequest,
                ) -> Result<yf::HistoryResponse, MercatoError>,
        {
            async fn fetch_full(
                &self,
                symbol: &str,
                req: yf::core::services::HistoryRequest,
            ) -> Result<yf::HistoryResponse, MercatoError> {
                (self.0)(symbol.to_string(), req)
            }
        }
        Arc::new(FnHist(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn YfNews {
    /// Build a `YfNews` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YfNews>
    where
        F: Send
            + Sync
            + 'static
            + Fn(String, usize) -> Result<Vec<yf::news::NewsArticle>, MercatoError>,
    {
        struct FnNews<F>(F);
        #[async_trait]
        impl<F> YfNews for FnNews<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(String, usize) -> Result<Vec<yf::news::NewsArticle>, MercatoError>,
        {
            async fn news(
                &self,
                symbol: &str,
                count: usize,
            ) -> Result<Vec<yf::news::NewsArticle>, MercatoError> {
                (self.0)(symbol.to_string(), count)
            }
        }
        Arc::new(FnNews(f))
    }
}

// Convenience so the connector can take a single adapter and split it into
// both trait objects.
/// Helper trait to split a concrete adapter into arc trait objects.
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn YfHistory>`.
    fn clone_arc_history(&self) -> Arc<dyn YfHistory> {
        <dyn YfHistory>::from_fn(|_, _| Err(MercatoError::unsupported("history")))
    }
    /// Clone as `Arc<dyn YfNews>`.
    fn clone_arc_news(&self) -> Arc<dyn YfNews> {
        <dyn YfNews>::from_fn(|_, _| Err(MercatoError::unsupported("news")))
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_history(&self) -> Arc<dyn YfHistory> {
        Arc::new(self.clone()) as Arc<dyn YfHistory>
    }
    fn clone_arc_news(&self) -> Arc<dyn YfNews> {
        Arc::new(self.clone()) as Arc<dyn YfNews>
    }
}
