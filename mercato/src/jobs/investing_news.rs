//! Scraped per-slug news collection into MySQL.

use mercato_core::connector::NewsProvider;
use mercato_core::{MercatoError, Namespace, NewsItem, SymbolRegistry};
use mercato_store::MySqlStore;

use super::JobReport;

pub(crate) const TABLE: &str = "investing_news";
const NEWS_LIMIT: usize = 10;
// Only the newest handful of articles per symbol is kept.
const KEEP: u32 = 10;

/// Fetch the news listing for every tracked index slug.
pub async fn collect(
    registry: &SymbolRegistry,
    provider: &dyn NewsProvider,
) -> (Vec<NewsItem>, JobReport) {
    let mut items = Vec::new();
    let mut report = JobReport::default();
    for code in registry.codes() {
        let slug = match registry.resolve(code, Namespace::InvestingSlug) {
            Ok(s) => s,
            Err(e) => {
                report.record_failure(code, e);
                continue;
            }
        };
        match provider.news(code, slug, NEWS_LIMIT).await {
            Ok(fetched) if fetched.is_empty() => {
                tracing::info!(%code, slug, "no articles on the listing page");
                report.skipped += 1;
            }
            Ok(fetched) => items.extend(fetched),
            Err(e) => report.record_failure(code, e),
        }
    }
    (items, report)
}

/// Collect, upsert, and prune the news table.
///
/// # Errors
/// Returns sink errors; provider failures stay in the report.
pub async fn run(
    registry: &SymbolRegistry,
    provider: &dyn NewsProvider,
    store: &MySqlStore,
) -> Result<JobReport, MercatoError> {
    let (items, mut report) = collect(registry, provider).await;

    report.written += store.upsert_news(TABLE, &items).await?;
    store
        .prune_to_newest(TABLE, &["Title", "Url"], "Published", KEEP)
        .await?;
    tracing::info!(
        written = report.written,
        failures = report.failures.len(),
        "investing news job finished"
    );
    Ok(report)
}
