//! Intraday and daily OHLCV collection into MySQL.

use mercato_core::connector::HistoryProvider;
use mercato_core::{CandleRow, FetchWindow, MercatoError, Namespace, SymbolRegistry};
use mercato_store::MySqlStore;

use super::JobReport;

pub(crate) const MINUTE_TABLE: &str = "index_history_minute";
pub(crate) const DAILY_TABLE: &str = "index_history_daily";

// Retention: one trading day of minutes, ten years of dailies, per symbol.
const MINUTE_KEEP: u32 = 24 * 60;
const DAILY_KEEP: u32 = 365 * 10;

/// Collected bars plus the per-code failures encountered on the way.
#[derive(Debug, Default)]
pub struct HistoryBatch {
    /// Intraday bars across all codes that succeeded.
    pub minute: Vec<CandleRow>,
    /// Daily bars across all codes that succeeded.
    pub daily: Vec<CandleRow>,
    /// Report carrying the failures.
    pub report: JobReport,
}

/// Fetch both windows for every tracked index.
///
/// A code is aborted on its first failure (lookup miss or provider error)
/// and its siblings proceed.
pub async fn collect(
    registry: &SymbolRegistry,
    provider: &dyn HistoryProvider,
    minute: &FetchWindow,
    daily: &FetchWindow,
) -> HistoryBatch {
    let mut batch = HistoryBatch::default();
    for code in registry.codes() {
        let symbol = match registry.resolve(code, Namespace::Yahoo) {
            Ok(s) => s,
            Err(e) => {
                batch.report.record_failure(code, e);
                continue;
            }
        };
        tracing::info!(%code, symbol, "fetching history");
        let minute_rows = match provider.history(code, symbol, minute).await {
            Ok(rows) => rows,
            Err(e) => {
                batch.report.record_failure(code, e);
                continue;
            }
        };
        let daily_rows = match provider.history(code, symbol, daily).await {
            Ok(rows) => rows,
            Err(e) => {
                batch.report.record_failure(code, e);
                continue;
            }
        };
        batch.minute.extend(minute_rows);
        batch.daily.extend(daily_rows);
    }
    batch
}

/// Collect and persist, then enforce the per-symbol retention caps.
///
/// # Errors
/// Returns sink errors; provider failures stay in the report.
pub async fn run(
    registry: &SymbolRegistry,
    provider: &dyn HistoryProvider,
    store: &MySqlStore,
    minute: &FetchWindow,
    daily: &FetchWindow,
) -> Result<JobReport, MercatoError> {
    let batch = collect(registry, provider, minute, daily).await;
    let mut report = batch.report;

    report.written += store.upsert_candles(MINUTE_TABLE, &batch.minute).await?;
    report.written += store.upsert_candles(DAILY_TABLE, &batch.daily).await?;
    store
        .prune_to_newest(MINUTE_TABLE, &["Symbol", "Ts"], "Ts", MINUTE_KEEP)
        .await?;
    store
        .prune_to_newest(DAILY_TABLE, &["Symbol", "Ts"], "Ts", DAILY_KEEP)
        .await?;

    tracing::info!(
        written = report.written,
        failures = report.failures.len(),
        "history job finished"
    );
    Ok(report)
}
