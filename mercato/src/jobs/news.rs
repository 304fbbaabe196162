//! Finance-API news collection into per-index CSV artifacts and
//! worksheets.

use mercato_core::connector::NewsProvider;
use mercato_core::{IndexCode, MercatoError, Namespace, NewsItem, SymbolRegistry};
use mercato_store::{CsvWriter, SheetsClient};

use super::{JobReport, TS_FORMAT};

const NEWS_LIMIT: usize = 10;
const HEADER: [&str; 4] = ["Title", "Summary", "URL", "Published"];

/// Fetch recent articles for every tracked index.
pub async fn collect(
    registry: &SymbolRegistry,
    provider: &dyn NewsProvider,
) -> (Vec<(IndexCode, Vec<NewsItem>)>, JobReport) {
    let mut out = Vec::new();
    let mut report = JobReport::default();
    for code in registry.codes() {
        let symbol = match registry.resolve(code, Namespace::Yahoo) {
            Ok(s) => s,
            Err(e) => {
                report.record_failure(code, e);
                continue;
            }
        };
        match provider.news(code, symbol, NEWS_LIMIT).await {
            Ok(items) if items.is_empty() => {
                tracing::info!(%code, "no news available");
                report.skipped += 1;
            }
            Ok(items) => out.push((code, items)),
            Err(e) => report.record_failure(code, e),
        }
    }
    (out, report)
}

pub(crate) fn csv_rows(items: &[NewsItem]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|n| {
            vec![
                n.title.clone(),
                n.summary.clone().unwrap_or_default(),
                n.url.clone(),
                n.published_at
                    .map(|d| d.format(TS_FORMAT).to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

/// Collect and write one artifact (and optionally one worksheet) per index.
///
/// # Errors
/// Returns sink errors; provider failures stay in the report.
pub async fn run(
    registry: &SymbolRegistry,
    provider: &dyn NewsProvider,
    csv: &CsvWriter,
    sheets: Option<&SheetsClient>,
) -> Result<JobReport, MercatoError> {
    let (per_code, mut report) = collect(registry, provider).await;

    for (code, items) in per_code {
        let rows = csv_rows(&items);
        let path = csv.write(&format!("{code}_news.csv"), &HEADER, &rows)?;
        tracing::info!(%code, path = %path.display(), rows = rows.len(), "saved news artifact");
        if let Some(sheets) = sheets {
            sheets
                .replace_rows(&format!("{code}_news"), &HEADER, &rows)
                .await?;
        }
        report.written += rows.len() as u64;
    }
    Ok(report)
}
