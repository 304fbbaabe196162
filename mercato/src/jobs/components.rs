//! Per-index constituents from the charting site.

use chrono::Utc;

use mercato_core::connector::ComponentsProvider;
use mercato_core::{ComponentRow, IndexCode, MercatoError, Namespace, SymbolRegistry};
use mercato_store::{CsvWriter, SheetsClient};

use super::{JobReport, TS_FORMAT};

const CSV_FILE: &str = "tradingview_indices_components.csv";
const SHEET: &str = "tradingview_components";
const HEADER: [&str; 15] = [
    "Pair",
    "Symbol",
    "Name",
    "Market cap",
    "Price",
    "Change %",
    "Volume",
    "Rel Volume",
    "P/E",
    "EPS dil",
    "EPS dil growth",
    "Div yield %",
    "Sector",
    "Analyst Rating",
    "Last Updated",
];

/// Fetch the components table for every tracked index.
pub async fn collect(
    registry: &SymbolRegistry,
    provider: &dyn ComponentsProvider,
) -> (Vec<(IndexCode, Vec<ComponentRow>)>, JobReport) {
    let mut out = Vec::new();
    let mut report = JobReport::default();
    for code in registry.codes() {
        let symbol = match registry.resolve(code, Namespace::TradingView) {
            Ok(s) => s,
            Err(e) => {
                report.record_failure(code, e);
                continue;
            }
        };
        match provider.components(code, symbol).await {
            Ok(rows) => out.push((code, rows)),
            Err(e) => report.record_failure(code, e),
        }
    }
    (out, report)
}

fn opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| "N/A".to_string())
}

pub(crate) fn sheet_rows(per_code: &[(IndexCode, Vec<ComponentRow>)]) -> Vec<Vec<String>> {
    let stamp = Utc::now().format(TS_FORMAT).to_string();
    per_code
        .iter()
        .flat_map(|(code, rows)| {
            let stamp = stamp.clone();
            rows.iter().map(move |r| {
                vec![
                    code.to_string(),
                    r.symbol.clone(),
                    opt(&r.name),
                    opt(&r.market_cap),
                    opt(&r.price),
                    opt(&r.change_pct),
                    opt(&r.volume),
                    opt(&r.rel_volume),
                    opt(&r.pe),
                    opt(&r.eps_dil),
                    opt(&r.eps_dil_growth),
                    opt(&r.div_yield),
                    opt(&r.sector),
                    opt(&r.analyst_rating),
                    stamp.clone(),
                ]
            })
        })
        .collect()
}

/// Collect all tables and write one consolidated artifact plus the
/// worksheet.
///
/// # Errors
/// Returns sink errors; provider failures stay in the report.
pub async fn run(
    registry: &SymbolRegistry,
    provider: &dyn ComponentsProvider,
    csv: &CsvWriter,
    sheets: Option<&SheetsClient>,
) -> Result<JobReport, MercatoError> {
    let (per_code, mut report) = collect(registry, provider).await;

    let rows = sheet_rows(&per_code);
    let path = csv.write(CSV_FILE, &HEADER, &rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "saved components artifact");
    if let Some(sheets) = sheets {
        sheets.replace_rows(SHEET, &HEADER, &rows).await?;
    }
    report.written += rows.len() as u64;
    Ok(report)
}
