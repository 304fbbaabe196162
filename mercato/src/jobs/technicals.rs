//! Per-index technical summaries.

use mercato_core::connector::TechnicalsProvider;
use mercato_core::{MercatoError, Namespace, SymbolRegistry, TechnicalSummary};
use mercato_store::{CsvWriter, SheetsClient};

use super::{JobReport, TS_FORMAT};

const CSV_FILE: &str = "investing_indices_technical.csv";
const SHEET: &str = "investing_technical";
const HEADER: [&str; 6] = [
    "Symbol",
    "Timeframe",
    "Summary",
    "Moving Averages",
    "Oscillators",
    "Last Updated",
];

/// Fetch the technical summary for every tracked index.
pub async fn collect(
    registry: &SymbolRegistry,
    provider: &dyn TechnicalsProvider,
) -> (Vec<TechnicalSummary>, JobReport) {
    let mut out = Vec::new();
    let mut report = JobReport::default();
    for code in registry.codes() {
        let slug = match registry.resolve(code, Namespace::InvestingSlug) {
            Ok(s) => s,
            Err(e) => {
                report.record_failure(code, e);
                continue;
            }
        };
        match provider.technicals(code, slug).await {
            Ok(summary) => out.push(summary),
            Err(e) => report.record_failure(code, e),
        }
    }
    (out, report)
}

pub(crate) fn sheet_rows(summaries: &[TechnicalSummary]) -> Vec<Vec<String>> {
    summaries
        .iter()
        .flat_map(|s| {
            s.ratings.iter().map(|r| {
                vec![
                    s.code.to_string(),
                    r.timeframe.clone(),
                    r.summary.to_string(),
                    r.moving_averages.to_string(),
                    r.oscillators.to_string(),
                    s.captured_at.format(TS_FORMAT).to_string(),
                ]
            })
        })
        .collect()
}

/// Collect and write the sinks, one row per (index, timeframe).
///
/// # Errors
/// Returns sink errors; provider failures stay in the report.
pub async fn run(
    registry: &SymbolRegistry,
    provider: &dyn TechnicalsProvider,
    csv: &CsvWriter,
    sheets: Option<&SheetsClient>,
) -> Result<JobReport, MercatoError> {
    let (summaries, mut report) = collect(registry, provider).await;

    let rows = sheet_rows(&summaries);
    let path = csv.write(CSV_FILE, &HEADER, &rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "saved technicals artifact");
    if let Some(sheets) = sheets {
        sheets.replace_rows(SHEET, &HEADER, &rows).await?;
    }
    report.written += rows.len() as u64;
    Ok(report)
}
