//! Site-wide price snapshot, resolved through display labels.

use chrono::{DateTime, Utc};

use mercato_core::connector::SnapshotProvider;
use mercato_core::{IndexSnapshot, MercatoError, SnapshotRow, SymbolRegistry};
use mercato_store::{CsvWriter, SheetsClient};

use super::{JobReport, TS_FORMAT};

const CSV_FILE: &str = "investing_indices_price.csv";
const SHEET: &str = "investing_price";
const HEADER: [&str; 7] = [
    "Symbol",
    "Last",
    "High",
    "Low",
    "Chg.",
    "Chg. %",
    "Last Updated",
];

/// Attribute raw snapshot rows to canonical codes via the inverse
/// namespace. The site lists far more indices than the tracked universe;
/// rows with unrecognized labels are dropped, not errors.
pub fn resolve_rows(
    registry: &SymbolRegistry,
    rows: Vec<SnapshotRow>,
    captured_at: DateTime<Utc>,
) -> Vec<IndexSnapshot> {
    rows.into_iter()
        .filter_map(|row| match registry.resolve_label(&row.name) {
            Ok(code) => Some(IndexSnapshot {
                code,
                last: row.last,
                high: row.high,
                low: row.low,
                change: row.change,
                change_pct: row.change_pct,
                captured_at,
            }),
            Err(_) => {
                tracing::debug!(label = %row.name, "untracked index label");
                None
            }
        })
        .collect()
}

pub(crate) fn sheet_rows(snapshots: &[IndexSnapshot]) -> Vec<Vec<String>> {
    snapshots
        .iter()
        .map(|s| {
            vec![
                s.code.to_string(),
                s.last.to_string(),
                s.high.to_string(),
                s.low.to_string(),
                s.change.to_string(),
                s.change_pct.to_string(),
                s.captured_at.format(TS_FORMAT).to_string(),
            ]
        })
        .collect()
}

/// Fetch the snapshot table once, resolve it, and write the sinks.
///
/// # Errors
/// Returns provider errors (the snapshot is a single page; there is no
/// per-code isolation to apply before label resolution) and sink errors.
pub async fn run(
    registry: &SymbolRegistry,
    provider: &dyn SnapshotProvider,
    csv: &CsvWriter,
    sheets: Option<&SheetsClient>,
) -> Result<JobReport, MercatoError> {
    let raw = provider.snapshots().await?;
    let total = raw.len();
    let snapshots = resolve_rows(registry, raw, Utc::now());
    tracing::info!(
        resolved = snapshots.len(),
        listed = total,
        "resolved snapshot rows"
    );

    let rows = sheet_rows(&snapshots);
    let path = csv.write(CSV_FILE, &HEADER, &rows)?;
    tracing::info!(path = %path.display(), "saved snapshot artifact");
    if let Some(sheets) = sheets {
        sheets.replace_rows(SHEET, &HEADER, &rows).await?;
    }

    let mut report = JobReport::default();
    report.written = rows.len() as u64;
    report.skipped = (total - snapshots.len()) as u64;
    Ok(report)
}
