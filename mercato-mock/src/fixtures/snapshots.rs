use mercato_core::SnapshotRow;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// The site-wide table: known labels for part of the universe plus one
/// label outside it, so callers exercise the unknown-label path.
pub fn table() -> Vec<SnapshotRow> {
    vec![
        row("S&P 500", "5005.57", "5010.00", "4990.12", "35.20", "0.71"),
        row("DAX", "17842.85", "17900.00", "17800.50", "-75.02", "-0.42"),
        row("Nikkei 225", "36288.40", "36350.00", "36100.00", "120.15", "0.33"),
        row("Hang Seng", "16200.00", "16300.00", "16150.00", "-45.00", "-0.28"),
    ]
}

fn row(name: &str, last: &str, high: &str, low: &str, change: &str, pct: &str) -> SnapshotRow {
    SnapshotRow {
        name: name.to_string(),
        last: dec(last),
        high: dec(high),
        low: dec(low),
        change: dec(change),
        change_pct: dec(pct),
        quoted_at: Some("16:00:00".to_string()),
    }
}
