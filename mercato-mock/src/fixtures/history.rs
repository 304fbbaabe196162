use chrono::NaiveDateTime;
use mercato_core::{CandleRow, IndexCode};
use rust_decimal::Decimal;

pub fn by_code(code: IndexCode) -> Option<Vec<CandleRow>> {
    match code {
        IndexCode::Spx500 => Some(build(
            code,
            vec![
                ("2026-01-05 14:30:00", "5000.25", "5010.00", "4995.10", "5005.50", Some(1_200_000)),
                ("2026-01-05 14:31:00", "5005.50", "5012.00", "5001.00", "5009.75", Some(980_000)),
            ],
        )),
        IndexCode::Ger40 => Some(build(
            code,
            vec![
                ("2026-01-05 08:00:00", "17800.00", "17850.00", "17780.00", "17842.85", Some(410_000)),
                ("2026-01-05 08:01:00", "17842.85", "17860.00", "17830.00", "17855.10", None),
            ],
        )),
        IndexCode::Jpn225 => Some(build(
            code,
            vec![(
                "2026-01-05 00:00:00",
                "36200.00",
                "36350.00",
                "36100.00",
                "36288.40",
                Some(150_000),
            )],
        )),
        IndexCode::Us30 => Some(build(
            code,
            vec![(
                "2026-01-05 14:30:00",
                "38900.00",
                "38990.00",
                "38850.00",
                "38950.20",
                Some(530_000),
            )],
        )),
        _ => None,
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn build(
    code: IndexCode,
    rows: Vec<(&str, &str, &str, &str, &str, Option<u64>)>,
) -> Vec<CandleRow> {
    rows.into_iter()
        .map(|(ts, o, h, l, c, v)| CandleRow {
            code,
            ts: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            open: dec(o),
            high: dec(h),
            low: dec(l),
            close: dec(c),
            volume: v,
        })
        .collect()
}
