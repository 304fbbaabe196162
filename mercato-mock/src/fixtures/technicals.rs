use chrono::NaiveDate;
use mercato_core::{IndexCode, Rating, TechnicalSummary, TimeframeRating};

pub fn by_code(code: IndexCode) -> Option<TechnicalSummary> {
    let ratings = match code {
        IndexCode::Spx500 => vec![
            frame("Hourly", Rating::Buy, Rating::StrongBuy, Rating::Neutral),
            frame("Daily", Rating::StrongBuy, Rating::StrongBuy, Rating::Buy),
        ],
        IndexCode::Ger40 => vec![frame("Daily", Rating::Sell, Rating::Sell, Rating::Neutral)],
        _ => return None,
    };
    Some(TechnicalSummary {
        code,
        ratings,
        captured_at: NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
            .and_utc(),
    })
}

fn frame(tf: &str, summary: Rating, ma: Rating, osc: Rating) -> TimeframeRating {
    TimeframeRating {
        timeframe: tf.to_string(),
        summary,
        moving_averages: ma,
        oscillators: osc,
    }
}
