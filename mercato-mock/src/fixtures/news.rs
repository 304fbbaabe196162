use chrono::NaiveDateTime;
use mercato_core::{IndexCode, NewsItem};

pub fn by_code(code: IndexCode) -> Option<Vec<NewsItem>> {
    match code {
        IndexCode::Spx500 => Some(vec![
            item(
                code,
                "S&P 500 notches a fresh record close",
                Some("Broad gains across sectors lifted the benchmark."),
                "https://news.example.com/spx/record-close",
                "2026-01-05 21:10:00",
            ),
            item(
                code,
                "Futures steady ahead of payrolls",
                None,
                "https://news.example.com/spx/futures-steady",
                "2026-01-05 11:45:00",
            ),
        ]),
        IndexCode::Ger40 => Some(vec![item(
            code,
            "DAX slips as factory orders disappoint",
            Some("Weak industrial data weighed on exporters."),
            "https://news.example.com/dax/factory-orders",
            "2026-01-05 09:20:00",
        )]),
        IndexCode::Us30 => Some(vec![item(
            code,
            "Dow pares gains into the close",
            None,
            "https://news.example.com/dow/pares-gains",
            "2026-01-05 20:55:00",
        )]),
        _ => None,
    }
}

fn item(
    code: IndexCode,
    title: &str,
    summary: Option<&str>,
    url: &str,
    published: &str,
) -> NewsItem {
    NewsItem {
        code,
        title: title.to_string(),
        summary: summary.map(str::to_string),
        url: url.to_string(),
        published_at: Some(
            NaiveDateTime::parse_from_str(published, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
        ),
    }
}
