use mercato_core::{ComponentRow, IndexCode};

pub fn by_code(code: IndexCode) -> Option<Vec<ComponentRow>> {
    match code {
        IndexCode::Nas100 => Some(vec![
            row("AAPL", "Apple Inc.", "2.51T", "163.45", "+1.20%", "Buy"),
            row("MSFT", "Microsoft Corp.", "2.40T", "315.20", "-0.30%", "Strong buy"),
        ]),
        IndexCode::Spx500 => Some(vec![row(
            "XOM",
            "Exxon Mobil Corp.",
            "420B",
            "104.90",
            "+0.10%",
            "Neutral",
        )]),
        _ => None,
    }
}

fn row(
    symbol: &str,
    name: &str,
    market_cap: &str,
    price: &str,
    change_pct: &str,
    rating: &str,
) -> ComponentRow {
    ComponentRow {
        symbol: symbol.to_string(),
        name: Some(name.to_string()),
        market_cap: Some(market_cap.to_string()),
        price: Some(price.to_string()),
        change_pct: Some(change_pct.to_string()),
        analyst_rating: Some(rating.to_string()),
        ..ComponentRow::default()
    }
}
