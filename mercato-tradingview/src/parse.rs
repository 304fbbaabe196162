//! HTML parsing for the charting site's components tables.

use scraper::{Html, Selector};

use mercato_core::{ComponentRow, MercatoError};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector parses")
}

fn cell(cells: &[String], i: usize) -> Option<String> {
    cells
        .get(i)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "—" && s != "-")
}

/// Extract the constituents table from a components page.
///
/// Column layout mirrors the site: symbol (with the company name nested in
/// the same cell), market cap, price, change %, volume, relative volume,
/// P/E, EPS dil, EPS dil growth, dividend yield %, sector, analyst rating.
/// Only the symbol is mandatory; everything else is stored as displayed.
pub fn parse_components(html: &str) -> Result<Vec<ComponentRow>, MercatoError> {
    let doc = Html::parse_document(html);
    let row_sel = selector("table tbody tr");
    let cell_sel = selector("td");
    let ticker_sel = selector("a[data-rowkey], a.tickerName, td a");
    let name_sel = selector("sup, .tickerDescription");

    let mut out = Vec::new();
    for tr in doc.select(&row_sel) {
        let tds: Vec<_> = tr.select(&cell_sel).collect();
        if tds.is_empty() {
            continue;
        }

        let symbol = tds[0]
            .select(&ticker_sel)
            .next()
            .map(|a| {
                a.text()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .filter(|s| !s.is_empty());
        let Some(symbol) = symbol else {
            continue;
        };
        let name = tds[0]
            .select(&name_sel)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());

        let cells: Vec<String> = tds
            .iter()
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();

        out.push(ComponentRow {
            symbol,
            name,
            market_cap: cell(&cells, 1),
            price: cell(&cells, 2),
            change_pct: cell(&cells, 3),
            volume: cell(&cells, 4),
            rel_volume: cell(&cells, 5),
            pe: cell(&cells, 6),
            eps_dil: cell(&cells, 7),
            eps_dil_growth: cell(&cells, 8),
            div_yield: cell(&cells, 9),
            sector: cell(&cells, 10),
            analyst_rating: cell(&cells, 11),
        });
    }

    if out.is_empty() {
        return Err(MercatoError::Data(
            "no component rows parsed; markup may have changed".to_string(),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENTS_FIXTURE: &str = r#"
<div id="js-category-content">
<table>
  <tbody>
    <tr>
      <td><a class="tickerName">AAPL</a><sup>Apple Inc.</sup></td>
      <td>2.51T</td><td>163.45</td><td>+1.20%</td><td>58.1M</td><td>0.92</td>
      <td>27.5</td><td>6.05</td><td>+8.3%</td><td>0.55%</td>
      <td>Electronic technology</td><td>Buy</td>
    </tr>
    <tr>
      <td><a class="tickerName">MSFT</a><sup>Microsoft Corp.</sup></td>
      <td>2.40T</td><td>315.20</td><td>&#8722;0.30%</td><td>22.4M</td><td>1.10</td>
      <td>33.1</td><td>9.65</td><td>+10.2%</td><td>0.82%</td>
      <td>Technology services</td><td>Strong buy</td>
    </tr>
    <tr><td>header-ish row without a ticker link</td></tr>
  </tbody>
</table>
</div>
"#;

    #[test]
    fn components_table_parses_symbols_and_columns() {
        let rows = parse_components(COMPONENTS_FIXTURE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_eq!(rows[0].name.as_deref(), Some("Apple Inc."));
        assert_eq!(rows[0].market_cap.as_deref(), Some("2.51T"));
        assert_eq!(rows[0].analyst_rating.as_deref(), Some("Buy"));
        assert_eq!(rows[1].symbol, "MSFT");
        assert_eq!(rows[1].sector.as_deref(), Some("Technology services"));
    }

    #[test]
    fn rows_without_a_ticker_are_skipped() {
        let rows = parse_components(COMPONENTS_FIXTURE).unwrap();
        assert!(rows.iter().all(|r| !r.symbol.is_empty()));
    }

    #[test]
    fn empty_markup_is_a_data_error() {
        assert!(parse_components("<html></html>").is_err());
    }
}
