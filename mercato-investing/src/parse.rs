//! HTML parsing for the investing site's pages.
//!
//! Parsing is kept separate from fetching so the extraction logic can be
//! exercised against fixture markup without a network.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use mercato_core::{MercatoError, Rating, SnapshotRow, TimeframeRating};

fn selector(css: &str) -> Selector {
    // Selectors are compile-time constants; a parse failure is a programmer
    // error, not input-dependent.
    Selector::parse(css).expect("static selector parses")
}

/// Parse a displayed figure (`5,005.50`, `+35.20`, `−0.42%`) into a decimal.
pub(crate) fn parse_figure(s: &str) -> Result<Decimal, MercatoError> {
    let cleaned: String = s
        .trim()
        .replace('\u{2212}', "-") // typographic minus
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | '+'))
        .collect();
    cleaned
        .parse()
        .map_err(|_| MercatoError::Data(format!("unparseable figure: {s}")))
}

/// Extract the major-indices snapshot table.
///
/// Row layout mirrors the site: flag, name, last, high, low, change,
/// change %, time. Rows with missing or unparseable cells are skipped.
pub fn parse_major_indices(html: &str) -> Result<Vec<SnapshotRow>, MercatoError> {
    let doc = Html::parse_document(html);
    let row_sel = selector("table[class*=\"datatable-v2_table\"] tbody tr");
    let cell_sel = selector("td");

    let mut rows = Vec::new();
    for tr in doc.select(&row_sel) {
        let cells: Vec<String> = tr
            .select(&cell_sel)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 8 {
            continue;
        }
        let parsed = (
            parse_figure(&cells[2]),
            parse_figure(&cells[3]),
            parse_figure(&cells[4]),
            parse_figure(&cells[5]),
            parse_figure(&cells[6]),
        );
        let (Ok(last), Ok(high), Ok(low), Ok(change), Ok(change_pct)) = parsed else {
            tracing::debug!(name = %cells[1], "skipping snapshot row with unparseable figures");
            continue;
        };
        rows.push(SnapshotRow {
            name: cells[1].clone(),
            last,
            high,
            low,
            change,
            change_pct,
            quoted_at: Some(cells[7].clone()).filter(|t| !t.is_empty()),
        });
    }

    if rows.is_empty() {
        return Err(MercatoError::Data(
            "no snapshot rows parsed; markup may have changed".to_string(),
        ));
    }
    Ok(rows)
}

/// One parsed article from a per-index news listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    /// Headline.
    pub title: String,
    /// Teaser paragraph, when present.
    pub summary: Option<String>,
    /// Absolute article URL.
    pub url: String,
    /// Publication timestamp, when parseable.
    pub published_at: Option<DateTime<Utc>>,
}

fn parse_publish_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Extract the article list from a per-index news page.
///
/// Articles without a title link are skipped; an empty page is a valid
/// result (quiet news day), not an error.
pub fn parse_news_list(html: &str) -> Vec<ParsedArticle> {
    let doc = Html::parse_document(html);
    let article_sel = selector("ul[data-test=\"news-list\"] article");
    let title_sel = selector("a[data-test=\"article-title-link\"]");
    let summary_sel = selector("p[data-test=\"article-description\"]");
    let date_sel = selector("time[data-test=\"article-publish-date\"]");

    let mut out = Vec::new();
    for article in doc.select(&article_sel) {
        let Some(link) = article.select(&title_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }
        let summary = article
            .select(&summary_sel)
            .next()
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());
        let published_at = article
            .select(&date_sel)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .and_then(parse_publish_date);
        out.push(ParsedArticle {
            title,
            summary,
            url: href.to_string(),
            published_at,
        });
    }
    out
}

/// Extract per-timeframe technical ratings.
///
/// Expects the summaries table: timeframe, summary, moving averages,
/// oscillators.
pub fn parse_technicals(html: &str) -> Result<Vec<TimeframeRating>, MercatoError> {
    let doc = Html::parse_document(html);
    let row_sel = selector("table[data-test=\"technical-summaries-table\"] tbody tr");
    let cell_sel = selector("td");

    let mut out = Vec::new();
    for tr in doc.select(&row_sel) {
        let cells: Vec<String> = tr
            .select(&cell_sel)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 4 {
            continue;
        }
        let summary: Rating = cells[1].parse()?;
        let moving_averages: Rating = cells[2].parse()?;
        let oscillators: Rating = cells[3].parse()?;
        out.push(TimeframeRating {
            timeframe: cells[0].clone(),
            summary,
            moving_averages,
            oscillators,
        });
    }

    if out.is_empty() {
        return Err(MercatoError::Data(
            "no technical ratings parsed; markup may have changed".to_string(),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const SNAPSHOT_FIXTURE: &str = r#"
<table class="datatable-v2_table__93S4Y">
  <tbody>
    <tr>
      <td>*</td><td><a>S&amp;P 500</a></td><td>5,005.57</td><td>5,010.00</td>
      <td>4,990.12</td><td>+35.20</td><td>+0.71%</td><td>15:59:59</td>
    </tr>
    <tr>
      <td>*</td><td><a>DAX</a></td><td>17,842.85</td><td>17,900.00</td>
      <td>17,800.50</td><td>&#8722;75.02</td><td>&#8722;0.42%</td><td>17:35:00</td>
    </tr>
    <tr>
      <td>*</td><td><a>Bad Row</a></td><td>n/a</td><td>-</td>
      <td>-</td><td>-</td><td>-</td><td></td>
    </tr>
  </tbody>
</table>
"#;

    #[test]
    fn snapshot_table_parses_and_skips_bad_rows() {
        let rows = parse_major_indices(SNAPSHOT_FIXTURE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "S&P 500");
        assert_eq!(rows[0].last, Decimal::new(500_557, 2));
        assert_eq!(rows[0].change_pct, Decimal::new(71, 2));
        assert_eq!(rows[0].quoted_at.as_deref(), Some("15:59:59"));
        // Typographic minus normalizes.
        assert_eq!(rows[1].change, Decimal::new(-7_502, 2));
    }

    #[test]
    fn empty_snapshot_markup_is_a_data_error() {
        let err = parse_major_indices("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, MercatoError::Data(_)));
    }

    const NEWS_FIXTURE: &str = r#"
<ul data-test="news-list">
  <li><article>
    <a data-test="article-title-link" href="https://example.com/a1">Index slides on rate fears</a>
    <p data-test="article-description"> Stocks fell as yields rose. </p>
    <time data-test="article-publish-date" datetime="2026-03-01 12:34:56"></time>
  </article></li>
  <li><article>
    <a data-test="article-title-link" href="https://example.com/a2">Quiet session</a>
  </article></li>
  <li><article>
    <p data-test="article-description">orphan teaser without a title link</p>
  </article></li>
</ul>
"#;

    #[test]
    fn news_list_parses_titles_summaries_and_dates() {
        let articles = parse_news_list(NEWS_FIXTURE);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Index slides on rate fears");
        assert_eq!(articles[0].summary.as_deref(), Some("Stocks fell as yields rose."));
        assert_eq!(articles[0].url, "https://example.com/a1");
        assert_eq!(
            articles[0].published_at.unwrap().to_rfc3339(),
            "2026-03-01T12:34:56+00:00"
        );
        assert!(articles[1].summary.is_none());
        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn empty_news_page_is_an_empty_list() {
        assert!(parse_news_list("<html></html>").is_empty());
    }

    const TECHNICALS_FIXTURE: &str = r#"
<table data-test="technical-summaries-table">
  <tbody>
    <tr><td>Hourly</td><td>Buy</td><td>Strong Buy</td><td>Neutral</td></tr>
    <tr><td>Daily</td><td>Strong Sell</td><td>Sell</td><td>Sell</td></tr>
  </tbody>
</table>
"#;

    #[test]
    fn technicals_table_parses_ratings() {
        let ratings = parse_technicals(TECHNICALS_FIXTURE).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].timeframe, "Hourly");
        assert_eq!(ratings[0].summary, Rating::Buy);
        assert_eq!(ratings[0].moving_averages, Rating::StrongBuy);
        assert_eq!(ratings[1].oscillators, Rating::Sell);
    }

    #[test]
    fn unknown_rating_wording_is_a_data_error() {
        let html = r#"
<table data-test="technical-summaries-table">
  <tbody><tr><td>Daily</td><td>Hold</td><td>Buy</td><td>Buy</td></tr></tbody>
</table>
"#;
        assert!(parse_technicals(html).is_err());
    }

    #[test]
    fn figures_with_separators_parse() {
        assert_eq!(parse_figure("17,842.85").unwrap(), Decimal::new(1_784_285, 2));
        assert_eq!(parse_figure("+0.71%").unwrap(), Decimal::new(71, 2));
        assert!(parse_figure("n/a").is_err());
    }
}
