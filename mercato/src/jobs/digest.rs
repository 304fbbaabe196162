//! LLM news digests with sentiment, refreshed incrementally.
//!
//! Source articles come from the stored investing news table. An index is
//! re-summarized only when its newest article is newer than the digest
//! already on the worksheet; untouched digests are carried over so the
//! worksheet stays complete.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use mercato_core::{IndexCode, MercatoError, NewsItem, SymbolRegistry};
use mercato_gemini::{SentimentScorer, Summarizer};
use mercato_store::{CsvWriter, MySqlStore, SheetsClient};

use super::{JobReport, TS_FORMAT};

const CSV_FILE: &str = "news_digest.csv";
pub(crate) const SHEET: &str = "news_digest";
const HEADER: [&str; 5] = ["Symbol", "Summary", "Sentiment", "Confidence", "Last Updated"];

/// Group stored articles by code, in canonical order.
pub(crate) fn group_by_code(items: Vec<NewsItem>) -> BTreeMap<IndexCode, Vec<NewsItem>> {
    let mut grouped: BTreeMap<IndexCode, Vec<NewsItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.code).or_default().push(item);
    }
    grouped
}

/// Newest publication timestamp among the articles.
pub(crate) fn latest_published(items: &[NewsItem]) -> Option<DateTime<Utc>> {
    items.iter().filter_map(|i| i.published_at).max()
}

/// Existing worksheet rows keyed by code. The header row and rows with an
/// unknown symbol are ignored.
pub(crate) fn parse_existing(rows: &[Vec<String>]) -> BTreeMap<IndexCode, Vec<String>> {
    rows.iter()
        .skip(1)
        .filter(|r| !r.is_empty())
        .filter_map(|r| {
            let code: IndexCode = r[0].parse().ok()?;
            Some((code, r.clone()))
        })
        .collect()
}

fn stored_last_updated(row: &[String]) -> Option<DateTime<Utc>> {
    let raw = row.get(4)?;
    NaiveDateTime::parse_from_str(raw, TS_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whether a code needs a fresh digest given the stored row and the newest
/// source article.
pub(crate) fn needs_refresh(existing: Option<&Vec<String>>, latest: Option<DateTime<Utc>>) -> bool {
    let Some(row) = existing else {
        return true;
    };
    match (stored_last_updated(row), latest) {
        (Some(stored), Some(latest)) => latest > stored,
        // No stored timestamp means the row cannot be trusted as current.
        (None, _) => true,
        // No source timestamps: nothing newer to fold in.
        (_, None) => false,
    }
}

fn digest_row(
    code: IndexCode,
    summary: &str,
    sentiment: Option<&mercato_core::Sentiment>,
    last_updated: Option<DateTime<Utc>>,
) -> Vec<String> {
    vec![
        code.to_string(),
        summary.to_string(),
        sentiment.map(|s| s.label.to_string()).unwrap_or_default(),
        sentiment
            .map(|s| format!("{:.4}", s.confidence))
            .unwrap_or_default(),
        last_updated
            .map(|d| d.format(TS_FORMAT).to_string())
            .unwrap_or_default(),
    ]
}

/// Run the digest refresh.
///
/// # Errors
/// Returns sink errors; per-code model failures are recorded in the
/// report and leave the previous digest row in place.
pub async fn run(
    registry: &SymbolRegistry,
    store: &MySqlStore,
    sheets: &SheetsClient,
    summarizer: &dyn Summarizer,
    scorer: Option<&dyn SentimentScorer>,
    csv: &CsvWriter,
) -> Result<JobReport, MercatoError> {
    let grouped = group_by_code(store.fetch_news(super::investing_news::TABLE).await?);

    let mut existing = match sheets.read_rows(SHEET).await {
        Ok(rows) => parse_existing(&rows),
        Err(e) => {
            tracing::warn!(%e, "could not load the existing digest sheet; rebuilding from scratch");
            BTreeMap::new()
        }
    };

    let mut report = JobReport::default();
    for code in registry.codes() {
        let Some(items) = grouped.get(&code) else {
            tracing::info!(%code, "no stored news to digest");
            report.skipped += 1;
            continue;
        };
        let latest = latest_published(items);
        if !needs_refresh(existing.get(&code), latest) {
            tracing::info!(%code, "digest already current");
            report.skipped += 1;
            continue;
        }

        let texts: Vec<String> = items
            .iter()
            .map(|i| i.summary.clone().unwrap_or_else(|| i.title.clone()))
            .collect();
        let summary = match summarizer.summarize(code, &texts).await {
            Ok(s) => s,
            Err(e) => {
                report.record_failure(code, e);
                continue;
            }
        };

        let sentiment = match scorer {
            Some(scorer) => match scorer.sentiment(&summary).await {
                Ok(s) => Some(s),
                Err(e) => {
                    // The summary is still worth keeping; only the score is
                    // lost for this run.
                    report.record_failure(code, e);
                    None
                }
            },
            None => None,
        };

        existing.insert(code, digest_row(code, &summary, sentiment.as_ref(), latest));
        report.written += 1;
    }

    let rows: Vec<Vec<String>> = existing.into_values().collect();
    let path = csv.write(CSV_FILE, &HEADER, &rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "saved digest artifact");
    sheets.replace_rows(SHEET, &HEADER, &rows).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: IndexCode, published: Option<&str>) -> NewsItem {
        NewsItem {
            code,
            title: "t".into(),
            summary: None,
            url: "https://example.com".into(),
            published_at: published.map(|p| {
                NaiveDateTime::parse_from_str(p, TS_FORMAT)
                    .unwrap()
                    .and_utc()
            }),
        }
    }

    fn row(code: &str, last_updated: &str) -> Vec<String> {
        vec![
            code.to_string(),
            "summary".to_string(),
            "positive".to_string(),
            "0.9000".to_string(),
            last_updated.to_string(),
        ]
    }

    #[test]
    fn latest_published_ignores_undated_items() {
        let items = vec![
            item(IndexCode::Spx500, Some("2026-01-05 10:00:00")),
            item(IndexCode::Spx500, None),
            item(IndexCode::Spx500, Some("2026-01-05 12:00:00")),
        ];
        assert_eq!(
            latest_published(&items).unwrap().format(TS_FORMAT).to_string(),
            "2026-01-05 12:00:00"
        );
    }

    #[test]
    fn refresh_only_when_newer_articles_exist() {
        let stored = row("SPX500", "2026-01-05 12:00:00");
        let same = latest_published(&[item(IndexCode::Spx500, Some("2026-01-05 12:00:00"))]);
        let newer = latest_published(&[item(IndexCode::Spx500, Some("2026-01-05 13:00:00"))]);

        assert!(!needs_refresh(Some(&stored), same));
        assert!(needs_refresh(Some(&stored), newer));
        // Nothing stored yet: always refresh.
        assert!(needs_refresh(None, same));
        // Stored row without a parseable timestamp: refresh.
        let broken = row("SPX500", "yesterday");
        assert!(needs_refresh(Some(&broken), same));
    }

    #[test]
    fn existing_sheet_rows_parse_by_code() {
        let rows = vec![
            HEADER.iter().map(|h| (*h).to_string()).collect(),
            row("GER40", "2026-01-05 09:00:00"),
            row("NOT_A_CODE", "2026-01-05 09:00:00"),
        ];
        let existing = parse_existing(&rows);
        assert_eq!(existing.len(), 1);
        assert!(existing.contains_key(&IndexCode::Ger40));
    }

    #[test]
    fn digest_rows_format_sentiment_and_timestamps() {
        let sentiment = mercato_core::Sentiment {
            label: mercato_core::SentimentLabel::Negative,
            confidence: 0.8125,
        };
        let when = NaiveDateTime::parse_from_str("2026-01-05 12:00:00", TS_FORMAT)
            .unwrap()
            .and_utc();
        let row = digest_row(IndexCode::Uk100, "weak session", Some(&sentiment), Some(when));
        assert_eq!(
            row,
            vec![
                "UK100",
                "weak session",
                "negative",
                "0.8125",
                "2026-01-05 12:00:00"
            ]
        );

        let bare = digest_row(IndexCode::Uk100, "s", None, None);
        assert_eq!(bare[2], "");
        assert_eq!(bare[4], "");
    }
}
