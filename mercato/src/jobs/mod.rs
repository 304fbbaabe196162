//! One module per scheduled job, plus the report type they all share.
//!
//! Every job follows the same skeleton the collection scripts always had:
//! enumerate the registry, resolve each code for the target provider,
//! perform the provider I/O, and hand rows to the sinks. A failure for one
//! code is recorded and the siblings proceed; only sink-level failures
//! (e.g. the database being unreachable) abort a job as a whole.

pub mod components;
pub mod digest;
pub mod history;
pub mod investing_news;
pub mod news;
pub mod snapshot;
pub mod technicals;

use mercato_core::connector::MercatoConnector;
use mercato_core::{IndexCode, MercatoError};
use mercato_gemini::{SentimentScorer, Summarizer};
use mercato_store::{CsvWriter, MySqlStore, SheetsClient};

use crate::core::Mercato;

/// A per-code failure recorded by a job while its siblings proceeded.
#[derive(Debug, Clone)]
pub struct CodeFailure {
    /// The canonical code whose processing was aborted.
    pub code: IndexCode,
    /// The error that aborted it.
    pub error: MercatoError,
}

/// Outcome of one job run.
#[derive(Debug, Default)]
pub struct JobReport {
    /// Rows written across all sinks.
    pub written: u64,
    /// Codes skipped without an error (no data, or already up to date).
    pub skipped: u64,
    /// Per-code failures.
    pub failures: Vec<CodeFailure>,
}

impl JobReport {
    pub(crate) fn record_failure(&mut self, code: IndexCode, error: MercatoError) {
        tracing::warn!(%code, %error, "code failed; continuing with siblings");
        self.failures.push(CodeFailure { code, error });
    }
}

/// Timestamp format shared by worksheets and CSV artifacts.
pub(crate) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Mercato {
    /// Intraday + daily OHLCV for every tracked index into MySQL.
    ///
    /// # Errors
    /// Fails when no registered connector offers history, or on sink
    /// failures. Per-code provider failures are recorded in the report.
    pub async fn history(&self, store: &MySqlStore) -> Result<JobReport, MercatoError> {
        let provider = self.capability(MercatoConnector::as_history_provider, "history")?;
        history::run(
            self.registry(),
            provider,
            store,
            &self.config().minute_window(),
            &self.config().daily_window(),
        )
        .await
    }

    /// Latest finance-API news per index into CSV artifacts and, when a
    /// sheets client is given, per-index worksheets.
    ///
    /// Uses the first registered news-capable connector.
    ///
    /// # Errors
    /// Fails when no registered connector offers news, or on sink failures.
    pub async fn news(&self, sheets: Option<&SheetsClient>) -> Result<JobReport, MercatoError> {
        let provider = self.capability(MercatoConnector::as_news_provider, "news")?;
        let csv = CsvWriter::new(&self.config().output_directory)?;
        news::run(self.registry(), provider, &csv, sheets).await
    }

    /// News scraped per slug from the investing site into MySQL.
    ///
    /// # Errors
    /// Fails when no registered connector offers news, or on sink failures.
    pub async fn investing_news(&self, store: &MySqlStore) -> Result<JobReport, MercatoError> {
        let provider = self.capability(MercatoConnector::as_news_provider, "news")?;
        investing_news::run(self.registry(), provider, store).await
    }

    /// Site-wide price snapshot, resolved through display labels, into a
    /// CSV artifact and the `investing_price` worksheet.
    ///
    /// # Errors
    /// Fails when no registered connector offers snapshots, or on sink
    /// failures.
    pub async fn snapshot(&self, sheets: Option<&SheetsClient>) -> Result<JobReport, MercatoError> {
        let provider = self.capability(MercatoConnector::as_snapshot_provider, "snapshot")?;
        let csv = CsvWriter::new(&self.config().output_directory)?;
        snapshot::run(self.registry(), provider, &csv, sheets).await
    }

    /// Per-index technical summaries into a CSV artifact and the
    /// `investing_technical` worksheet.
    ///
    /// # Errors
    /// Fails when no registered connector offers technicals, or on sink
    /// failures.
    pub async fn technicals(
        &self,
        sheets: Option<&SheetsClient>,
    ) -> Result<JobReport, MercatoError> {
        let provider = self.capability(MercatoConnector::as_technicals_provider, "technicals")?;
        let csv = CsvWriter::new(&self.config().output_directory)?;
        technicals::run(self.registry(), provider, &csv, sheets).await
    }

    /// Per-index constituents into a CSV artifact and the
    /// `tradingview_components` worksheet.
    ///
    /// # Errors
    /// Fails when no registered connector offers components, or on sink
    /// failures.
    pub async fn components(
        &self,
        sheets: Option<&SheetsClient>,
    ) -> Result<JobReport, MercatoError> {
        let provider = self.capability(MercatoConnector::as_components_provider, "components")?;
        let csv = CsvWriter::new(&self.config().output_directory)?;
        components::run(self.registry(), provider, &csv, sheets).await
    }

    /// Summarize stored news per index, score sentiment, and refresh the
    /// `news_digest` worksheet. Indices whose newest article is unchanged
    /// since the stored digest are skipped.
    ///
    /// # Errors
    /// Fails on sink failures; per-code model failures are recorded in the
    /// report.
    pub async fn digest(
        &self,
        store: &MySqlStore,
        sheets: &SheetsClient,
        summarizer: &dyn Summarizer,
        scorer: Option<&dyn SentimentScorer>,
    ) -> Result<JobReport, MercatoError> {
        let csv = CsvWriter::new(&self.config().output_directory)?;
        digest::run(self.registry(), store, sheets, summarizer, scorer, &csv).await
    }
}
