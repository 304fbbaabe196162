//! CLI entry point: one subcommand per scheduled job.
//!
//! The external automation platform invokes `mercato <job>` on its timers;
//! there is no scheduler here.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use mercato::{JobReport, Mercato};
use mercato_core::{AppConfig, MercatoError};
use mercato_gemini::{GeminiClient, GeminiCredentials, SentimentClient, SentimentScorer};
use mercato_investing::InvestingConnector;
use mercato_store::{MySqlCredentials, MySqlStore, SheetsClient, SheetsCredentials};
use mercato_tradingview::TradingViewConnector;
use mercato_yfinance::YfConnector;

#[derive(Parser)]
#[command(
    name = "mercato",
    version,
    about = "Scheduled collection of market-index data into MySQL, spreadsheets, and CSV artifacts"
)]
struct Cli {
    /// Path to the YAML configuration.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to the MySQL credentials JSON.
    #[arg(long, default_value = "credential_mysql.json")]
    mysql_credentials: PathBuf,

    /// Path to the spreadsheet credentials JSON.
    #[arg(long, default_value = "credential_google_sheets.json")]
    sheets_credentials: PathBuf,

    /// Path to the model-service credentials JSON.
    #[arg(long, default_value = "credential_gemini.json")]
    gemini_credentials: PathBuf,

    /// Skip the spreadsheet upload (CSV artifacts are still written).
    #[arg(long)]
    no_sheets: bool,

    #[command(subcommand)]
    job: Job,
}

#[derive(Subcommand)]
enum Job {
    /// Intraday + daily OHLCV into MySQL.
    History,
    /// Finance-API news into CSV artifacts and per-index worksheets.
    News,
    /// Scraped news listings into MySQL.
    InvestingNews,
    /// Site-wide price snapshot into CSV and the price worksheet.
    Snapshot,
    /// Per-index technical summaries into CSV and the worksheet.
    Technicals,
    /// Per-index constituents into CSV and the worksheet.
    Components,
    /// LLM digests with sentiment, refreshed incrementally.
    Digest,
}

impl Cli {
    fn sheets(&self) -> Result<Option<SheetsClient>, MercatoError> {
        if self.no_sheets {
            return Ok(None);
        }
        let creds = SheetsCredentials::load(&self.sheets_credentials)?;
        Ok(Some(SheetsClient::new(&creds)?))
    }

    async fn mysql(&self) -> Result<MySqlStore, MercatoError> {
        let creds = MySqlCredentials::load(&self.mysql_credentials)?;
        MySqlStore::connect(&creds).await
    }
}

async fn run(cli: &Cli) -> Result<JobReport, MercatoError> {
    let config = AppConfig::load(&cli.config)?;

    match cli.job {
        Job::History => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(YfConnector::new_default()))
                .build()?;
            let store = cli.mysql().await?;
            let report = mercato.history(&store).await;
            store.close().await;
            report
        }
        Job::News => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(YfConnector::new_default()))
                .build()?;
            let sheets = cli.sheets()?;
            mercato.news(sheets.as_ref()).await
        }
        Job::InvestingNews => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(InvestingConnector::new_default()))
                .build()?;
            let store = cli.mysql().await?;
            let report = mercato.investing_news(&store).await;
            store.close().await;
            report
        }
        Job::Snapshot => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(InvestingConnector::new_default()))
                .build()?;
            let sheets = cli.sheets()?;
            mercato.snapshot(sheets.as_ref()).await
        }
        Job::Technicals => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(InvestingConnector::new_default()))
                .build()?;
            let sheets = cli.sheets()?;
            mercato.technicals(sheets.as_ref()).await
        }
        Job::Components => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(TradingViewConnector::new_default()))
                .build()?;
            let sheets = cli.sheets()?;
            mercato.components(sheets.as_ref()).await
        }
        Job::Digest => {
            let mercato = Mercato::builder()
                .config(config)
                .with_connector(Arc::new(InvestingConnector::new_default()))
                .build()?;
            let sheets = cli.sheets()?.ok_or_else(|| {
                MercatoError::InvalidArg("the digest job requires the spreadsheet sink".to_string())
            })?;
            let store = cli.mysql().await?;

            let model_creds = GeminiCredentials::load(&cli.gemini_credentials)?;
            let summarizer = GeminiClient::new(&model_creds)?;
            let scorer = model_creds
                .sentiment_endpoint
                .as_deref()
                .map(|endpoint| SentimentClient::new(endpoint, None))
                .transpose()?;

            let report = mercato
                .digest(
                    &store,
                    &sheets,
                    &summarizer,
                    scorer.as_ref().map(|s| s as &dyn SentimentScorer),
                )
                .await;
            store.close().await;
            report
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(report) => {
            tracing::info!(
                written = report.written,
                skipped = report.skipped,
                failures = report.failures.len(),
                "job finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(%e, "job aborted");
            ExitCode::FAILURE
        }
    }
}
