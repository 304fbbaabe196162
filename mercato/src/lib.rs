//! mercato orchestrates scheduled collection of market-index data.
//!
//! Overview
//! - A fixed universe of ten indices is described by the symbol registry in
//!   `mercato-core`; every job resolves canonical codes into the symbol
//!   notation of the provider it talks to.
//! - Providers implement the `mercato-core` role traits: the finance API
//!   (`mercato-yfinance`), the investing site (`mercato-investing`), and
//!   the charting site (`mercato-tradingview`).
//! - Sinks live in `mercato-store`: MySQL tables with upsert + retention,
//!   spreadsheet worksheets, and CSV artifacts.
//! - Each scheduled job is one function in [`jobs`]; the external
//!   automation platform triggers them through the `mercato` CLI binary on
//!   its own timers. No scheduler lives in this workspace.
//!
//! Failure model
//! - A registry lookup miss or a provider failure aborts the affected code
//!   only; sibling codes proceed and the per-code failures are returned in
//!   the [`jobs::JobReport`].
//! - Sink failures (database unreachable, spreadsheet API rejecting calls)
//!   abort the job.
//!
//! Building an orchestrator and running a job:
//! ```rust,ignore
//! use std::sync::Arc;
//! use mercato::Mercato;
//! use mercato_core::AppConfig;
//! use mercato_yfinance::YfConnector;
//!
//! let config = AppConfig::load("config.yaml")?;
//! let mercato = Mercato::builder()
//!     .config(config)
//!     .with_connector(Arc::new(YfConnector::new_default()))
//!     .build()?;
//! let report = mercato.news(None).await?;
//! println!("wrote {} rows", report.written);
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
/// The scheduled jobs and their report type.
pub mod jobs;

pub use core::{Mercato, MercatoBuilder};
pub use jobs::{CodeFailure, JobReport};

// Re-export core types for convenience
pub use mercato_core::{
    AppConfig, CandleRow, ComponentRow, FetchWindow, IndexCode, IndexSnapshot, MercatoError,
    Namespace, NewsDigest, NewsItem, SnapshotRow, SymbolRegistry, TechnicalSummary,
};
