//! mercato-core
//!
//! Core types shared across the mercato data-collection ecosystem.
//!
//! - `registry`: the canonical index universe and the cross-provider
//!   symbol registry (the structural heart of the workspace).
//! - `config`: the YAML configuration model the registry is built from.
//! - `connector`: role traits implemented by the provider crates, plus the
//!   `MercatoConnector` capability directory.
//! - `types`: flat row types written to the storage sinks.
//! - `error`: the unified `MercatoError` taxonomy.
//!
//! The registry is constructed once at job start and is immutable and
//! `Send + Sync` afterwards; concurrently scheduled jobs share it without
//! coordination.
#![warn(missing_docs)]

/// Configuration document model.
pub mod config;
/// Connector role traits and the primary `MercatoConnector` interface.
pub mod connector;
/// Unified error type.
pub mod error;
/// Canonical index codes and the symbol registry.
pub mod registry;
/// Storage row types.
pub mod types;

pub use config::{AppConfig, FetchWindow, SymbolsConfig};
pub use connector::{
    ComponentsProvider, HistoryProvider, MercatoConnector, NewsProvider, SnapshotProvider,
    TechnicalsProvider,
};
pub use error::MercatoError;
pub use registry::{IndexCode, Namespace, SymbolRegistry};
pub use types::{
    CandleRow, ComponentRow, IndexSnapshot, NewsDigest, NewsItem, Rating, Sentiment,
    SentimentLabel, SnapshotRow, TechnicalSummary, TimeframeRating,
};
