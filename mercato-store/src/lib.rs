//! mercato-store
//!
//! Storage sinks for the collection jobs: MySQL tables with upsert and
//! per-symbol retention, a spreadsheet values-API client, and CSV
//! artifacts. Credentials for the external backends are read from JSON
//! files provisioned by the automation platform.
#![warn(missing_docs)]

/// Credential file models.
pub mod credentials;
/// CSV artifact writer.
pub mod csvout;
/// MySQL sink.
pub mod mysql;
/// Spreadsheet values-API client.
pub mod sheets;

pub use credentials::{MySqlCredentials, SheetsCredentials};
pub use csvout::CsvWriter;
pub use mysql::MySqlStore;
pub use sheets::SheetsClient;
