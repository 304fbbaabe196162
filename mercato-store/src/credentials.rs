//! Credential files for the storage backends.
//!
//! Credentials live in JSON files provisioned by the automation platform;
//! this module only reads them.

use std::path::Path;

use serde::Deserialize;

use mercato_core::MercatoError;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, MercatoError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| MercatoError::config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| MercatoError::config(e.to_string()))
}

/// MySQL connection credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct MySqlCredentials {
    /// Server hostname.
    pub host: String,
    /// Server port.
    #[serde(default = "default_mysql_port")]
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database (schema) name.
    pub database: String,
}

const fn default_mysql_port() -> u16 {
    3306
}

impl MySqlCredentials {
    /// Load credentials from a JSON file.
    ///
    /// # Errors
    /// Returns [`MercatoError::Config`] when the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MercatoError> {
        read_json(path.as_ref())
    }

    /// Connection URL for the pool.
    #[must_use]
    pub fn connect_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Spreadsheet credentials: target document plus a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsCredentials {
    /// Spreadsheet document id.
    pub spreadsheet_id: String,
    /// OAuth bearer token (provisioned externally).
    pub token: String,
    /// Optional endpoint override (tests, proxies).
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl SheetsCredentials {
    /// Load credentials from a JSON file.
    ///
    /// # Errors
    /// Returns [`MercatoError::Config`] when the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MercatoError> {
        read_json(path.as_ref())
    }
}
