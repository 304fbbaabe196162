use thiserror::Error;

/// Unified error type for the mercato workspace.
///
/// This wraps configuration lookup misses, capability mismatches, argument
/// validation errors, provider-tagged failures, and storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MercatoError {
    /// A canonical code or provider label has no configured counterpart.
    ///
    /// A miss is a configuration defect, not a transient fault: it is never
    /// retried and never replaced with a default symbol.
    #[error("configuration lookup miss: {what}")]
    LookupMiss {
        /// Description of the missing entry, e.g. "SPX500 in tradingview namespace".
        what: String,
    },

    /// Configuration file missing, unreadable, or structurally invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "history").
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Issues with the returned or expected data (missing fields, bad shapes).
    #[error("data issue: {0}")]
    Data(String),

    /// A storage sink (database, spreadsheet, filesystem) failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl MercatoError {
    /// Helper: build a `LookupMiss` error for a description of the missing entry.
    pub fn lookup_miss(what: impl Into<String>) -> Self {
        Self::LookupMiss { what: what.into() }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Config` error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Helper: build a `Storage` error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Returns true if this error is a registry lookup miss.
    ///
    /// Jobs use this to classify per-code failures: a miss means the
    /// configuration omits a mapping and the affected code is skipped while
    /// sibling codes proceed.
    #[must_use]
    pub const fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::LookupMiss { .. })
    }
}
