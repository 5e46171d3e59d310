//! Error types for iprecord
//!
//! Callers are expected to branch on [`Error::DuplicateAddress`] and treat
//! every other variant as an operational fault.

use thiserror::Error;

/// Context attached to failures of the insert statement
pub const CREATE_ENTRY: &str = "create entry";

/// Result type alias for iprecord operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for iprecord
#[derive(Error, Debug)]
pub enum Error {
    /// The descriptor was rejected or the pool could not be registered
    #[error("open")]
    Open(#[source] sqlx::Error),

    /// The address is already recorded
    #[error("ip address already exists")]
    DuplicateAddress,

    /// Any other failure reported by the store
    #[error("{context}")]
    Store {
        /// Name of the failing operation
        context: &'static str,
        /// Driver error
        #[source]
        source: sqlx::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an open error from a descriptor problem
    pub fn open(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::Open(sqlx::Error::Configuration(msg.into()))
    }

    /// Wrap a driver error with the name of the failing operation
    pub fn store(context: &'static str, source: sqlx::Error) -> Self {
        Self::Store { context, source }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this is the duplicate-address sentinel
    pub fn is_duplicate_address(&self) -> bool {
        matches!(self, Self::DuplicateAddress)
    }
}
