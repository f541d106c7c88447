//! # Error Types Module
//!
//! Errors that escape the helpdesk core. Invalid phone formats and empty
//! lookups are ordinary outcomes of the state machines and never show up here.

use thiserror::Error;

/// Errors surfaced by report storage, lookups and start-up configuration
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// Reading or writing a log file failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// Encoding a report row failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HelpdeskError {
    /// Whether this error came from the persistence layer.
    ///
    /// Storage failures are reported to users with a generic message and the
    /// session is left untouched so the step can be retried.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, HelpdeskError::Storage(_) | HelpdeskError::Csv(_))
    }
}
