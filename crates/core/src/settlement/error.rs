//! Settlement error types.
//!
//! The engine itself never persists anything, so every error aborts the run with no
//! external effect. Storage faults arrive from the collaborators as `Snapshot`.

use thiserror::Error;

/// Errors that can occur during a settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The caller cancelled the run.
    #[error("Settlement was cancelled")]
    Cancelled,

    /// The request parameters are not usable.
    #[error("Invalid settlement request: {0}")]
    InvalidRequest(String),

    /// The calendar has no boundaries for the plan year.
    #[error("No fiscal calendar for plan year {0}")]
    FiscalYearNotFound(i16),

    /// The plan snapshot could not be read.
    #[error("Plan snapshot error: {0}")]
    Snapshot(String),
}

impl SettlementError {
    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a snapshot error.
    #[must_use]
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Returns the error code for callers that report failures.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::FiscalYearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::Snapshot(_) => "SNAPSHOT_ERROR",
        }
    }

    /// Returns true if running the same request again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Snapshot(_))
    }
}
