//! Store errors.

use profitshare_core::settlement::SettlementError;

/// Error types for snapshot loading.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The snapshot file could not be read.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON for a plan dataset.
    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two calendar entries settle the same plan year.
    #[error("Duplicate fiscal year: {0}")]
    DuplicateFiscalYear(i16),

    /// A calendar entry ends before it begins.
    #[error("Fiscal year {0} ends before it begins")]
    InvertedFiscalYear(i16),
}

impl From<StoreError> for SettlementError {
    fn from(err: StoreError) -> Self {
        Self::snapshot(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_becomes_snapshot_error() {
        let err: SettlementError = StoreError::DuplicateFiscalYear(2024).into();
        assert_eq!(err.error_code(), "SNAPSHOT_ERROR");
        assert!(err.to_string().contains("Duplicate fiscal year: 2024"));
    }
}
