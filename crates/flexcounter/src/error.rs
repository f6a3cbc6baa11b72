//! Error types for the flex counter engine.

use thiserror::Error;

/// Errors raised while configuring or running a flex counter instance.
///
/// Most of these never reach the control path: mutation entry points log
/// them and keep the previous state.
#[derive(Debug, Error)]
pub enum FlexCounterError {
    #[error("Invalid poll interval: {0}")]
    InvalidPollInterval(String),

    #[error("Invalid counter status: {0}")]
    InvalidStatus(String),

    #[error("Invalid stats mode: {0}")]
    InvalidStatsMode(String),

    #[error("Invalid bulk chunk size: {0}")]
    InvalidBulkChunkSize(String),

    #[error("Invalid bulk chunk size per prefix: {0}")]
    InvalidBulkChunkSizePerPrefix(String),

    #[error("Unknown counter group: {0}")]
    UnknownGroup(String),

    #[error("Cannot merge bulk partitions of {group}: object sets differ")]
    InconsistentMerge { group: String },

    #[error("Failed to spawn poll thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Result type for flex counter operations.
pub type Result<T> = std::result::Result<T, FlexCounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlexCounterError::InvalidPollInterval("abc".to_string());
        assert_eq!(err.to_string(), "Invalid poll interval: abc");
    }

    #[test]
    fn test_inconsistent_merge_display() {
        let err = FlexCounterError::InconsistentMerge {
            group: "Port Counter".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot merge bulk partitions of Port Counter: object sets differ"
        );
    }
}
