//! SAI error types and status handling.
//!
//! Stats calls report outcomes at two levels: the call itself returns a
//! [`SaiResult`], and bulk calls additionally fill one [`SaiStatus`] per
//! object row. Both are defined here.

use std::fmt;
use thiserror::Error;

/// Per-row status of a bulk stats call, matching `sai_status_t`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaiStatus {
    #[default]
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    BufferOverflow = -8,
    NotImplemented = -15,
    InvalidObjectId = -19,
    NotExecuted = -23,
}

impl SaiStatus {
    pub fn is_success(&self) -> bool {
        *self == SaiStatus::Success
    }
}

impl fmt::Display for SaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaiStatus::Success => "SAI_STATUS_SUCCESS",
            SaiStatus::Failure => "SAI_STATUS_FAILURE",
            SaiStatus::NotSupported => "SAI_STATUS_NOT_SUPPORTED",
            SaiStatus::BufferOverflow => "SAI_STATUS_BUFFER_OVERFLOW",
            SaiStatus::NotImplemented => "SAI_STATUS_NOT_IMPLEMENTED",
            SaiStatus::InvalidObjectId => "SAI_STATUS_INVALID_OBJECT_ID",
            SaiStatus::NotExecuted => "SAI_STATUS_NOT_EXECUTED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for SAI stats operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaiError {
    /// SAI API returned an error status.
    #[error("SAI operation failed: {status}")]
    Status { status: SaiStatus },

    /// The requested stat, attribute or bulk operation is not supported.
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    /// The caller-provided list was too small; `required` entries are needed.
    ///
    /// First half of the two-phase size/query idiom.
    #[error("Buffer overflow: {required} entries required")]
    BufferOverflow { required: usize },
}

impl SaiError {
    /// Creates an error from a failed call's status.
    pub fn from_status(status: SaiStatus) -> Self {
        match status {
            SaiStatus::NotSupported | SaiStatus::NotImplemented => SaiError::NotSupported {
                feature: status.to_string(),
            },
            _ => SaiError::Status { status },
        }
    }

    pub fn not_supported(feature: impl Into<String>) -> Self {
        SaiError::NotSupported {
            feature: feature.into(),
        }
    }

    /// Status code this error corresponds to.
    pub fn status(&self) -> SaiStatus {
        match self {
            SaiError::Status { status } => *status,
            SaiError::NotSupported { .. } => SaiStatus::NotSupported,
            SaiError::BufferOverflow { .. } => SaiStatus::BufferOverflow,
        }
    }
}

/// Result type for SAI operations.
pub type SaiResult<T> = Result<T, SaiError>;
