//! Error types for scanmagic-recog

use thiserror::Error;

/// Errors that can occur during page geometry detection
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] scanmagic_core::Error),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] scanmagic_transform::TransformError),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The paper edges could not be located
    #[error("edges not found: {0}")]
    EdgesNotFound(String),

    /// No usable skew could be measured
    #[error("skew undetectable: {0}")]
    SkewUndetectable(String),
}

impl RecogError {
    /// Whether this is an expected "could not determine geometry" outcome
    /// rather than a caller error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecogError::EdgesNotFound(_) | RecogError::SkewUndetectable(_)
        )
    }
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
