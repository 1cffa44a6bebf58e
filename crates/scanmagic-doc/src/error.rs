//! Error types for scanmagic-doc

use scanmagic_filter::FilterError;
use scanmagic_recog::RecogError;
use scanmagic_transform::TransformError;
use thiserror::Error;

/// Errors that can occur while cleaning a page
#[derive(Debug, Error)]
pub enum DocError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] scanmagic_core::Error),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// Filter library error
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Recognition library error
    #[error("recognition error: {0}")]
    Recog(#[from] RecogError),

    /// Invalid cleanup options
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DocError {
    /// The core error at the bottom of the chain, if any.
    pub fn core_error(&self) -> Option<&scanmagic_core::Error> {
        match self {
            DocError::Core(e)
            | DocError::Transform(TransformError::Core(e))
            | DocError::Filter(FilterError::Core(e))
            | DocError::Recog(RecogError::Core(e))
            | DocError::Recog(RecogError::Transform(TransformError::Core(e))) => Some(e),
            _ => None,
        }
    }

    /// Whether a cleanup step failing this way should be skipped and the
    /// page kept: the geometry could not be determined, or the step does
    /// not handle the page's format.
    pub fn skips_step(&self) -> bool {
        match self {
            DocError::Recog(e) if e.is_not_found() => true,
            _ => matches!(
                self.core_error(),
                Some(scanmagic_core::Error::InvalidFormat { .. })
            ),
        }
    }
}

/// Result type for cleanup operations
pub type DocResult<T> = Result<T, DocError>;
