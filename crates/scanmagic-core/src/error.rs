//! Error types for scanmagic-core
//!
//! Every variant is detected before pixel data is touched, so a caller
//! receiving an error still owns an unmodified raster.

use crate::raster::{BitDepth, PixelFormat};
use thiserror::Error;

/// scanmagic error type
#[derive(Error, Debug)]
pub enum Error {
    /// Format/depth combination not supported by the operation
    #[error("invalid format: {format:?} at {} bits per sample", .depth.bits())]
    InvalidFormat { format: PixelFormat, depth: BitDepth },

    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid bit depth
    #[error("invalid bit depth: {0}")]
    InvalidDepth(u32),

    /// Caller buffer shorter than `stride * height`
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Scratch or output buffer could not be reserved
    #[error("memory allocation failed")]
    AllocationFailed,
}

/// Result type alias for scanmagic operations
pub type Result<T> = std::result::Result<T, Error>;
