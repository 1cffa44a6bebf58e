//! scanmagic-core - Basic data structures for scan post-processing
//!
//! This crate provides the types every other scanmagic crate operates on:
//!
//! - [`Raster`] / [`RasterMut`] - A scanned image buffer (shared / exclusive)
//! - [`RasterGeometry`] - Pixel format, depth, dimensions and row stride
//! - [`EdgeBounds`] - A half-open pixel rectangle inside a raster
//! - [`GeometryRect`] / [`Fixed`] - Rectangles in the caller's units
//!
//! # Supported layouts
//!
//! | format  | depth | bytes per row            |
//! |---------|-------|--------------------------|
//! | Bilevel | 1     | `ceil(width / 8)`        |
//! | Gray    | 8, 16 | `width * depth / 8`      |
//! | Rgb     | 8, 16 | `width * 3 * depth / 8`  |

pub mod error;
pub mod geometry;
pub mod raster;

pub use error::{Error, Result};
pub use geometry::{EdgeBounds, Fixed, GeometryRect, Unit, ValueKind};
pub use raster::{
    BitDepth, PixelFormat, Raster, RasterAccess, RasterGeometry, RasterMut, SampleOrder,
    alloc_buffer, get_data_bit, set_data_bit,
};
