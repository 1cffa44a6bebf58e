//! Rotation about a pivot
//!
//! Deskewing rotates the page by the small angle whose tangent is the
//! detected top-edge slope. The pivot may lie outside the raster, which
//! keeps a page near the image border from being pushed off frame.
//!
//! # Algorithm
//!
//! Nearest-neighbour inverse mapping: every destination pixel looks up the
//! source pixel it came from, rotated by `-atan(slope)` about the pivot.
//! Destination pixels whose source falls outside the raster take the
//! background color. The output is always built in a fresh buffer since
//! source and destination addressing overlap unpredictably.

use crate::{TransformError, TransformResult};
use scanmagic_core::{
    PixelFormat, Raster, RasterAccess, RasterGeometry, RasterMut, alloc_buffer,
};
use tracing::{debug, trace};

// ============================================================================
// Public API
// ============================================================================

/// Rotate a raster so that a line of the given slope becomes horizontal.
///
/// # Arguments
/// * `raster` - Input raster (any supported format)
/// * `center_x`, `center_y` - Pivot in pixel coordinates, may be outside the image
/// * `slope` - Slope of the line to level (rise over run, y grows downward)
/// * `bg_color` - Fill byte for uncovered pixels; for bilevel any nonzero
///   value fills black
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `slope` is not finite.
pub fn rotate(
    raster: &Raster,
    center_x: i32,
    center_y: i32,
    slope: f64,
    bg_color: u8,
) -> TransformResult<Raster> {
    let (geometry, data) = rotate_impl(raster, center_x, center_y, slope, bg_color)?;
    Ok(Raster::from_bytes(geometry, data)?)
}

/// Rotate a raster, replacing its contents once the output is complete.
pub fn rotate_in_place(
    raster: &mut RasterMut,
    center_x: i32,
    center_y: i32,
    slope: f64,
    bg_color: u8,
) -> TransformResult<()> {
    let (geometry, data) = rotate_impl(&*raster, center_x, center_y, slope, bg_color)?;
    raster.replace_contents(geometry, data)?;
    Ok(())
}

// ============================================================================
// Implementation
// ============================================================================

fn rotate_impl<R: RasterAccess>(
    src: &R,
    center_x: i32,
    center_y: i32,
    slope: f64,
    bg_color: u8,
) -> TransformResult<(RasterGeometry, Vec<u8>)> {
    if !slope.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "slope must be finite, got {slope}"
        )));
    }
    let geometry = *src.geometry();
    trace!(center_x, center_y, slope, "rotate: start");

    let fill = match geometry.format() {
        PixelFormat::Bilevel if bg_color != 0 => 0xff,
        _ => bg_color,
    };
    let data = alloc_buffer(geometry.byte_len(), fill)?;
    let mut out = RasterMut::from_bytes(geometry, data)?;

    let angle = -slope.atan();
    let (sin, cos) = angle.sin_cos();
    let width = geometry.width() as i64;
    let height = geometry.height() as i64;
    let (cx, cy) = (center_x as i64, center_y as i64);

    let mut copied = 0usize;
    for y in 0..height {
        let dy = (y - cy) as f64;
        for x in 0..width {
            let dx = (x - cx) as f64;
            let sx = cx + (dx * cos + dy * sin).round() as i64;
            if sx < 0 || sx >= width {
                continue;
            }
            let sy = cy + (dy * cos - dx * sin).round() as i64;
            if sy < 0 || sy >= height {
                continue;
            }
            out.copy_pixel_from(x as u32, y as u32, src, sx as u32, sy as u32);
            copied += 1;
        }
    }

    debug!(copied, "rotate: finish");
    Ok((geometry, out.into_bytes()))
}
