//! Cropping
//!
//! Cuts a raster down to a half-open [`EdgeBounds`] rectangle, usually the
//! one found by edge detection.
//!
//! # Bilevel rasters
//!
//! Packed rows are cut on byte boundaries: the left bound is rounded down
//! and the right bound up to a multiple of 8 pixels, so a bilevel crop may
//! keep up to 7 extra columns on each side.

use crate::TransformResult;
use scanmagic_core::{
    EdgeBounds, PixelFormat, Raster, RasterAccess, RasterGeometry, RasterMut, alloc_buffer,
};
use tracing::{debug, trace};

/// Bytes kept from every retained row.
#[derive(Debug, Clone, Copy)]
struct CropSpan {
    /// Offset of the first kept byte within a row
    start: usize,
    /// Number of bytes kept per row
    len: usize,
    /// Width of the cropped raster in pixels
    pixels: u32,
}

fn crop_span(g: &RasterGeometry, bounds: &EdgeBounds) -> TransformResult<CropSpan> {
    bounds.validate_within(g.width(), g.height())?;

    let span = match g.format() {
        PixelFormat::Bilevel => {
            let left_byte = bounds.left / 8;
            let right_byte = bounds.right.div_ceil(8);
            let len = (right_byte - left_byte) as usize;
            CropSpan {
                start: left_byte as usize,
                len,
                pixels: (len as u32 * 8).min(g.width() - left_byte * 8),
            }
        }
        PixelFormat::Gray | PixelFormat::Rgb => {
            let bpp = g.bytes_per_pixel();
            CropSpan {
                start: bounds.left as usize * bpp,
                len: bounds.width() as usize * bpp,
                pixels: bounds.width(),
            }
        }
    };
    debug!(
        start = span.start,
        len = span.len,
        pixels = span.pixels,
        "crop span"
    );
    Ok(span)
}

/// Copy the `bounds` rectangle of a raster into a new raster.
///
/// # Errors
///
/// Returns an invalid-parameter error unless
/// `top < bottom <= height` and `left < right <= width`.
///
/// # Example
/// ```
/// use scanmagic_core::{EdgeBounds, Raster, RasterGeometry};
/// use scanmagic_transform::crop;
///
/// let page = Raster::filled(RasterGeometry::gray8(200, 300).unwrap(), 255).unwrap();
/// let bounds = EdgeBounds::new(50, 250, 50, 150).unwrap();
/// let cropped = crop(&page, bounds).unwrap();
/// assert_eq!((cropped.width(), cropped.height()), (100, 200));
/// ```
pub fn crop(raster: &Raster, bounds: EdgeBounds) -> TransformResult<Raster> {
    trace!(?bounds, "crop: start");
    let span = crop_span(raster.geometry(), &bounds)?;
    let geometry = raster.geometry().resized(span.pixels, bounds.height())?;

    let mut data = alloc_buffer(geometry.byte_len(), 0)?;
    for (dst, y) in data
        .chunks_exact_mut(span.len)
        .zip(bounds.top..bounds.bottom)
    {
        dst.copy_from_slice(&raster.row_bytes(y)[span.start..span.start + span.len]);
    }

    trace!("crop: finish");
    Ok(Raster::from_bytes(geometry, data)?)
}

/// Crop a raster by compacting the kept rows to the front of its own buffer.
///
/// No scratch buffer is needed: every kept row moves to an offset no later
/// than its source. The buffer is truncated to the new size.
pub fn crop_in_place(raster: &mut RasterMut, bounds: EdgeBounds) -> TransformResult<()> {
    trace!(?bounds, "crop_in_place: start");
    let g = *raster.geometry();
    let span = crop_span(&g, &bounds)?;
    let geometry = g.resized(span.pixels, bounds.height())?;

    let stride = g.stride();
    let data = raster.data_mut();
    for (i, y) in (bounds.top..bounds.bottom).enumerate() {
        let src = y as usize * stride + span.start;
        data.copy_within(src..src + span.len, i * span.len);
    }
    raster.compact_to(geometry)?;

    trace!("crop_in_place: finish");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmagic_core::{BitDepth, SampleOrder};

    fn numbered(geometry: RasterGeometry) -> Raster {
        let len = geometry.byte_len();
        Raster::from_bytes(geometry, (0..len).map(|i| (i % 251) as u8).collect()).unwrap()
    }

    #[test]
    fn test_crop_gray_contents() {
        let page = numbered(RasterGeometry::gray8(10, 6).unwrap());
        let bounds = EdgeBounds::new(1, 4, 2, 7).unwrap();
        let out = crop(&page, bounds).unwrap();
        assert_eq!((out.width(), out.height(), out.stride()), (5, 3, 5));
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(out.sample(x, y, 0), page.sample(x + 2, y + 1, 0));
            }
        }
    }

    #[test]
    fn test_crop_rgb_uses_three_bytes_per_pixel() {
        let page = numbered(RasterGeometry::rgb8(8, 4).unwrap());
        let out = crop(&page, EdgeBounds::new(0, 2, 3, 5).unwrap()).unwrap();
        assert_eq!(out.stride(), 6);
        assert_eq!(out.pixel_bytes(0, 1), page.pixel_bytes(3, 1));
        assert_eq!(out.pixel_bytes(1, 0), page.pixel_bytes(4, 0));
    }

    #[test]
    fn test_crop_bilevel_widens_to_bytes() {
        let page = numbered(RasterGeometry::bilevel(20, 4).unwrap());
        let out = crop(&page, EdgeBounds::new(0, 4, 3, 12).unwrap()).unwrap();
        // columns 0..16 survive
        assert_eq!((out.width(), out.stride()), (16, 2));
        assert_eq!(out.row_bytes(2), &page.row_bytes(2)[0..2]);

        // right bound inside the last partial byte stays within the width
        let out = crop(&page, EdgeBounds::new(0, 4, 9, 20).unwrap()).unwrap();
        assert_eq!((out.width(), out.stride()), (12, 2));
    }

    #[test]
    fn test_crop_sixteen_bit() {
        let g = RasterGeometry::new(PixelFormat::Gray, BitDepth::Bit16, 6, 3)
            .unwrap()
            .with_sample_order(SampleOrder::BigEndian);
        let page = numbered(g);
        let out = crop(&page, EdgeBounds::new(1, 3, 1, 4).unwrap()).unwrap();
        assert_eq!(out.stride(), 6);
        assert_eq!(out.geometry().sample_order(), SampleOrder::BigEndian);
        assert_eq!(out.pixel_bytes(2, 1), page.pixel_bytes(3, 2));
    }

    #[test]
    fn test_crop_rejects_bad_bounds() {
        let page = numbered(RasterGeometry::gray8(10, 10).unwrap());
        let bounds = EdgeBounds {
            top: 0,
            bottom: 11,
            left: 0,
            right: 5,
        };
        assert!(crop(&page, bounds).is_err());
        let bounds = EdgeBounds {
            top: 3,
            bottom: 3,
            left: 0,
            right: 5,
        };
        assert!(crop(&page, bounds).is_err());
    }

    #[test]
    fn test_crop_in_place_matches_copy() {
        let g = RasterGeometry::gray8(12, 9).unwrap().with_stride(16).unwrap();
        let page = numbered(g);
        let bounds = EdgeBounds::new(2, 8, 3, 11).unwrap();
        let copied = crop(&page, bounds).unwrap();

        let mut m = page.to_mut();
        crop_in_place(&mut m, bounds).unwrap();
        assert_eq!((m.width(), m.height(), m.stride()), (8, 6, 8));
        assert_eq!(m.data(), copied.data());
    }

    #[test]
    fn test_crop_in_place_failure_leaves_raster() {
        let page = numbered(RasterGeometry::gray8(4, 4).unwrap());
        let mut m = page.to_mut();
        let bounds = EdgeBounds {
            top: 0,
            bottom: 4,
            left: 2,
            right: 9,
        };
        assert!(crop_in_place(&mut m, bounds).is_err());
        assert_eq!(m.data(), page.data());
        assert_eq!(m.width(), 4);
    }
}
