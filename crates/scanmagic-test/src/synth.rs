//! Synthetic scans
//!
//! Builders for the test pages used throughout the regression tests:
//! uniform backgrounds, bordered sheets, skewed sheets, stripes and
//! checkerboards, plus conversions of a gray page into the other formats.

use crate::TestResult;
use scanmagic_core::{
    BitDepth, EdgeBounds, PixelFormat, Raster, RasterAccess, RasterGeometry, RasterMut,
    SampleOrder,
};

/// Uniform 8-bit gray raster.
pub fn gray_page(width: u32, height: u32, value: u8) -> TestResult<Raster> {
    Ok(Raster::filled(RasterGeometry::gray8(width, height)?, value)?)
}

/// Paint a rectangle with a gray value.
///
/// On bilevel rasters values below 128 paint black.
pub fn fill_rect(raster: &mut RasterMut, rect: EdgeBounds, value: u8) {
    let g = *raster.geometry();
    let bottom = rect.bottom.min(g.height());
    let right = rect.right.min(g.width());
    for y in rect.top..bottom {
        for x in rect.left..right {
            if g.is_bilevel() {
                raster.set_bit(x, y, u8::from(value < 128));
            } else {
                let bpp = g.bytes_per_pixel();
                let px = vec![value; bpp];
                raster.set_pixel_bytes(x, y, &px);
            }
        }
    }
}

/// White gray page with the outline of a black rectangle.
///
/// `rect` is the outer edge of the outline; the line is `thickness`
/// pixels wide and drawn inside it.
pub fn outlined_sheet(
    width: u32,
    height: u32,
    rect: EdgeBounds,
    thickness: u32,
) -> TestResult<Raster> {
    let mut page = gray_page(width, height, 255)?.into_mut();
    let t = thickness;
    fill_rect(&mut page, EdgeBounds { bottom: rect.top + t, ..rect }, 0);
    fill_rect(&mut page, EdgeBounds { top: rect.bottom - t, ..rect }, 0);
    fill_rect(&mut page, EdgeBounds { right: rect.left + t, ..rect }, 0);
    fill_rect(&mut page, EdgeBounds { left: rect.right - t, ..rect }, 0);
    Ok(page.into())
}

/// Gray sheet of paper rotated on a dark scanner background.
///
/// The sheet is a `2*half_w` x `2*half_h` rectangle centered on
/// (`cx`, `cy`) whose top edge has the given slope in image coordinates.
#[allow(clippy::too_many_arguments)]
pub fn skewed_sheet(
    width: u32,
    height: u32,
    cx: f64,
    cy: f64,
    half_w: f64,
    half_h: f64,
    slope: f64,
    background: u8,
    paper: u8,
) -> TestResult<Raster> {
    let mut page = gray_page(width, height, background)?.into_mut();
    let angle = slope.atan();
    let (sin, cos) = angle.sin_cos();
    for y in 0..height {
        let row = page.row_mut(y);
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;
            if u.abs() <= half_w && v.abs() <= half_h {
                row[x as usize] = paper;
            }
        }
    }
    Ok(page.into())
}

/// Alternating black and white bands of `period` pixels.
///
/// Horizontal bands run along rows; vertical bands along columns.
pub fn stripes(width: u32, height: u32, period: u32, horizontal: bool) -> TestResult<Raster> {
    let mut page = gray_page(width, height, 255)?.into_mut();
    for y in 0..height {
        let row = page.row_mut(y);
        for x in 0..width {
            let band = if horizontal { y / period } else { x / period };
            if band % 2 == 0 {
                row[x as usize] = 0;
            }
        }
    }
    Ok(page.into())
}

/// Checkerboard of `cell`-pixel squares in dark and light gray.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> TestResult<Raster> {
    let mut page = gray_page(width, height, 0)?.into_mut();
    for y in 0..height {
        let row = page.row_mut(y);
        for x in 0..width {
            let dark = ((x / cell) + (y / cell)) % 2 == 0;
            row[x as usize] = if dark { 20 } else { 230 };
        }
    }
    Ok(page.into())
}

/// Threshold a gray page into a bilevel raster (below 128 is black).
pub fn to_bilevel(gray: &Raster) -> TestResult<Raster> {
    let g = RasterGeometry::bilevel(gray.width(), gray.height())?;
    let mut out = Raster::new(g)?.into_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            if gray.sample(x, y, 0) < 128 {
                out.set_bit(x, y, 1);
            }
        }
    }
    Ok(out.into())
}

/// Expand a gray page into RGB with a slight color cast.
///
/// Red and blue sit one step below and above the gray value, so the
/// channels differ but still average back to it.
pub fn to_rgb(gray: &Raster) -> TestResult<Raster> {
    let g = RasterGeometry::rgb8(gray.width(), gray.height())?;
    let mut out = Raster::new(g)?.into_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            let v = gray.sample(x, y, 0);
            let (r, b) = match v {
                0 => (0, 0),
                255 => (255, 255),
                _ => (v - 1, v + 1),
            };
            out.set_pixel_bytes(x, y, &[r, v, b]);
        }
    }
    Ok(out.into())
}

/// Widen a gray page to 16 bits per sample in the given byte order.
pub fn to_gray16(gray: &Raster, order: SampleOrder) -> TestResult<Raster> {
    let g = RasterGeometry::new(PixelFormat::Gray, BitDepth::Bit16, gray.width(), gray.height())?
        .with_sample_order(order);
    let mut out = Raster::new(g)?.into_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            let v = gray.sample(x, y, 0) as u16 * 257;
            let bytes = match order {
                SampleOrder::BigEndian => v.to_be_bytes(),
                SampleOrder::LittleEndian => v.to_le_bytes(),
            };
            out.set_pixel_bytes(x, y, &bytes);
        }
    }
    Ok(out.into())
}
