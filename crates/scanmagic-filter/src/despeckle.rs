//! Despeckle filter
//!
//! Removes dust and toner specks that are smaller than a square window.
//!
//! # Algorithm
//!
//! A `diameter` x `diameter` window slides over the interior of the page,
//! one pixel at a time, keeping a one-pixel ring around it inside the image.
//! For each position:
//!
//! 1. The darkest pixel inside the window sets a threshold one third of the
//!    way from it to white.
//! 2. If any ring pixel is darker than the threshold, the dark content
//!    continues past the window and is left alone.
//! 3. Otherwise the window is an isolated speck and is painted with the
//!    average color of the ring (white for bilevel pages).
//!
//! The window moves over pixels it has already cleaned, so each position
//! sees the result of the previous ones.

use crate::{FilterError, FilterResult};
use scanmagic_core::{BitDepth, PixelFormat, RasterGeometry, RasterMut, get_data_bit, set_data_bit};
use tracing::{debug, trace};

// ============================================================================
// Public API
// ============================================================================

/// Remove isolated specks up to `diameter` pixels across, in place.
///
/// Supports bilevel, 8-bit gray and 8-bit RGB rasters. Pages too small to
/// hold a window and its ring are returned unchanged.
///
/// # Errors
///
/// - [`FilterError::InvalidParameters`] if `diameter` is zero.
/// - [`FilterError::Core`] with an invalid-format error for 16-bit rasters;
///   the raster is not modified.
pub fn despeckle(raster: &mut RasterMut, diameter: u32) -> FilterResult<()> {
    if diameter == 0 {
        return Err(FilterError::InvalidParameters(
            "despeckle diameter must be at least 1".to_string(),
        ));
    }
    let g = *raster.geometry();
    trace!(diameter, width = g.width(), height = g.height(), "despeckle: start");

    let window = Window::span(&g, diameter);
    let removed = match (g.format(), g.depth()) {
        (PixelFormat::Bilevel, _) => despeckle_bilevel(raster.data_mut(), &g, window),
        (PixelFormat::Gray | PixelFormat::Rgb, BitDepth::Bit8) => {
            despeckle_chunky(raster.data_mut(), &g, window)
        }
        _ => return Err(g.unsupported().into()),
    };

    debug!(removed, "despeckle: finish");
    Ok(())
}

// ============================================================================
// Implementation
// ============================================================================

/// Range of window origins that keep the ring inside the image.
#[derive(Debug, Clone, Copy)]
struct Window {
    diameter: usize,
    /// Window tops run over `1..rows`
    rows: usize,
    /// Window lefts run over `1..cols`
    cols: usize,
}

impl Window {
    fn span(g: &RasterGeometry, diameter: u32) -> Self {
        let d = diameter as usize;
        Self {
            diameter: d,
            rows: (g.height() as usize).saturating_sub(1 + d),
            cols: (g.width() as usize).saturating_sub(1 + d),
        }
    }

    /// Number of ring pixels around a window.
    fn ring_len(&self) -> u32 {
        4 * self.diameter as u32 + 4
    }

    /// Whether (`k`, `l`), relative to the ring's top-left corner, lies on the ring.
    #[inline]
    fn on_ring(&self, k: usize, l: usize) -> bool {
        let last = self.diameter + 1;
        k == 0 || k == last || l == 0 || l == last
    }
}

/// Gray and RGB: each sample is one byte, `channels` bytes per pixel.
fn despeckle_chunky(data: &mut [u8], g: &RasterGeometry, w: Window) -> usize {
    let channels = g.channels() as usize;
    let stride = g.stride();
    let white = 255 * channels as u32;
    let offset = |y: usize, x: usize| y * stride + x * channels;
    let intensity = |data: &[u8], at: usize| -> u32 {
        data[at..at + channels].iter().map(|&v| v as u32).sum()
    };

    let mut removed = 0;
    for top in 1..w.rows {
        for left in 1..w.cols {
            let mut darkest = white;
            for k in 0..w.diameter {
                for l in 0..w.diameter {
                    darkest = darkest.min(intensity(&*data, offset(top + k, left + l)));
                }
            }
            let thresh = (darkest + 2 * white) / 3;

            let mut outer = [0u32; 3];
            let mut hit = false;
            'ring: for k in 0..w.diameter + 2 {
                for l in 0..w.diameter + 2 {
                    if !w.on_ring(k, l) {
                        continue;
                    }
                    let at = offset(top + k - 1, left + l - 1);
                    if intensity(&*data, at) < thresh {
                        hit = true;
                        break 'ring;
                    }
                    for (sum, &v) in outer.iter_mut().zip(&data[at..at + channels]) {
                        *sum += v as u32;
                    }
                }
            }
            if hit {
                continue;
            }

            let ring = w.ring_len();
            let mut fill = [0u8; 3];
            for (f, &sum) in fill.iter_mut().zip(&outer) {
                *f = (sum / ring) as u8;
            }
            for k in 0..w.diameter {
                for l in 0..w.diameter {
                    let at = offset(top + k, left + l);
                    data[at..at + channels].copy_from_slice(&fill[..channels]);
                }
            }
            if darkest < white {
                removed += 1;
            }
        }
    }
    removed
}

/// Bilevel: a window with any black pixel and an all-white ring is cleared.
fn despeckle_bilevel(data: &mut [u8], g: &RasterGeometry, w: Window) -> usize {
    let stride = g.stride();
    let bit = |data: &[u8], y: usize, x: usize| get_data_bit(&data[y * stride..], x as u32);

    let mut removed = 0;
    for top in 1..w.rows {
        for left in 1..w.cols {
            let view = &*data;
            let any_black = (0..w.diameter)
                .any(|k| (0..w.diameter).any(|l| bit(view, top + k, left + l) != 0));
            if !any_black {
                continue;
            }

            let ring_black = (0..w.diameter + 2).any(|k| {
                (0..w.diameter + 2)
                    .any(|l| w.on_ring(k, l) && bit(view, top + k - 1, left + l - 1) != 0)
            });
            if ring_black {
                continue;
            }

            for k in 0..w.diameter {
                let row = &mut data[(top + k) * stride..];
                for l in 0..w.diameter {
                    set_data_bit(row, (left + l) as u32, 0);
                }
            }
            removed += 1;
        }
    }
    removed
}
