//! Blank page detection
//!
//! Two classifiers for pages not worth keeping:
//!
//! - [`is_blank`] averages the darkness of the whole page. Cheap, but a
//!   few lines of text on an otherwise empty page drown in the average.
//! - [`is_blank_blocks`] tiles the page into half-inch blocks, skipping a
//!   quarter-inch margin, and keeps the page as soon as any one block is
//!   dark enough. Dust and shadows along the paper edges fall into the
//!   margin.
//!
//! Darkness is `255 - sample` per channel, so a black pixel is fully dark;
//! for bilevel pages every set bit is fully dark. Thresholds are percentages.

use crate::{RecogError, RecogResult};
use scanmagic_core::{Raster, RasterAccess};
use tracing::{debug, trace};

/// Outcome of a blank page check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageVerdict {
    /// Nothing worth keeping
    Blank,
    /// The page has content
    Content,
}

impl PageVerdict {
    pub fn is_blank(self) -> bool {
        self == PageVerdict::Blank
    }
}

/// Classify a page by its average darkness.
///
/// The page is [`PageVerdict::Blank`] when its darkness, as a percentage,
/// is at most `thresh_percent`.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if the threshold is negative or
/// not finite.
///
/// # Example
/// ```
/// use scanmagic_core::{Raster, RasterGeometry};
/// use scanmagic_recog::{PageVerdict, is_blank};
///
/// let white = Raster::filled(RasterGeometry::gray8(64, 64).unwrap(), 255).unwrap();
/// assert_eq!(is_blank(&white, 0.0).unwrap(), PageVerdict::Blank);
/// ```
pub fn is_blank(raster: &Raster, thresh_percent: f64) -> RecogResult<PageVerdict> {
    let thresh = fraction(thresh_percent)?;
    trace!(thresh_percent, "is_blank: start");

    let (width, height) = (raster.width(), raster.height());
    let darkness = region_darkness(raster, 0..width, 0..height);
    let verdict = if darkness <= thresh {
        PageVerdict::Blank
    } else {
        PageVerdict::Content
    };
    debug!(darkness, thresh, ?verdict, "is_blank: finish");
    Ok(verdict)
}

/// Classify a page by its darkest half-inch block.
///
/// The page is [`PageVerdict::Content`] as soon as one block is darker than
/// `thresh_percent`. Strips at the right and bottom that do not fill a whole
/// block are not examined, and neither is a page smaller than one block
/// plus its margins, which counts as blank.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] for an invalid threshold or a
/// resolution below 32 dpi, where a quarter inch rounds down to nothing.
pub fn is_blank_blocks(
    raster: &Raster,
    dpi_x: u32,
    dpi_y: u32,
    thresh_percent: f64,
) -> RecogResult<PageVerdict> {
    let thresh = fraction(thresh_percent)?;
    let x_quarter = quarter_inch(dpi_x)?;
    let y_quarter = quarter_inch(dpi_y)?;
    let (x_half, y_half) = (x_quarter * 2, y_quarter * 2);
    let x_blocks = raster.width().saturating_sub(x_half) / x_half;
    let y_blocks = raster.height().saturating_sub(y_half) / y_half;
    trace!(x_blocks, y_blocks, thresh_percent, "is_blank_blocks: start");

    for yb in 0..y_blocks {
        let top = y_quarter + yb * y_half;
        for xb in 0..x_blocks {
            let left = x_quarter + xb * x_half;
            let darkness = region_darkness(raster, left..left + x_half, top..top + y_half);
            if darkness > thresh {
                debug!(xb, yb, darkness, thresh, "is_blank_blocks: content");
                return Ok(PageVerdict::Content);
            }
        }
    }

    debug!("is_blank_blocks: blank");
    Ok(PageVerdict::Blank)
}

/// Quarter of an inch in pixels, rounded down to a multiple of 8.
fn quarter_inch(dpi: u32) -> RecogResult<u32> {
    match dpi / 4 / 8 * 8 {
        0 => Err(RecogError::InvalidParameter(format!(
            "resolution {dpi} too low for block analysis"
        ))),
        q => Ok(q),
    }
}

fn fraction(thresh_percent: f64) -> RecogResult<f64> {
    if !thresh_percent.is_finite() || thresh_percent < 0.0 {
        return Err(RecogError::InvalidParameter(format!(
            "threshold must be a non-negative percentage, got {thresh_percent}"
        )));
    }
    Ok(thresh_percent / 100.0)
}

/// Mean darkness of a rectangle, from 0 (white) to 1 (black).
fn region_darkness(
    raster: &Raster,
    cols: std::ops::Range<u32>,
    rows: std::ops::Range<u32>,
) -> f64 {
    let channels = raster.geometry().channels() as u64;
    let pixels = cols.len() as u64 * rows.len() as u64;
    if pixels == 0 {
        return 0.0;
    }
    let total: u64 = rows
        .flat_map(|y| cols.clone().map(move |x| (x, y)))
        .map(|(x, y)| raster.darkness(x, y) as u64)
        .sum();
    total as f64 / (pixels * channels * 255) as f64
}
