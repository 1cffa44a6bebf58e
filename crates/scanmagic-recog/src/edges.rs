//! Paper edge detection
//!
//! Locates the sheet of paper inside a scan of the paper plus the scanner
//! background, for cropping.
//!
//! # Algorithm
//!
//! Rows are scanned from the left and from the right. Outside the paper
//! both scans see only background, so their transitions are either missing
//! or cross; inside it the right-hand transition lies right of the
//! left-hand one. The top bound is the first row of a run of more than
//! three such rows, the bottom bound the same walking up from the bottom.
//!
//! Columns are then treated the same way with top and bottom scans, but a
//! column only counts if its transitions lie near the rows found above.
//! Sheet-fed scanners keep capturing after the paper runs out, and the
//! padding below the sheet must not widen the bounds.

use crate::transition::{ScanDirection, TransitionArray, scan_transitions};
use crate::{RecogError, RecogResult};
use scanmagic_core::{EdgeBounds, Raster};
use tracing::{debug, trace};

/// Consecutive inside lines that confirm an edge (the run must exceed it)
const CONFIRM_RUN: usize = 3;
/// Slack, in pixels, when matching column transitions to the found rows
const ROW_TOLERANCE: i32 = 10;

/// Find the bounds of the paper in a scan.
///
/// `dpi_x` and `dpi_y` are the horizontal and vertical resolution. The
/// result is half open: `bottom` and `right` are one past the last row and
/// column inside the paper, ready for cropping.
///
/// # Errors
///
/// Returns [`RecogError::EdgesNotFound`] if no consistent rectangle exists,
/// and [`RecogError::InvalidParameter`] for a zero resolution.
///
/// # Example
/// ```
/// use scanmagic_core::{Raster, RasterGeometry};
/// use scanmagic_recog::find_edges;
///
/// // nothing but background
/// let page = Raster::filled(RasterGeometry::gray8(64, 64).unwrap(), 255).unwrap();
/// assert!(find_edges(&page, 100, 100).is_err());
/// ```
pub fn find_edges(raster: &Raster, dpi_x: u32, dpi_y: u32) -> RecogResult<EdgeBounds> {
    trace!(dpi_x, dpi_y, "find_edges: start");

    let top_scan = scan_transitions(raster, dpi_y, ScanDirection::FromTop)?;
    let bottom_scan = scan_transitions(raster, dpi_y, ScanDirection::FromBottom)?;
    let left_scan = scan_transitions(raster, dpi_x, ScanDirection::FromLeft)?;
    let right_scan = scan_transitions(raster, dpi_x, ScanDirection::FromRight)?;

    let height = raster.height() as usize;
    let width = raster.width() as usize;

    let row_inside = |i: usize| right_scan.values()[i] > left_scan.values()[i];
    let (top, bottom) = match (
        run_start(0..height, row_inside),
        run_start((0..height).rev(), row_inside),
    ) {
        (Some(t), Some(b)) if t <= b => (t, b),
        (t, b) => {
            return Err(RecogError::EdgesNotFound(format!(
                "no top/bottom rows: top {t:?}, bottom {b:?}"
            )));
        }
    };
    debug!(top, bottom, "find_edges: rows");

    let col_inside = column_filter(&top_scan, &bottom_scan, top as i32, bottom as i32);
    let (left, right) = match (
        run_start(0..width, &col_inside),
        run_start((0..width).rev(), &col_inside),
    ) {
        (Some(l), Some(r)) if l <= r => (l, r),
        (l, r) => {
            return Err(RecogError::EdgesNotFound(format!(
                "no left/right columns: left {l:?}, right {r:?}"
            )));
        }
    };

    let bounds = EdgeBounds {
        top: top as u32,
        bottom: bottom as u32 + 1,
        left: left as u32,
        right: right as u32 + 1,
    };
    debug!(?bounds, "find_edges: finish");
    Ok(bounds)
}

/// Whether column `i` lies inside the paper rows `top..=bottom`.
fn column_filter<'a>(
    top_scan: &'a TransitionArray,
    bottom_scan: &'a TransitionArray,
    top: i32,
    bottom: i32,
) -> impl Fn(usize) -> bool + 'a {
    move |i| {
        let t = top_scan.values()[i];
        let b = bottom_scan.values()[i];
        b > t && (b - ROW_TOLERANCE < bottom || t + ROW_TOLERANCE > top)
    }
}

/// First index of a run of more than [`CONFIRM_RUN`] inside lines, walking
/// `order`. A shorter run still open when the walk ends also counts.
fn run_start<I, F>(order: I, inside: F) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
    F: Fn(usize) -> bool,
{
    let mut start = None;
    let mut count = 0;
    for i in order {
        if inside(i) {
            start.get_or_insert(i);
            count += 1;
            if count > CONFIRM_RUN {
                break;
            }
        } else {
            start = None;
            count = 0;
        }
    }
    start
}
