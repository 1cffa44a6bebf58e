//! Skew detection and correction
//!
//! Measures how far the scanned sheet is rotated from level and picks a
//! pivot for undoing that rotation without pushing the page off frame.
//!
//! # Algorithm
//!
//! 1. **Top edge**: the top-down transition array is searched for its
//!    dominant line with [`find_top_edge`]. Slopes too shallow to trust are
//!    reported as undetectable.
//!
//! 2. **Left edge**: a line perpendicular to the top edge is fitted to the
//!    first few reliable points of the top-down and the bottom-up arrays.
//!    Whichever array yields the smaller x intercept wins.
//!
//! 3. **Pivot**: the half-angle bisector of the top edge is offset by the
//!    left edge's y intercept, and the bisector of the left edge passes
//!    through the top edge's x intercept. Rotating about the point where
//!    they meet levels the page and carries its top-left corner to the
//!    raster origin. The pivot usually lies far outside the raster.

use crate::line::{LineSearchOptions, TopEdge, find_top_edge};
use crate::transition::{ScanDirection, scan_transitions};
use crate::{RecogError, RecogResult};
use scanmagic_core::{Fixed, Raster};
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, trace};

/// Options for skew detection
#[derive(Debug, Clone)]
pub struct SkewOptions {
    /// Top edge search parameters
    pub line_search: LineSearchOptions,

    /// Smallest absolute top edge slope accepted (default: 0.0001)
    pub min_slope: f64,

    /// Consecutive reliable points after which the left edge search stops;
    /// the run must exceed it (default: 5)
    pub left_edge_run: usize,
}

impl Default for SkewOptions {
    fn default() -> Self {
        Self {
            line_search: LineSearchOptions::default(),
            min_slope: 0.0001,
            left_edge_run: 5,
        }
    }
}

impl SkewOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top edge search parameters
    pub fn with_line_search(mut self, line_search: LineSearchOptions) -> Self {
        self.line_search = line_search;
        self
    }

    /// Set the minimum slope
    pub fn with_min_slope(mut self, slope: f64) -> Self {
        self.min_slope = slope;
        self
    }

    /// Set the left edge run length
    pub fn with_left_edge_run(mut self, run: usize) -> Self {
        self.left_edge_run = run;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        self.line_search.validate()?;
        if !self.min_slope.is_finite() || self.min_slope < 0.0 {
            return Err(RecogError::InvalidParameter(
                "min_slope must be finite and non-negative".to_string(),
            ));
        }
        if self.left_edge_run == 0 {
            return Err(RecogError::InvalidParameter(
                "left_edge_run must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of skew detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewResult {
    /// Rotation pivot, may lie outside the raster
    pub center_x: i32,
    pub center_y: i32,

    /// Slope of the top edge, rise over run with y growing downward.
    /// Positive means the page is turned clockwise.
    pub slope: f64,
}

impl SkewResult {
    /// The slope as 16.16 fixed point.
    pub fn slope_fixed(&self) -> Fixed {
        Fixed::from_f64(self.slope)
    }

    /// Skew angle in degrees, clockwise positive.
    pub fn angle_degrees(&self) -> f64 {
        self.slope.atan().to_degrees()
    }

    /// The skew of the other side of the same sheet, scanned into a raster
    /// `width` pixels wide.
    pub fn mirrored(&self, width: u32) -> Self {
        Self {
            center_x: width as i32 - self.center_x,
            center_y: self.center_y,
            slope: -self.slope,
        }
    }
}

/// Detect the skew of the sheet in a scan.
///
/// # Errors
///
/// Returns [`RecogError::SkewUndetectable`] if no top edge steeper than the
/// minimum slope is found, and [`RecogError::InvalidParameter`] for a zero
/// resolution.
pub fn find_skew(raster: &Raster, dpi_x: u32, dpi_y: u32) -> RecogResult<SkewResult> {
    find_skew_with_options(raster, dpi_x, dpi_y, &SkewOptions::default())
}

/// [`find_skew`] with explicit options.
pub fn find_skew_with_options(
    raster: &Raster,
    dpi_x: u32,
    dpi_y: u32,
    options: &SkewOptions,
) -> RecogResult<SkewResult> {
    options.validate()?;
    if dpi_x == 0 {
        return Err(RecogError::InvalidParameter(
            "resolution must be positive".to_string(),
        ));
    }
    trace!(dpi_x, dpi_y, "find_skew: start");

    let top_scan = scan_transitions(raster, dpi_y, ScanDirection::FromTop)?;
    let bottom_scan = scan_transitions(raster, dpi_y, ScanDirection::FromBottom)?;

    let top = find_top_edge(top_scan.values(), dpi_y, &options.line_search)?;
    debug!(
        slope = top.slope,
        x_intercept = top.x_intercept,
        y_intercept = top.y_intercept,
        "find_skew: top edge"
    );
    if top.slope.abs() < options.min_slope {
        return Err(RecogError::SkewUndetectable(format!(
            "top edge slope {:.8} too shallow",
            top.slope
        )));
    }

    let left_slope = -1.0 / top.slope;
    let height = raster.height() as i32;
    let width = raster.width() as i32;
    let run = options.left_edge_run;
    let from_top = left_intercept(top_scan.values(), |v| v < height, left_slope, width, run);
    let from_bottom = left_intercept(bottom_scan.values(), |v| v > -1, left_slope, width, run);
    let left = if from_bottom.0 < from_top.0 {
        from_bottom
    } else {
        from_top
    };
    debug!(
        slope = left_slope,
        x_intercept = left.0,
        y_intercept = left.1,
        "find_skew: left edge"
    );

    let result = pivot(&top, left_slope, left.1)?;
    debug!(
        center_x = result.center_x,
        center_y = result.center_y,
        slope = result.slope,
        "find_skew: finish"
    );
    Ok(result)
}

/// Detect the skew and rotate the page level.
///
/// Returns the rotated raster together with the skew that was removed.
/// Uncovered pixels take `bg_color`.
pub fn deskew(
    raster: &Raster,
    dpi_x: u32,
    dpi_y: u32,
    bg_color: u8,
) -> RecogResult<(Raster, SkewResult)> {
    let skew = find_skew(raster, dpi_x, dpi_y)?;
    let level = scanmagic_transform::rotate(
        raster,
        skew.center_x,
        skew.center_y,
        skew.slope,
        bg_color,
    )?;
    Ok((level, skew))
}

/// Leftmost axis crossings of a line with the given slope through the first
/// run of reliable points, as `(x_intercept, y_intercept)`.
///
/// A gap in the run starts the search over; `(width, 0)` means nothing
/// reliable was seen.
fn left_intercept<F: Fn(i32) -> bool>(
    values: &[i32],
    reliable: F,
    slope: f64,
    width: i32,
    run: usize,
) -> (i32, i32) {
    let mut best = (width, 0);
    let mut count = 0;
    for (i, &v) in values.iter().enumerate() {
        if !reliable(v) {
            best = (width, 0);
            count = 0;
            continue;
        }
        let y = (v as f64 - slope * i as f64) as i32;
        let x = (y as f64 / -slope) as i32;
        if x < best.0 {
            best = (x, y);
        }
        count += 1;
        if count > run {
            break;
        }
    }
    best
}

/// Intersect the half-angle bisectors of the top edge and the left edge.
fn pivot(top: &TopEdge, left_slope: f64, left_y_intercept: i32) -> RecogResult<SkewResult> {
    let top_half = (top.slope.atan() / 2.0).tan();
    let top_offset = left_y_intercept;

    let quarter = if left_slope < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
    let left_half = ((left_slope.atan() + quarter) / 2.0).tan();
    let left_offset = (-left_half * top.x_intercept as f64) as i32;

    let cx = ((left_offset as f64 - top_offset as f64) / (top_half - left_half)).trunc();
    let cy = (top_half * cx + top_offset as f64).trunc();
    let limit = i32::MAX as f64;
    if !cx.is_finite() || !cy.is_finite() || cx.abs() > limit || cy.abs() > limit {
        return Err(RecogError::SkewUndetectable(format!(
            "no rotation pivot for slope {}",
            top.slope
        )));
    }
    Ok(SkewResult {
        center_x: cx as i32,
        center_y: cy as i32,
        slope: top.slope,
    })
}
