//! Hough-style line search over transition arrays
//!
//! Treats a transition array as points `(i, values[i])` and looks for the
//! straight line most of them agree on.
//!
//! # Algorithm
//!
//! [`find_best_line`] votes every pair of points no more than a third of the
//! array apart into a `slope x offset` histogram. The offset is the line's
//! height at the middle of the array, not its y intercept. Each bin's count
//! is then normalized to the fullest bin and multiplied by two preference
//! factors, `101 - 100 * |center| / |range extreme|` for slope and offset,
//! so a scanned page that is nearly level and centered wins close ties.
//!
//! [`find_top_edge`] runs that search repeatedly, zooming in on the winner
//! each pass. Every pass tries four grids shifted by half a bin on either
//! axis and keeps the densest answer, so a real edge split across two bins
//! on one grid is whole on another.

use crate::{RecogError, RecogResult};
use tracing::{debug, trace};

/// Tunables of the coarse-to-fine top edge search.
#[derive(Debug, Clone)]
pub struct LineSearchOptions {
    /// Slope bins per pass (default: 31)
    pub slope_bins: usize,
    /// Offset bins per pass (default: 31)
    pub offset_bins: usize,
    /// Maximum number of zoom passes (default: 7)
    pub max_passes: u32,
    /// Slope bin width below which the slope range stops shrinking
    /// (default: 0.0001)
    pub min_slope_step: f64,
}

impl Default for LineSearchOptions {
    fn default() -> Self {
        Self {
            slope_bins: 31,
            offset_bins: 31,
            max_passes: 7,
            min_slope_step: 0.0001,
        }
    }
}

impl LineSearchOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of slope bins
    pub fn with_slope_bins(mut self, bins: usize) -> Self {
        self.slope_bins = bins;
        self
    }

    /// Set the number of offset bins
    pub fn with_offset_bins(mut self, bins: usize) -> Self {
        self.offset_bins = bins;
        self
    }

    /// Set the maximum number of passes
    pub fn with_max_passes(mut self, passes: u32) -> Self {
        self.max_passes = passes;
        self
    }

    /// Set the minimum slope step
    pub fn with_min_slope_step(mut self, step: f64) -> Self {
        self.min_slope_step = step;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.slope_bins == 0 || self.offset_bins == 0 {
            return Err(RecogError::InvalidParameter(
                "bin counts must be positive".to_string(),
            ));
        }
        if self.max_passes == 0 {
            return Err(RecogError::InvalidParameter(
                "max_passes must be positive".to_string(),
            ));
        }
        if self.min_slope_step.is_nan() || self.min_slope_step <= 0.0 {
            return Err(RecogError::InvalidParameter(
                "min_slope_step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One histogram search: half-open slope and offset ranges and their
/// bin counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSearch {
    pub min_slope: f64,
    pub max_slope: f64,
    pub min_offset: i32,
    pub max_offset: i32,
    pub slope_bins: usize,
    pub offset_bins: usize,
}

/// Winning bin of a line search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineFit {
    /// Slope at the bin center
    pub slope: f64,
    /// Height of the line at the middle of the array
    pub offset: i32,
    /// Weighted density; 0 when nothing voted
    pub density: i32,
}

/// Best top edge line, in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TopEdge {
    /// Rise over run; 0 when no edge was found
    pub slope: f64,
    /// Column where the line crosses row 0
    pub x_intercept: i32,
    /// Row where the line crosses column 0
    pub y_intercept: i32,
}

/// Find the densest (slope, offset) bin for the points of `values`.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if a range is empty or a bin
/// count is zero.
pub fn find_best_line(values: &[i32], search: &LineSearch) -> RecogResult<LineFit> {
    let LineSearch {
        min_slope,
        max_slope,
        min_offset,
        max_offset,
        slope_bins,
        offset_bins,
    } = *search;
    if slope_bins == 0 || offset_bins == 0 {
        return Err(RecogError::InvalidParameter(
            "bin counts must be positive".to_string(),
        ));
    }
    if max_slope.is_nan()
        || min_slope.is_nan()
        || max_slope <= min_slope
        || max_offset <= min_offset
    {
        return Err(RecogError::InvalidParameter(format!(
            "empty search range: slope {min_slope}..{max_slope}, offset {min_offset}..{max_offset}"
        )));
    }

    let slope_range = max_slope - min_slope;
    let offset_range = max_offset as i64 - min_offset as i64;
    let abs_slope = max_slope.abs().max(min_slope.abs());
    let abs_offset = max_offset.unsigned_abs().max(min_offset.unsigned_abs()) as f64;

    let slope_centers: Vec<f64> = (0..slope_bins)
        .map(|j| {
            let lo = j as f64 * slope_range / slope_bins as f64 + min_slope;
            let hi = (j + 1) as f64 * slope_range / slope_bins as f64 + min_slope;
            (lo + hi) / 2.0
        })
        .collect();
    let slope_scale: Vec<i32> = slope_centers
        .iter()
        .map(|c| (101.0 - c.abs() * 100.0 / abs_slope) as i32)
        .collect();

    let offset_centers: Vec<f64> = (0..offset_bins)
        .map(|j| {
            let lo = j as f64 / offset_bins as f64 * offset_range as f64 + min_offset as f64;
            let hi = (j + 1) as f64 / offset_bins as f64 * offset_range as f64 + min_offset as f64;
            (lo + hi) / 2.0
        })
        .collect();
    let offset_scale: Vec<i32> = offset_centers
        .iter()
        .map(|c| (101.0 - c.abs() * 100.0 / abs_offset) as i32)
        .collect();

    let width = values.len();
    let half_width = (width / 2) as f64;
    let reach = width / 3;
    let mut bins = vec![0u32; slope_bins * offset_bins];

    for i in 0..width {
        for j in (i + 1)..width.min(i + reach) {
            let rise = (values[j] as i64 - values[i] as i64) as f64;
            let run = (j - i) as f64;
            let slope = rise / run;
            if slope >= max_slope || slope < min_slope {
                continue;
            }

            let offset = (slope * half_width + values[i] as f64 - slope * i as f64) as i32;
            if offset >= max_offset || offset < min_offset {
                continue;
            }

            let s_index = ((slope - min_slope) * slope_bins as f64 / slope_range) as usize;
            if s_index >= slope_bins {
                continue;
            }
            let o_index =
                ((offset as i64 - min_offset as i64) * offset_bins as i64 / offset_range) as usize;
            if o_index >= offset_bins {
                continue;
            }
            bins[s_index * offset_bins + o_index] += 1;
        }
    }

    let max_density = bins.iter().copied().max().unwrap_or(0).max(1);

    let mut best = LineFit::default();
    for (s, row) in bins.chunks_exact(offset_bins).enumerate() {
        for (o, &count) in row.iter().enumerate() {
            let weighted = (count as f32 / max_density as f32
                * slope_scale[s] as f32
                * offset_scale[o] as f32) as i32;
            if weighted > best.density {
                best = LineFit {
                    slope: slope_centers[s],
                    offset: offset_centers[o] as i32,
                    density: weighted,
                };
            }
        }
    }

    trace!(
        max_density,
        slope = best.slope,
        offset = best.offset,
        density = best.density,
        "find_best_line"
    );
    Ok(best)
}

/// Find the top edge of the page in a top-down transition array.
///
/// `resolution` is the vertical resolution in dpi; the first pass searches
/// slopes in `[-1, 1)` and offsets within one inch of the top. If the first
/// pass scores below `values.len() / 5` the search gives up and returns a
/// zero slope.
pub fn find_top_edge(
    values: &[i32],
    resolution: u32,
    options: &LineSearchOptions,
) -> RecogResult<TopEdge> {
    options.validate()?;
    if resolution == 0 {
        return Err(RecogError::InvalidParameter(
            "resolution must be positive".to_string(),
        ));
    }
    let res = i32::try_from(resolution)
        .map_err(|_| RecogError::InvalidParameter(format!("resolution {resolution} too large")))?;

    let width = values.len();
    let mut search = LineSearch {
        min_slope: -1.0,
        max_slope: 1.0,
        min_offset: -res,
        max_offset: res,
        slope_bins: options.slope_bins,
        offset_bins: options.offset_bins,
    };
    let mut best = LineFit::default();

    for pass in 1..=options.max_passes {
        let slope_step = (search.max_slope - search.min_slope) / options.slope_bins as f64;
        let offset_step =
            (search.max_offset as i64 - search.min_offset as i64) / options.offset_bins as i64;

        best = LineFit::default();
        for i in 0..2 {
            let slope_shift = slope_step * i as f64 / 2.0;
            for j in 0..2 {
                let offset_shift = offset_step * j / 2;
                let shifted = LineSearch {
                    min_slope: search.min_slope + slope_shift,
                    max_slope: search.max_slope + slope_shift,
                    min_offset: clamp_offset(search.min_offset as i64 + offset_shift),
                    max_offset: clamp_offset(search.max_offset as i64 + offset_shift),
                    ..search
                };
                let fit = find_best_line(values, &shifted)?;
                if fit.density > best.density {
                    best = fit;
                }
            }
        }
        debug!(
            pass,
            slope = best.slope,
            offset = best.offset,
            density = best.density,
            "find_top_edge: pass"
        );

        if pass == 1 && best.density < (width / 5) as i32 {
            debug!(density = best.density, width, "find_top_edge: too little signal");
            best = LineFit::default();
            break;
        }

        let mut zoomed = false;
        if slope_step >= options.min_slope_step {
            search.min_slope = best.slope - slope_step;
            search.max_slope = best.slope + slope_step;
            zoomed = true;
        }
        if offset_step != 0 {
            search.min_offset = clamp_offset(best.offset as i64 - offset_step);
            search.max_offset = clamp_offset(best.offset as i64 + offset_step);
            zoomed = true;
        }
        if !zoomed {
            break;
        }
    }

    if best.slope == 0.0 {
        return Ok(TopEdge::default());
    }
    let y_intercept = (best.offset as f64 - best.slope * width as f64 / 2.0) as i32;
    let x_intercept = (y_intercept as f64 / -best.slope) as i32;
    Ok(TopEdge {
        slope: best.slope,
        x_intercept,
        y_intercept,
    })
}

fn clamp_offset(offset: i64) -> i32 {
    offset.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
