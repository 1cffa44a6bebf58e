//! Transition scanning
//!
//! For every column (vertical scans) or row (horizontal scans), find the
//! first place where the image changes from the scanner background to
//! something else, walking in from one edge of the raster.
//!
//! # Algorithm
//!
//! Gray and RGB rasters are walked with two adjacent moving windows of
//! `window_len` samples each: a *near* window ending at the current position
//! and a *far* window ending `window_len` samples earlier. Both start out
//! filled with copies of the first sample. A transition is reported at the
//! first position where
//!
//! ```text
//! |near - far| > 50 * window_len * channels - near * 40 / 255
//! ```
//!
//! so dark surroundings need a smaller jump than bright ones. Bilevel
//! rasters report the first pixel that differs from the starting pixel.
//!
//! A neighbor pass then discards isolated hits: a value with fewer than
//! `min_neighbors` of the next `neighbor_span` values within half an inch
//! of it is replaced by the "not found" sentinel.

use crate::{RecogError, RecogResult};
use scanmagic_core::{Raster, RasterAccess};
use tracing::{debug, trace};

/// Base jump per window sample and channel
const TRANSITION_STEP: i64 = 50;
/// Threshold reduction per unit of near-window brightness, over 255
const TRANSITION_FALLOFF: i64 = 40;

// ============================================================================
// Options
// ============================================================================

/// Edge of the raster a scan starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    /// Down each column, from row 0
    FromTop,
    /// Up each column, from the last row
    FromBottom,
    /// Along each row, from column 0
    FromLeft,
    /// Along each row, from the last column
    FromRight,
}

impl ScanDirection {
    /// Whether the scan walks down or up columns.
    pub fn is_vertical(self) -> bool {
        matches!(self, ScanDirection::FromTop | ScanDirection::FromBottom)
    }

    /// Whether the scan starts at the far (bottom or right) edge.
    pub fn is_reversed(self) -> bool {
        matches!(self, ScanDirection::FromBottom | ScanDirection::FromRight)
    }
}

/// Tunables of the transition scanner.
#[derive(Debug, Clone)]
pub struct TransitionOptions {
    /// Samples per moving window (default: 9)
    pub window_len: usize,
    /// How many following values the neighbor pass inspects (default: 7)
    pub neighbor_span: usize,
    /// Close neighbors needed to keep a value (default: 2)
    pub min_neighbors: usize,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            window_len: 9,
            neighbor_span: 7,
            min_neighbors: 2,
        }
    }
}

impl TransitionOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the moving window length
    pub fn with_window_len(mut self, len: usize) -> Self {
        self.window_len = len;
        self
    }

    /// Set the neighbor span
    pub fn with_neighbor_span(mut self, span: usize) -> Self {
        self.neighbor_span = span;
        self
    }

    /// Set the number of close neighbors required
    pub fn with_min_neighbors(mut self, count: usize) -> Self {
        self.min_neighbors = count;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.window_len == 0 {
            return Err(RecogError::InvalidParameter(
                "window_len must be positive".to_string(),
            ));
        }
        if self.neighbor_span == 0 {
            return Err(RecogError::InvalidParameter(
                "neighbor_span must be positive".to_string(),
            ));
        }
        if self.min_neighbors > self.neighbor_span {
            return Err(RecogError::InvalidParameter(format!(
                "min_neighbors {} exceeds neighbor_span {}",
                self.min_neighbors, self.neighbor_span
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Result
// ============================================================================

/// First transition per scan line.
///
/// Values are coordinates along the scan axis (row for vertical scans,
/// column for horizontal ones). Lines without a reliable transition hold
/// the sentinel: the coordinate just past the far edge of the raster
/// (`height` or `width` for top/left scans, `-1` for bottom/right scans).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionArray {
    values: Vec<i32>,
    direction: ScanDirection,
    sentinel: i32,
}

impl TransitionArray {
    /// Raw values, sentinels included.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// The "not found" value.
    pub fn sentinel(&self) -> i32 {
        self.sentinel
    }

    /// Number of scan lines.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Transition coordinate of line `index`, or `None` if not found.
    pub fn get(&self, index: usize) -> Option<i32> {
        self.values
            .get(index)
            .copied()
            .filter(|&v| v != self.sentinel)
    }

    /// Number of lines with a transition.
    pub fn found_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != self.sentinel).count()
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Find the first transition on every line scanned from `direction`.
///
/// `dpi` is the resolution along the scan axis (vertical resolution for
/// top/bottom scans).
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if `dpi` is zero.
pub fn scan_transitions(
    raster: &Raster,
    dpi: u32,
    direction: ScanDirection,
) -> RecogResult<TransitionArray> {
    scan_transitions_with_options(raster, dpi, direction, &TransitionOptions::default())
}

/// [`scan_transitions`] with explicit tunables.
pub fn scan_transitions_with_options(
    raster: &Raster,
    dpi: u32,
    direction: ScanDirection,
    options: &TransitionOptions,
) -> RecogResult<TransitionArray> {
    options.validate()?;
    if dpi == 0 {
        return Err(RecogError::InvalidParameter(
            "resolution must be positive".to_string(),
        ));
    }
    trace!(?direction, dpi, "scan_transitions: start");

    let (width, height) = (raster.width() as usize, raster.height() as usize);
    let (lines, depth) = if direction.is_vertical() {
        (width, height)
    } else {
        (height, width)
    };
    let sentinel = if direction.is_reversed() {
        -1
    } else {
        depth as i32
    };

    // scan position `pos` on scan line `line`, as raster (x, y)
    let locate = |line: usize, pos: usize| -> (u32, u32) {
        let along = if direction.is_reversed() {
            depth - 1 - pos
        } else {
            pos
        };
        if direction.is_vertical() {
            (line as u32, along as u32)
        } else {
            (along as u32, line as u32)
        }
    };

    let bilevel = raster.geometry().is_bilevel();
    let channels = raster.geometry().channels() as i64;
    let mut values = Vec::with_capacity(lines);
    for line in 0..lines {
        let hit = if bilevel {
            first_change(depth, |pos| {
                let (x, y) = locate(line, pos);
                raster.bit(x, y)
            })
        } else {
            first_jump(depth, options.window_len, channels, |pos| {
                let (x, y) = locate(line, pos);
                raster.intensity(x, y) as i64
            })
        };
        values.push(match hit {
            Some(pos) if direction.is_reversed() => (depth - 1 - pos) as i32,
            Some(pos) => pos as i32,
            None => sentinel,
        });
    }

    suppress_isolated(&mut values, sentinel, dpi, options);

    let array = TransitionArray {
        values,
        direction,
        sentinel,
    };
    debug!(?direction, found = array.found_count(), lines, "scan_transitions: finish");
    Ok(array)
}

/// Windowed search for gray and RGB lines.
fn first_jump<F: Fn(usize) -> i64>(
    len: usize,
    window: usize,
    channels: i64,
    sample: F,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let win = window as i64;
    let mut near = sample(0) * win;
    let mut far = near;
    for pos in 1..len {
        let far_pos = pos.saturating_sub(2 * window);
        let near_pos = pos.saturating_sub(window);
        let crossing = sample(near_pos);
        far += crossing - sample(far_pos);
        near += sample(pos) - crossing;

        let threshold = TRANSITION_STEP * win * channels - near * TRANSITION_FALLOFF / 255;
        if (near - far).abs() > threshold {
            return Some(pos);
        }
    }
    None
}

/// First pixel differing from the starting one, for bilevel lines.
fn first_change<F: Fn(usize) -> u8>(len: usize, bit: F) -> Option<usize> {
    let start = bit(0);
    (1..len).find(|&pos| bit(pos) != start)
}

/// Replace values with too few close followers by the sentinel.
///
/// Runs front to back in place, so a value already discarded counts as a
/// sentinel for the positions before it that are still to come.
fn suppress_isolated(values: &mut [i32], sentinel: i32, dpi: u32, options: &TransitionOptions) {
    let reach = (dpi / 2) as i32;
    let span = options.neighbor_span;
    if values.len() <= span {
        return;
    }
    for i in 0..values.len() - span {
        let v = values[i];
        let close = values[i + 1..=i + span]
            .iter()
            .filter(|&&n| (n - v).abs() < reach)
            .count();
        if close < options.min_neighbors {
            values[i] = sentinel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmagic_core::{EdgeBounds, RasterGeometry};

    fn gray_with_block(width: u32, height: u32, block: EdgeBounds) -> Raster {
        let mut m = Raster::filled(RasterGeometry::gray8(width, height).unwrap(), 255)
            .unwrap()
            .into_mut();
        for y in block.top..block.bottom {
            m.row_mut(y)[block.left as usize..block.right as usize].fill(0);
        }
        m.into()
    }

    #[test]
    fn test_uniform_page_has_no_transitions() {
        let page = Raster::filled(RasterGeometry::gray8(40, 30).unwrap(), 128).unwrap();
        for direction in [
            ScanDirection::FromTop,
            ScanDirection::FromBottom,
            ScanDirection::FromLeft,
            ScanDirection::FromRight,
        ] {
            let t = scan_transitions(&page, 100, direction).unwrap();
            assert_eq!(t.found_count(), 0);
            assert!(t.values().iter().all(|&v| v == t.sentinel()));
        }
    }

    #[test]
    fn test_sentinels() {
        let page = Raster::filled(RasterGeometry::gray8(40, 30).unwrap(), 255).unwrap();
        let top = scan_transitions(&page, 100, ScanDirection::FromTop).unwrap();
        assert_eq!((top.len(), top.sentinel()), (40, 30));
        let right = scan_transitions(&page, 100, ScanDirection::FromRight).unwrap();
        assert_eq!((right.len(), right.sentinel()), (30, -1));
        assert_eq!(right.get(3), None);
    }

    #[test]
    fn test_dark_block_found_from_every_side() {
        let block = EdgeBounds::new(20, 40, 15, 45).unwrap();
        let page = gray_with_block(60, 60, block);

        let top = scan_transitions(&page, 100, ScanDirection::FromTop).unwrap();
        assert_eq!(top.get(30), Some(20));
        assert_eq!(top.get(5), None);

        let bottom = scan_transitions(&page, 100, ScanDirection::FromBottom).unwrap();
        assert_eq!(bottom.get(30), Some(39));

        let left = scan_transitions(&page, 100, ScanDirection::FromLeft).unwrap();
        assert_eq!(left.get(30), Some(15));

        let right = scan_transitions(&page, 100, ScanDirection::FromRight).unwrap();
        assert_eq!(right.get(30), Some(44));
    }

    #[test]
    fn test_isolated_transition_is_suppressed() {
        // a single dark column far from any other hit
        let block = EdgeBounds::new(10, 30, 20, 21).unwrap();
        let page = gray_with_block(40, 40, block);
        // at 20 dpi neighbors must lie within 10 rows
        let top = scan_transitions(&page, 20, ScanDirection::FromTop).unwrap();
        assert_eq!(top.get(20), None);
        assert_eq!(top.found_count(), 0);
    }

    #[test]
    fn test_bilevel_first_change() {
        let g = RasterGeometry::bilevel(24, 24).unwrap();
        let mut m = Raster::new(g).unwrap().into_mut();
        for y in 5..24 {
            for x in 0..24 {
                m.set_bit(x, y, 1);
            }
        }
        let page: Raster = m.into();
        let top = scan_transitions(&page, 100, ScanDirection::FromTop).unwrap();
        assert_eq!(top.get(10), Some(5));
        let bottom = scan_transitions(&page, 100, ScanDirection::FromBottom).unwrap();
        assert_eq!(bottom.get(10), Some(4));
    }

    #[test]
    fn test_neighbor_pass_is_sequential() {
        let opts = TransitionOptions::default();
        let mut values = vec![0, 100, 100, 100, 100, 100, 100, 100, 100, 100];
        suppress_isolated(&mut values, -1, 100, &opts);
        assert_eq!(values[0], -1);
        assert_eq!(values[1], 100);
    }

    #[test]
    fn test_options_validate() {
        assert!(TransitionOptions::new().validate().is_ok());
        assert!(TransitionOptions::new().with_window_len(0).validate().is_err());
        assert!(
            TransitionOptions::new()
                .with_min_neighbors(8)
                .validate()
                .is_err()
        );
        let page = Raster::filled(RasterGeometry::gray8(4, 4).unwrap(), 0).unwrap();
        assert!(scan_transitions(&page, 0, ScanDirection::FromTop).is_err());
    }
}
