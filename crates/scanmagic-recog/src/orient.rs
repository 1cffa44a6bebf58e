//! Page orientation detection
//!
//! Guesses whether a page was fed sideways by comparing how "chunky" its
//! rows and columns are. Scan lines running along text lines cross long
//! uninterrupted stretches of paper between the lines; scan lines running
//! across the text are chopped into short dark and light segments.
//!
//! # Algorithm
//!
//! A sparse set of rows and columns is binarized with hysteresis (dark below
//! 100, light above 156, otherwise unchanged). Each line scores the sum of
//! `len * len / 5` over its segments, divided by the line length, and the
//! scores are averaged per axis. If the columns score higher than the rows,
//! the text runs vertically and a quarter turn is suggested.

use crate::{RecogError, RecogResult};
use scanmagic_core::{BitDepth, PixelFormat, Raster, RasterAccess};
use scanmagic_transform::Turn;
use tracing::{debug, trace};

/// Gray values below this are dark
const DARK_BELOW: u8 = 100;
/// Gray values above this are light; in between keeps the previous state
const LIGHT_ABOVE: u8 = 156;

/// Suggest a turn that brings the text lines of a page horizontal.
///
/// Returns [`Turn::Cw90`] when the page looks sideways and [`Turn::None`]
/// otherwise. Upside-down pages are not detected.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if a resolution is zero.
///
/// # Example
/// ```
/// use scanmagic_core::{Raster, RasterGeometry};
/// use scanmagic_recog::find_turn;
/// use scanmagic_transform::Turn;
///
/// let blank = Raster::filled(RasterGeometry::gray8(100, 100).unwrap(), 255).unwrap();
/// assert_eq!(find_turn(&blank, 100, 100).unwrap(), Turn::None);
/// ```
pub fn find_turn(raster: &Raster, dpi_x: u32, dpi_y: u32) -> RecogResult<Turn> {
    if dpi_x == 0 || dpi_y == 0 {
        return Err(RecogError::InvalidParameter(
            "resolution must be positive".to_string(),
        ));
    }
    let g = raster.geometry();
    trace!(dpi_x, dpi_y, "find_turn: start");

    let divisor = match (g.format(), g.depth()) {
        (PixelFormat::Bilevel, _) => 30,
        (_, BitDepth::Bit8 | BitDepth::Bit16) => 20,
        _ => return Err(g.unsupported().into()),
    };
    let row_step = (dpi_y / divisor).max(1);
    let col_step = (dpi_x / divisor).max(1);
    let (width, height) = (raster.width(), raster.height());

    let bilevel = g.is_bilevel();
    let dark = |x: u32, y: u32, previous: bool| -> bool {
        if bilevel {
            return raster.bit(x, y) != 0;
        }
        match raster.gray(x, y) {
            v if v < DARK_BELOW => true,
            v if v > LIGHT_ABOVE => false,
            _ => previous,
        }
    };

    let horizontal = mean((0..height).step_by(row_step as usize).map(|y| {
        line_score(width, |x, previous| dark(x, y, previous))
    }));
    let vertical = mean((0..width).step_by(col_step as usize).map(|x| {
        line_score(height, |y, previous| dark(x, y, previous))
    }));
    debug!(horizontal, vertical, "find_turn: line scores");

    let turn = if vertical > horizontal {
        Turn::Cw90
    } else {
        Turn::None
    };
    trace!(degrees = turn.degrees(), "find_turn: finish");
    Ok(turn)
}

/// Segment-length score of one scan line of `len` pixels.
///
/// `dark(pos, previous)` classifies the pixel at `pos` given the state of
/// the pixel before it.
fn line_score<F: Fn(u32, bool) -> bool>(len: u32, dark: F) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let mut color = false;
    let mut run: u64 = 0;
    let mut sum: u64 = 0;
    for pos in 0..len {
        let curr = dark(pos, color);
        if curr != color || pos == len - 1 {
            sum += run * run / 5;
            run = 0;
            color = curr;
        } else {
            run += 1;
        }
    }
    sum as f64 / len as f64
}

fn mean<I: Iterator<Item = f64>>(scores: I) -> f64 {
    let (total, count) = scores.fold((0.0, 0u32), |(t, c), s| (t + s, c + 1));
    if count == 0 { 0.0 } else { total / count as f64 }
}
