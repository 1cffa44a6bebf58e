//! Quarter turns
//!
//! Clockwise rotation by multiples of 90 degrees. 180 degrees keeps the
//! geometry; 90 and 270 swap width and height and recompute the stride.
//! Bilevel turns keep every pixel: the output row is padded up to a whole
//! byte instead of dropping the columns that do not fill one.

use crate::{TransformError, TransformResult};
use scanmagic_core::{Raster, RasterAccess, RasterGeometry, RasterMut, alloc_buffer};
use tracing::trace;

/// A clockwise quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Turn {
    /// No rotation
    #[default]
    None,
    /// 90 degrees clockwise
    Cw90,
    /// 180 degrees
    Cw180,
    /// 270 degrees clockwise (90 counter-clockwise)
    Cw270,
}

impl Turn {
    /// Interpret an angle in degrees, normalized modulo 360.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] unless the angle is a
    /// multiple of 90.
    pub fn from_degrees(degrees: i32) -> TransformResult<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Turn::None),
            90 => Ok(Turn::Cw90),
            180 => Ok(Turn::Cw180),
            270 => Ok(Turn::Cw270),
            _ => Err(TransformError::InvalidParameters(format!(
                "turn angle must be a multiple of 90, got {degrees}"
            ))),
        }
    }

    /// Clockwise angle in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> i32 {
        match self {
            Turn::None => 0,
            Turn::Cw90 => 90,
            Turn::Cw180 => 180,
            Turn::Cw270 => 270,
        }
    }

    /// Whether the turn swaps width and height.
    pub fn is_transposing(self) -> bool {
        matches!(self, Turn::Cw90 | Turn::Cw270)
    }
}

/// Turn a raster clockwise by a quarter-turn multiple.
///
/// [`Turn::None`] returns a handle to the same pixels.
///
/// # Example
/// ```
/// use scanmagic_core::{Raster, RasterGeometry};
/// use scanmagic_transform::{Turn, turn};
///
/// let page = Raster::new(RasterGeometry::gray8(30, 20).unwrap()).unwrap();
/// let turned = turn(&page, Turn::Cw90).unwrap();
/// assert_eq!((turned.width(), turned.height()), (20, 30));
/// ```
pub fn turn(raster: &Raster, turn: Turn) -> TransformResult<Raster> {
    if turn == Turn::None {
        return Ok(raster.clone());
    }
    let (geometry, data) = turn_impl(raster, turn)?;
    Ok(Raster::from_bytes(geometry, data)?)
}

/// Turn a raster, replacing its contents and geometry once the output is
/// complete.
pub fn turn_in_place(raster: &mut RasterMut, turn: Turn) -> TransformResult<()> {
    if turn == Turn::None {
        return Ok(());
    }
    let (geometry, data) = turn_impl(&*raster, turn)?;
    raster.replace_contents(geometry, data)?;
    Ok(())
}

fn turn_impl<R: RasterAccess>(src: &R, turn: Turn) -> TransformResult<(RasterGeometry, Vec<u8>)> {
    let g = *src.geometry();
    let (iw, ih) = (g.width(), g.height());
    trace!(degrees = turn.degrees(), iw, ih, "turn: start");

    let geometry = if turn.is_transposing() {
        g.resized(ih, iw)?
    } else {
        g.resized(iw, ih)?
    };
    let data = alloc_buffer(geometry.byte_len(), 0)?;
    let mut out = RasterMut::from_bytes(geometry, data)?;

    for y in 0..geometry.height() {
        for x in 0..geometry.width() {
            let (sx, sy) = match turn {
                Turn::Cw90 => (y, ih - 1 - x),
                Turn::Cw180 => (iw - 1 - x, ih - 1 - y),
                Turn::Cw270 => (iw - 1 - y, x),
                Turn::None => (x, y),
            };
            out.copy_pixel_from(x, y, src, sx, sy);
        }
    }

    trace!("turn: finish");
    Ok((geometry, out.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(geometry: RasterGeometry) -> Raster {
        let len = geometry.byte_len();
        Raster::from_bytes(geometry, (0..len).map(|i| (i * 7 % 256) as u8).collect()).unwrap()
    }

    #[test]
    fn test_from_degrees() {
        assert_eq!(Turn::from_degrees(0).unwrap(), Turn::None);
        assert_eq!(Turn::from_degrees(450).unwrap(), Turn::Cw90);
        assert_eq!(Turn::from_degrees(-90).unwrap(), Turn::Cw270);
        assert_eq!(Turn::from_degrees(540).unwrap(), Turn::Cw180);
        assert!(Turn::from_degrees(45).is_err());
        assert_eq!(Turn::Cw270.degrees(), 270);
    }

    #[test]
    fn test_cw90_corner_mapping() {
        let page = ramp(RasterGeometry::gray8(5, 3).unwrap());
        let out = turn(&page, Turn::Cw90).unwrap();
        assert_eq!((out.width(), out.height()), (3, 5));
        // top-left goes to top-right
        assert_eq!(out.sample(2, 0, 0), page.sample(0, 0, 0));
        // bottom-left goes to top-left
        assert_eq!(out.sample(0, 0, 0), page.sample(0, 2, 0));
    }

    #[test]
    fn test_cw270_is_inverse_of_cw90() {
        let page = ramp(RasterGeometry::rgb8(6, 4).unwrap());
        let there = turn(&page, Turn::Cw90).unwrap();
        let back = turn(&there, Turn::Cw270).unwrap();
        assert_eq!(back.data(), page.data());
    }

    #[test]
    fn test_cw180_reverses() {
        let page = ramp(RasterGeometry::gray8(4, 3).unwrap());
        let out = turn(&page, Turn::Cw180).unwrap();
        assert_eq!(out.sample(0, 0, 0), page.sample(3, 2, 0));
        assert_eq!(out.sample(3, 1, 0), page.sample(0, 1, 0));
    }

    #[test]
    fn test_bilevel_keeps_partial_byte() {
        let mut m = Raster::new(RasterGeometry::bilevel(3, 11).unwrap())
            .unwrap()
            .into_mut();
        m.set_bit(0, 10, 1);
        let page: Raster = m.into();
        let out = turn(&page, Turn::Cw90).unwrap();
        assert_eq!((out.width(), out.height(), out.stride()), (11, 3, 2));
        assert_eq!(out.bit(0, 0), 1);
    }

    #[test]
    fn test_turn_in_place_updates_geometry() {
        let page = ramp(RasterGeometry::gray8(7, 2).unwrap());
        let mut m = page.to_mut();
        turn_in_place(&mut m, Turn::Cw270).unwrap();
        assert_eq!((m.width(), m.height(), m.stride()), (2, 7, 2));
        assert_eq!(m.sample(0, 0, 0), page.sample(6, 0, 0));
    }
}
