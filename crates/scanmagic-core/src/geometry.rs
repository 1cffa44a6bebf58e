//! Rectangles and fixed-point values
//!
//! [`EdgeBounds`] is the engine's own pixel rectangle. [`GeometryRect`] and
//! [`Fixed`] carry the same information in the units the acquisition layer
//! speaks: pixels or millimeters, as plain integers or 16.16 fixed point.

use crate::error::{Error, Result};

const MM_PER_INCH: f64 = 25.4;

/// A half-open rectangle of pixels: rows `top..bottom`, columns `left..right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeBounds {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl EdgeBounds {
    /// Create bounds, requiring `top < bottom` and `left < right`.
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Result<Self> {
        if top >= bottom || left >= right {
            return Err(Error::InvalidParameter(format!(
                "empty bounds: t={top} b={bottom} l={left} r={right}"
            )));
        }
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    /// Number of columns covered
    #[inline]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Number of rows covered
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Check that the bounds are non-empty and fit a `width` x `height` raster.
    pub fn validate_within(&self, width: u32, height: u32) -> Result<()> {
        if self.top >= self.bottom || self.bottom > height {
            return Err(Error::InvalidParameter(format!(
                "rows {}..{} outside 0..{}",
                self.top, self.bottom, height
            )));
        }
        if self.left >= self.right || self.right > width {
            return Err(Error::InvalidParameter(format!(
                "columns {}..{} outside 0..{}",
                self.left, self.right, width
            )));
        }
        Ok(())
    }

    /// The same bounds seen from the other side of the sheet.
    ///
    /// Columns are reflected about the vertical axis of a raster `width`
    /// pixels wide; rows are unchanged.
    pub fn mirrored(&self, width: u32) -> Self {
        Self {
            top: self.top,
            bottom: self.bottom,
            left: width.saturating_sub(self.right),
            right: width.saturating_sub(self.left),
        }
    }
}

/// A 16.16 fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Fixed(pub i32);

impl Fixed {
    const ONE: f64 = 65536.0;

    /// Convert from floating point, truncating toward zero.
    pub fn from_f64(v: f64) -> Self {
        Fixed((v * Self::ONE) as i32)
    }

    /// Convert from an integer.
    pub fn from_int(v: i32) -> Self {
        Fixed(v << 16)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::ONE
    }

    /// The raw scaled integer.
    pub fn raw(self) -> i32 {
        self.0
    }
}

/// Unit of the values in a [`GeometryRect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Pixels,
    Millimeters,
}

/// Encoding of the values in a [`GeometryRect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueKind {
    #[default]
    Integer,
    /// 16.16 fixed point, see [`Fixed`]
    FixedPoint,
}

/// A rectangle in the acquisition layer's units.
///
/// The four values are stored raw: plain integers for
/// [`ValueKind::Integer`], scaled integers for [`ValueKind::FixedPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryRect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub unit: Unit,
    pub kind: ValueKind,
}

impl GeometryRect {
    /// Express pixel bounds in the requested unit and encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a resolution is zero.
    pub fn from_bounds(
        bounds: &EdgeBounds,
        unit: Unit,
        kind: ValueKind,
        dpi_x: u32,
        dpi_y: u32,
    ) -> Result<Self> {
        check_dpi(dpi_x, dpi_y)?;
        let encode = |px: u32, dpi: u32| {
            let v = match unit {
                Unit::Pixels => px as f64,
                Unit::Millimeters => px as f64 * MM_PER_INCH / dpi as f64,
            };
            match kind {
                ValueKind::Integer => v.round() as i32,
                ValueKind::FixedPoint => Fixed::from_f64(v).raw(),
            }
        };
        Ok(Self {
            top: encode(bounds.top, dpi_y),
            left: encode(bounds.left, dpi_x),
            bottom: encode(bounds.bottom, dpi_y),
            right: encode(bounds.right, dpi_x),
            unit,
            kind,
        })
    }

    /// Convert back to pixel bounds, rounding to the nearest pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a resolution is zero, a
    /// value is negative, or the rectangle is empty.
    pub fn to_bounds(&self, dpi_x: u32, dpi_y: u32) -> Result<EdgeBounds> {
        check_dpi(dpi_x, dpi_y)?;
        let decode = |raw: i32, dpi: u32| -> Result<u32> {
            let v = match self.kind {
                ValueKind::Integer => raw as f64,
                ValueKind::FixedPoint => Fixed(raw).to_f64(),
            };
            let px = match self.unit {
                Unit::Pixels => v,
                Unit::Millimeters => v * dpi as f64 / MM_PER_INCH,
            }
            .round();
            if px < 0.0 {
                return Err(Error::InvalidParameter(format!("negative coordinate {v}")));
            }
            Ok(px as u32)
        };
        EdgeBounds::new(
            decode(self.top, dpi_y)?,
            decode(self.bottom, dpi_y)?,
            decode(self.left, dpi_x)?,
            decode(self.right, dpi_x)?,
        )
    }
}

fn check_dpi(dpi_x: u32, dpi_y: u32) -> Result<()> {
    if dpi_x == 0 || dpi_y == 0 {
        return Err(Error::InvalidParameter(format!(
            "resolution must be positive: {dpi_x}x{dpi_y}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_conversion() {
        assert_eq!(Fixed::from_f64(1.0).raw(), 65536);
        assert_eq!(Fixed::from_f64(-0.5).raw(), -32768);
        assert_eq!(Fixed::from_int(3).to_f64(), 3.0);
        // truncates toward zero
        assert_eq!(Fixed::from_f64(1.0 / 131072.0 * 0.9).raw(), 0);
    }

    #[test]
    fn test_edge_bounds_validation() {
        assert!(EdgeBounds::new(5, 5, 0, 1).is_err());
        let b = EdgeBounds::new(1, 4, 2, 8).unwrap();
        assert_eq!((b.width(), b.height()), (6, 3));
        assert!(b.validate_within(8, 4).is_ok());
        assert!(b.validate_within(7, 4).is_err());
        assert!(b.validate_within(8, 3).is_err());
    }

    #[test]
    fn test_mirrored_bounds() {
        let b = EdgeBounds::new(0, 10, 20, 70).unwrap();
        let m = b.mirrored(100);
        assert_eq!((m.left, m.right), (30, 80));
        assert_eq!(m.mirrored(100), b);
    }

    #[test]
    fn test_geometry_rect_millimeters_fixed() {
        let b = EdgeBounds::new(50, 250, 50, 150).unwrap();
        let r = GeometryRect::from_bounds(&b, Unit::Millimeters, ValueKind::FixedPoint, 100, 100)
            .unwrap();
        assert!((Fixed(r.left).to_f64() - 12.7).abs() < 1e-4);
        assert!((Fixed(r.bottom).to_f64() - 63.5).abs() < 1e-4);
        assert_eq!(r.to_bounds(100, 100).unwrap(), b);
    }

    #[test]
    fn test_geometry_rect_integer() {
        let b = EdgeBounds::new(0, 254, 127, 508).unwrap();
        let r = GeometryRect::from_bounds(&b, Unit::Millimeters, ValueKind::Integer, 254, 254)
            .unwrap();
        assert_eq!((r.top, r.bottom, r.left, r.right), (0, 25, 13, 51));

        let px = GeometryRect::from_bounds(&b, Unit::Pixels, ValueKind::Integer, 1, 1).unwrap();
        assert_eq!(px.to_bounds(1, 1).unwrap(), b);
        assert!(GeometryRect::from_bounds(&b, Unit::Pixels, ValueKind::Integer, 0, 1).is_err());
    }
}
