//! Pixel access functions
//!
//! Format-aware reads and writes over a raster buffer. Packed bilevel rows
//! are addressed with [`get_data_bit`] / [`set_data_bit`]; gray and RGB
//! samples through [`RasterAccess`], which hides the 8/16-bit difference by
//! always yielding the most significant byte of a sample.

use super::{BitDepth, PixelFormat, Raster, RasterGeometry, RasterMut, SampleOrder};

/// Get a 1-bit pixel from a packed row (bit `7 - x % 8` of byte `x / 8`).
#[inline]
pub fn get_data_bit(line: &[u8], x: u32) -> u8 {
    (line[(x >> 3) as usize] >> (7 - (x & 7))) & 1
}

/// Set a 1-bit pixel in a packed row.
#[inline]
pub fn set_data_bit(line: &mut [u8], x: u32, val: u8) {
    let mask = 0x80u8 >> (x & 7);
    let byte = &mut line[(x >> 3) as usize];
    if val != 0 {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

/// Read access shared by [`Raster`] and [`RasterMut`].
///
/// Coordinates are not bounds checked beyond slice indexing.
///
/// # Panics
///
/// All methods panic if `x >= width` or `y >= height`.
pub trait RasterAccess {
    /// Geometry of the underlying buffer.
    fn geometry(&self) -> &RasterGeometry;

    /// The underlying buffer.
    fn bytes(&self) -> &[u8];

    /// Bytes of row `y`.
    #[inline]
    fn row_bytes(&self, y: u32) -> &[u8] {
        let stride = self.geometry().stride();
        let start = y as usize * stride;
        &self.bytes()[start..start + stride]
    }

    /// Bilevel pixel at (x, y); 1 is black.
    #[inline]
    fn bit(&self, x: u32, y: u32) -> u8 {
        get_data_bit(self.row_bytes(y), x)
    }

    /// Channel `channel` of the pixel at (x, y), reduced to 8 bits.
    ///
    /// Not meaningful for bilevel rasters; use [`RasterAccess::bit`].
    #[inline]
    fn sample(&self, x: u32, y: u32, channel: u32) -> u8 {
        let g = self.geometry();
        let index = (x * g.channels() + channel) as usize;
        let row = self.row_bytes(y);
        match g.depth() {
            BitDepth::Bit16 => match g.sample_order() {
                SampleOrder::BigEndian => row[index * 2],
                SampleOrder::LittleEndian => row[index * 2 + 1],
            },
            _ => row[index],
        }
    }

    /// Sum of all channel samples at (x, y).
    #[inline]
    fn intensity(&self, x: u32, y: u32) -> u32 {
        (0..self.geometry().channels())
            .map(|c| self.sample(x, y, c) as u32)
            .sum()
    }

    /// Gray value at (x, y): channel average, or 0/255 for bilevel.
    #[inline]
    fn gray(&self, x: u32, y: u32) -> u8 {
        let g = self.geometry();
        match g.format() {
            PixelFormat::Bilevel => {
                if self.bit(x, y) != 0 {
                    0
                } else {
                    255
                }
            }
            _ => (self.intensity(x, y) / g.channels()) as u8,
        }
    }

    /// Darkness at (x, y): `255 - sample` summed over channels.
    ///
    /// A black bilevel pixel counts as 255.
    #[inline]
    fn darkness(&self, x: u32, y: u32) -> u32 {
        let g = self.geometry();
        match g.format() {
            PixelFormat::Bilevel => self.bit(x, y) as u32 * 255,
            _ => 255 * g.channels() - self.intensity(x, y),
        }
    }

    /// Raw bytes of the pixel at (x, y), for whole-pixel copies.
    ///
    /// Empty for bilevel rasters.
    #[inline]
    fn pixel_bytes(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.geometry().bytes_per_pixel();
        let start = x as usize * bpp;
        &self.row_bytes(y)[start..start + bpp]
    }
}

impl RasterAccess for Raster {
    #[inline]
    fn geometry(&self) -> &RasterGeometry {
        Raster::geometry(self)
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.data()
    }
}

impl RasterAccess for RasterMut {
    #[inline]
    fn geometry(&self) -> &RasterGeometry {
        RasterMut::geometry(self)
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.data()
    }
}

impl RasterMut {
    /// Set a bilevel pixel at (x, y).
    #[inline]
    pub fn set_bit(&mut self, x: u32, y: u32, val: u8) {
        set_data_bit(self.row_mut(y), x, val);
    }

    /// Overwrite the raw bytes of the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly one pixel long.
    #[inline]
    pub fn set_pixel_bytes(&mut self, x: u32, y: u32, bytes: &[u8]) {
        let bpp = RasterMut::geometry(self).bytes_per_pixel();
        let start = x as usize * bpp;
        self.row_mut(y)[start..start + bpp].copy_from_slice(bytes);
    }

    /// Copy pixel (`sx`, `sy`) of `src` to (x, y), in any format.
    ///
    /// Both rasters must share format and depth.
    #[inline]
    pub fn copy_pixel_from<R: RasterAccess>(&mut self, x: u32, y: u32, src: &R, sx: u32, sy: u32) {
        if RasterMut::geometry(self).is_bilevel() {
            let bit = src.bit(sx, sy);
            self.set_bit(x, y, bit);
        } else {
            let bpp = RasterMut::geometry(self).bytes_per_pixel();
            let from = sx as usize * bpp;
            let to = x as usize * bpp;
            let src_row = src.row_bytes(sy);
            self.row_mut(y)[to..to + bpp].copy_from_slice(&src_row[from..from + bpp]);
        }
    }
}
