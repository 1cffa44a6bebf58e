//! RASTER - The scanned image container
//!
//! A `Raster` is one side of one scanned page: a contiguous byte buffer
//! plus the [`RasterGeometry`] that describes how to read it.
//!
//! # Pixel layout
//!
//! - Rows are stored top to bottom, `stride` bytes apart
//! - Bilevel pixels are packed MSB first; a set bit is black
//! - Gray and RGB pixels are chunky (all channels of a pixel adjacent)
//! - 16-bit samples are two bytes; [`SampleOrder`] names the byte holding
//!   the most significant half
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `RasterMut` via [`Raster::try_into_mut`]
//! or [`Raster::to_mut`], then convert back with `Into<Raster>`.
//! Geometry and pixel bytes of a `RasterMut` only ever change together,
//! through [`RasterMut::replace_contents`].

mod access;

pub use access::*;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel format of a scanned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 1 bit per pixel, black and white
    Bilevel,
    /// One intensity channel
    Gray,
    /// Three chunky channels, red first
    Rgb,
}

impl PixelFormat {
    /// Number of channels per pixel.
    pub fn channels(self) -> u32 {
        match self {
            PixelFormat::Bilevel | PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

/// Bits per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BitDepth {
    /// Packed bilevel
    Bit1 = 1,
    /// One byte per sample
    Bit8 = 8,
    /// Two bytes per sample
    Bit16 = 16,
}

impl BitDepth {
    /// Create a `BitDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1, 8, or 16.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(BitDepth::Bit1),
            8 => Ok(BitDepth::Bit8),
            16 => Ok(BitDepth::Bit16),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per sample.
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Byte order of 16-bit samples.
///
/// This is a property of the acquisition layer and is never guessed
/// from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleOrder {
    /// Most significant byte first
    BigEndian,
    /// Least significant byte first
    #[default]
    LittleEndian,
}

/// Geometry descriptor of a raster buffer.
///
/// Format and depth are validated on construction, so every
/// `RasterGeometry` in existence describes a readable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterGeometry {
    format: PixelFormat,
    depth: BitDepth,
    width: u32,
    height: u32,
    stride: usize,
    sample_order: SampleOrder,
}

impl RasterGeometry {
    /// Create a geometry with the minimal row stride for the layout.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] for combinations other than
    ///   bilevel/1, gray/8, gray/16, rgb/8, rgb/16.
    /// - [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(format: PixelFormat, depth: BitDepth, width: u32, height: u32) -> Result<Self> {
        let valid = matches!(
            (format, depth),
            (PixelFormat::Bilevel, BitDepth::Bit1)
                | (PixelFormat::Gray | PixelFormat::Rgb, BitDepth::Bit8 | BitDepth::Bit16)
        );
        if !valid {
            return Err(Error::InvalidFormat { format, depth });
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            format,
            depth,
            width,
            height,
            stride: Self::min_stride(format, depth, width),
            sample_order: SampleOrder::default(),
        })
    }

    /// 8-bit grayscale geometry.
    pub fn gray8(width: u32, height: u32) -> Result<Self> {
        Self::new(PixelFormat::Gray, BitDepth::Bit8, width, height)
    }

    /// 8-bit-per-channel RGB geometry.
    pub fn rgb8(width: u32, height: u32) -> Result<Self> {
        Self::new(PixelFormat::Rgb, BitDepth::Bit8, width, height)
    }

    /// Packed bilevel geometry.
    pub fn bilevel(width: u32, height: u32) -> Result<Self> {
        Self::new(PixelFormat::Bilevel, BitDepth::Bit1, width, height)
    }

    /// Use a caller-supplied row stride (for padded rows).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `stride` is shorter than
    /// one row of pixels.
    pub fn with_stride(mut self, stride: usize) -> Result<Self> {
        let min = Self::min_stride(self.format, self.depth, self.width);
        if stride < min {
            return Err(Error::InvalidParameter(format!(
                "stride {stride} shorter than row of {min} bytes"
            )));
        }
        self.stride = stride;
        Ok(self)
    }

    /// Set the byte order of 16-bit samples.
    pub fn with_sample_order(mut self, order: SampleOrder) -> Self {
        self.sample_order = order;
        self
    }

    /// Row length in bytes for a packed (unpadded) row.
    pub fn min_stride(format: PixelFormat, depth: BitDepth, width: u32) -> usize {
        let width = width as usize;
        match format {
            PixelFormat::Bilevel => width.div_ceil(8),
            PixelFormat::Gray => width * depth.bits() as usize / 8,
            PixelFormat::Rgb => width * 3 * depth.bits() as usize / 8,
        }
    }

    /// Same layout with new dimensions and a packed stride.
    ///
    /// Used by transforms that change the image size.
    pub fn resized(&self, width: u32, height: u32) -> Result<Self> {
        Ok(Self::new(self.format, self.depth, width, height)?.with_sample_order(self.sample_order))
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes from the start of one row to the start of the next.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn sample_order(&self) -> SampleOrder {
        self.sample_order
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.format.channels()
    }

    /// Bytes per pixel, or 0 for packed bilevel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            PixelFormat::Bilevel => 0,
            _ => self.channels() as usize * self.depth.bits() as usize / 8,
        }
    }

    /// Check whether the raster is packed bilevel.
    #[inline]
    pub fn is_bilevel(&self) -> bool {
        self.format == PixelFormat::Bilevel
    }

    /// Minimum buffer length: `stride * height`.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.stride * self.height as usize
    }

    /// Error describing this geometry as unsupported.
    pub fn unsupported(&self) -> Error {
        Error::InvalidFormat {
            format: self.format,
            depth: self.depth,
        }
    }
}

/// Reserve a buffer of `len` bytes set to `fill`.
///
/// # Errors
///
/// Returns [`Error::AllocationFailed`] instead of aborting when the
/// memory cannot be reserved.
pub fn alloc_buffer(len: usize, fill: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed)?;
    buf.resize(len, fill);
    Ok(buf)
}

/// Internal raster data
#[derive(Debug)]
struct RasterData {
    geometry: RasterGeometry,
    data: Vec<u8>,
}

impl RasterData {
    fn checked(geometry: RasterGeometry, data: Vec<u8>) -> Result<Self> {
        let needed = geometry.byte_len();
        if data.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self { geometry, data })
    }

    #[inline]
    fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.geometry.stride;
        &self.data[start..start + self.geometry.stride]
    }
}

/// Shared, immutable scanned image.
///
/// Cloning a `Raster` is cheap; the pixel buffer is reference counted.
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a raster with every byte set to zero.
    ///
    /// For gray and RGB that is black; for bilevel it is white.
    pub fn new(geometry: RasterGeometry) -> Result<Self> {
        Self::filled(geometry, 0)
    }

    /// Create a raster with every byte set to `value`.
    pub fn filled(geometry: RasterGeometry, value: u8) -> Result<Self> {
        let data = alloc_buffer(geometry.byte_len(), value)?;
        Ok(Raster {
            inner: Arc::new(RasterData { geometry, data }),
        })
    }

    /// Wrap a caller-owned buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `data.len() < stride * height`.
    pub fn from_bytes(geometry: RasterGeometry, data: Vec<u8>) -> Result<Self> {
        Ok(Raster {
            inner: Arc::new(RasterData::checked(geometry, data)?),
        })
    }

    #[inline]
    pub fn geometry(&self) -> &RasterGeometry {
        &self.inner.geometry
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.geometry.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.geometry.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.geometry.format
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.inner.geometry.depth
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.geometry.stride
    }

    /// Get the raw buffer, including any bytes past `stride * height`.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        self.inner.row(y)
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Create an independent copy of this raster.
    pub fn deep_clone(&self) -> Self {
        Raster {
            inner: Arc::new(RasterData {
                geometry: self.inner.geometry,
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Try to take exclusive ownership without copying.
    ///
    /// Returns `Err(self)` if other references exist.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: RasterData {
                geometry: self.inner.geometry,
                data: self.inner.data.clone(),
            },
        }
    }

    /// Take ownership, copying only if the buffer is shared.
    pub fn into_mut(self) -> RasterMut {
        self.try_into_mut().unwrap_or_else(|shared| shared.to_mut())
    }
}

/// Exclusively owned, mutable scanned image.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Wrap a caller-owned buffer for in-place processing.
    pub fn from_bytes(geometry: RasterGeometry, data: Vec<u8>) -> Result<Self> {
        Ok(RasterMut {
            inner: RasterData::checked(geometry, data)?,
        })
    }

    #[inline]
    pub fn geometry(&self) -> &RasterGeometry {
        &self.inner.geometry
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.geometry.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.geometry.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.geometry.format
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.inner.geometry.depth
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.geometry.stride
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the pixel bytes.
    ///
    /// The geometry cannot be changed through this slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get the bytes of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        self.inner.row(y)
    }

    /// Get mutable access to row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.inner.geometry.stride;
        let start = y as usize * stride;
        &mut self.inner.data[start..start + stride]
    }

    /// Swap in a new geometry and pixel buffer as one step.
    ///
    /// On error the raster keeps its previous contents.
    pub fn replace_contents(&mut self, geometry: RasterGeometry, data: Vec<u8>) -> Result<()> {
        self.inner = RasterData::checked(geometry, data)?;
        Ok(())
    }

    /// Adopt a smaller geometry after compacting pixels in place.
    ///
    /// The caller has already rewritten the first `geometry.byte_len()`
    /// bytes; the buffer is truncated to that length.
    pub fn compact_to(&mut self, geometry: RasterGeometry) -> Result<()> {
        let needed = geometry.byte_len();
        if needed > self.inner.data.len() {
            return Err(Error::BufferTooSmall {
                needed,
                actual: self.inner.data.len(),
            });
        }
        self.inner.data.truncate(needed);
        self.inner.geometry = geometry;
        Ok(())
    }

    /// Return the buffer to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.data
    }
}

impl From<RasterMut> for Raster {
    fn from(raster_mut: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster_mut.inner),
        }
    }
}
