//! Minimal PNM encoder for raster dumps
//!
//! Bilevel rasters become P4, gray P5, RGB P6. 16-bit samples are written
//! big-endian with maxval 65535, as the format requires.

use scanmagic_core::{BitDepth, PixelFormat, Raster, RasterAccess, SampleOrder};

/// Encode a raster as a binary PNM image.
pub fn encode_pnm(raster: &Raster) -> Vec<u8> {
    let g = raster.geometry();
    let magic = match g.format() {
        PixelFormat::Bilevel => "P4",
        PixelFormat::Gray => "P5",
        PixelFormat::Rgb => "P6",
    };
    let mut out = format!("{}\n{} {}\n", magic, g.width(), g.height()).into_bytes();
    match (g.format(), g.depth()) {
        (PixelFormat::Bilevel, _) => {}
        (_, BitDepth::Bit16) => out.extend_from_slice(b"65535\n"),
        _ => out.extend_from_slice(b"255\n"),
    }

    let row_len = scanmagic_core::RasterGeometry::min_stride(g.format(), g.depth(), g.width());
    for y in 0..g.height() {
        let row = &raster.row_bytes(y)[..row_len];
        if g.depth() == BitDepth::Bit16 && g.sample_order() == SampleOrder::LittleEndian {
            for pair in row.chunks_exact(2) {
                out.push(pair[1]);
                out.push(pair[0]);
            }
        } else {
            out.extend_from_slice(row);
        }
    }
    out
}
