//! Raster regression test
//!
//! Tests the raster container and pixel access:
//!   1. Pixel reads agree across bilevel, gray, RGB and 16-bit layouts
//!   2. Padded strides are honored
//!   3. Shared buffers are copied only when needed
//!   4. Pixel bounds survive the trip through acquisition-layer units

use scanmagic_core::{
    BitDepth, EdgeBounds, Error, GeometryRect, PixelFormat, Raster, RasterAccess,
    RasterGeometry, RasterMut, SampleOrder, Unit, ValueKind,
};
use scanmagic_test::RegParams;

#[test]
fn raster_reg() {
    let mut rp = RegParams::new("raster");

    // --- Test 1: layouts ---
    let mut bits = RasterMut::from_bytes(
        RasterGeometry::bilevel(10, 2).expect("bilevel"),
        vec![0; 4],
    )
    .expect("bilevel buffer");
    bits.set_bit(9, 1, 1);
    rp.compare_values(0.0, bits.gray(9, 1) as f64, 0.0);
    rp.compare_values(255.0, bits.darkness(9, 1) as f64, 0.0);
    rp.compare_values(255.0, bits.gray(8, 1) as f64, 0.0);
    rp.compare_values(0x40 as f64, bits.row(1)[1] as f64, 0.0);

    let rgb = Raster::from_bytes(
        RasterGeometry::rgb8(2, 1).expect("rgb"),
        vec![30, 60, 90, 255, 255, 255],
    )
    .expect("rgb buffer");
    rp.compare_values(180.0, rgb.intensity(0, 0) as f64, 0.0);
    rp.compare_values(60.0, rgb.gray(0, 0) as f64, 0.0);
    rp.compare_values(585.0, rgb.darkness(0, 0) as f64, 0.0);
    rp.compare_values(3.0, rgb.pixel_bytes(1, 0).len() as f64, 0.0);

    for (order, bytes) in [
        (SampleOrder::BigEndian, vec![0xab, 0x01]),
        (SampleOrder::LittleEndian, vec![0x01, 0xab]),
    ] {
        let g = RasterGeometry::new(PixelFormat::Gray, BitDepth::Bit16, 1, 1)
            .expect("gray16")
            .with_sample_order(order);
        let r = Raster::from_bytes(g, bytes).expect("gray16 buffer");
        rp.compare_values(0xab as f64, r.gray(0, 0) as f64, 0.0);
    }

    let bad = RasterGeometry::new(PixelFormat::Rgb, BitDepth::Bit1, 4, 4);
    rp.check(
        matches!(bad, Err(Error::InvalidFormat { .. })),
        "1-bit RGB is rejected",
    );
    rp.check(RasterGeometry::gray8(0, 4).is_err(), "empty raster is rejected");

    // --- Test 2: padded stride ---
    let g = RasterGeometry::gray8(3, 2)
        .expect("gray")
        .with_stride(4)
        .expect("stride");
    rp.check(g.with_stride(2).is_err(), "short stride is rejected");
    let padded = Raster::from_bytes(g, vec![1, 2, 3, 99, 4, 5, 6, 99]).expect("padded");
    rp.compare_values(4.0, padded.gray(0, 1) as f64, 0.0);
    rp.compare_values(6.0, padded.gray(2, 1) as f64, 0.0);
    rp.check(
        Raster::from_bytes(g, vec![0; 7]).is_err(),
        "buffer shorter than stride * height is rejected",
    );

    // --- Test 3: sharing ---
    let page = Raster::filled(RasterGeometry::gray8(8, 8).expect("gray"), 200).expect("page");
    let alias = page.clone();
    rp.compare_values(2.0, page.ref_count() as f64, 0.0);
    let page = match page.try_into_mut() {
        Ok(_) => panic!("shared raster must not be taken"),
        Err(shared) => shared,
    };
    let mut copy = page.into_mut();
    copy.row_mut(0)[0] = 0;
    rp.compare_values(200.0, alias.gray(0, 0) as f64, 0.0);
    rp.compare_values(0.0, copy.gray(0, 0) as f64, 0.0);
    rp.check(alias.try_into_mut().is_ok(), "sole owner can mutate in place");

    // --- Test 4: acquisition units ---
    let bounds = EdgeBounds::new(65, 223, 56, 254).expect("bounds");
    for (unit, kind) in [
        (Unit::Pixels, ValueKind::Integer),
        (Unit::Pixels, ValueKind::FixedPoint),
        (Unit::Millimeters, ValueKind::FixedPoint),
    ] {
        let rect = GeometryRect::from_bounds(&bounds, unit, kind, 300, 300).expect("rect");
        let back = rect.to_bounds(300, 300).expect("bounds back");
        rp.check(back == bounds, "bounds survive the unit conversion");
    }
    rp.check(
        GeometryRect::from_bounds(&bounds, Unit::Pixels, ValueKind::Integer, 0, 300).is_err(),
        "zero resolution is rejected",
    );

    assert!(rp.cleanup(), "raster regression test failed");
}
