//! Crop regression test
//!
//! Tests cropping of a bordered sheet:
//!   1. Output size equals the bounds on gray, RGB and 16-bit pages
//!   2. The outline lands on the border of the cropped page
//!   3. Bilevel crops are widened to byte boundaries
//!   4. In-place crop matches the copying crop
//!   5. Out-of-range bounds are rejected without touching the raster

use scanmagic_core::{EdgeBounds, RasterAccess, SampleOrder};
use scanmagic_test::RegParams;
use scanmagic_test::synth::{outlined_sheet, to_bilevel, to_gray16, to_rgb};
use scanmagic_transform::{crop, crop_in_place};

#[test]
fn crop_reg() {
    let mut rp = RegParams::new("crop");

    let outline = EdgeBounds::new(50, 250, 50, 150).expect("outline");
    let gray = outlined_sheet(200, 300, outline, 2).expect("sheet");

    // --- Test 1: gray crop ---
    let cropped = crop(&gray, outline).expect("crop gray");
    rp.compare_values(100.0, cropped.width() as f64, 0.0);
    rp.compare_values(200.0, cropped.height() as f64, 0.0);

    // --- Test 2: outline is now the page border ---
    rp.compare_values(0.0, cropped.gray(0, 100) as f64, 0.0);
    rp.compare_values(0.0, cropped.gray(99, 100) as f64, 0.0);
    rp.compare_values(0.0, cropped.gray(50, 0) as f64, 0.0);
    rp.compare_values(0.0, cropped.gray(50, 199) as f64, 0.0);
    rp.compare_values(255.0, cropped.gray(50, 100) as f64, 0.0);
    if rp.display() {
        rp.write_raster_and_check(&cropped).expect("write crop");
    }

    // --- Test 3: RGB and 16-bit keep their layout ---
    let rgb = to_rgb(&gray).expect("rgb");
    let out = crop(&rgb, outline).expect("crop rgb");
    rp.compare_values(300.0, out.stride() as f64, 0.0);
    rp.check(out.pixel_bytes(10, 10) == rgb.pixel_bytes(60, 60), "rgb pixel moved");

    let wide = to_gray16(&gray, SampleOrder::LittleEndian).expect("gray16");
    let out = crop(&wide, outline).expect("crop 16");
    rp.compare_values(200.0, out.stride() as f64, 0.0);
    rp.compare_values(0.0, out.sample(1, 100, 0) as f64, 0.0);

    // --- Test 4: bilevel crop widens to whole bytes ---
    let bilevel = to_bilevel(&gray).expect("bilevel");
    let bounds = EdgeBounds::new(50, 250, 51, 149).expect("bounds");
    let out = crop(&bilevel, bounds).expect("crop bilevel");
    // columns 48..152 survive
    rp.compare_values(104.0, out.width() as f64, 0.0);
    rp.compare_values(1.0, out.bit(2, 100) as f64, 0.0);
    rp.compare_values(0.0, out.bit(1, 100) as f64, 0.0);

    // --- Test 5: in place matches the copy ---
    for page in [&gray, &rgb, &bilevel] {
        let expected = crop(page, bounds).expect("crop");
        let mut m = page.to_mut();
        crop_in_place(&mut m, bounds).expect("crop in place");
        rp.compare_raster(&expected, &m.into());
    }

    // --- Test 6: out-of-range bounds ---
    let bad = EdgeBounds {
        top: 10,
        bottom: 301,
        left: 0,
        right: 10,
    };
    rp.check(crop(&gray, bad).is_err(), "bottom past height rejected");
    let mut m = gray.to_mut();
    rp.check(crop_in_place(&mut m, bad).is_err(), "in-place rejected");
    rp.compare_raster(&gray, &m.into());

    assert!(rp.cleanup(), "crop regression test failed");
}
