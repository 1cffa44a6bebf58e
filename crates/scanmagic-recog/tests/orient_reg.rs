//! Orientation detection regression test
//!
//! Tests turn suggestion:
//!   1. Horizontal text-like bands need no turn
//!   2. Vertical bands suggest a quarter turn, on every layout
//!   3. Applying the suggested turn makes the page read as upright

use scanmagic_core::SampleOrder;
use scanmagic_recog::find_turn;
use scanmagic_test::RegParams;
use scanmagic_test::synth::{stripes, to_bilevel, to_gray16, to_rgb};
use scanmagic_transform::{Turn, turn};

#[test]
fn orient_reg() {
    let mut rp = RegParams::new("orient");

    // --- Test 1: upright ---
    let upright = stripes(160, 200, 8, true).expect("stripes");
    let t = find_turn(&upright, 100, 100).expect("find turn");
    rp.check(t == Turn::None, "horizontal bands stay");

    // --- Test 2: sideways ---
    let sideways = stripes(160, 200, 8, false).expect("stripes");
    for page in [
        sideways.clone(),
        to_rgb(&sideways).expect("rgb"),
        to_bilevel(&sideways).expect("bilevel"),
        to_gray16(&sideways, SampleOrder::BigEndian).expect("gray16"),
    ] {
        let t = find_turn(&page, 150, 150).expect("find turn");
        rp.check(t == Turn::Cw90, "vertical bands turn");
    }

    // --- Test 3: turned page is upright ---
    let t = find_turn(&sideways, 100, 100).expect("find turn");
    let fixed = turn(&sideways, t).expect("turn");
    rp.compare_values(200.0, fixed.width() as f64, 0.0);
    let again = find_turn(&fixed, 100, 100).expect("find turn again");
    rp.check(again == Turn::None, "turned page needs no further turn");
    if rp.display() {
        rp.write_raster_and_check(&fixed).expect("write turned");
    }

    assert!(rp.cleanup(), "orient regression test failed");
}
