//! Blank page detection regression test
//!
//! Tests both blank classifiers:
//!   1. White and nearly white pages are blank on every layout
//!   2. A small mark is lost in the page average but caught by a block
//!   3. Marks inside the quarter-inch margin are ignored by the blocks
//!   4. Low resolutions are rejected by the block classifier

use scanmagic_core::{EdgeBounds, SampleOrder};
use scanmagic_recog::{PageVerdict, is_blank, is_blank_blocks};
use scanmagic_test::RegParams;
use scanmagic_test::synth::{fill_rect, gray_page, to_bilevel, to_gray16, to_rgb};

#[test]
fn blank_reg() {
    let mut rp = RegParams::new("blank");

    // --- Test 1: white pages ---
    let white = gray_page(300, 300, 255).expect("white");
    for page in [
        white.clone(),
        to_rgb(&white).expect("rgb"),
        to_bilevel(&white).expect("bilevel"),
        to_gray16(&white, SampleOrder::LittleEndian).expect("gray16"),
    ] {
        rp.check(is_blank(&page, 0.0).expect("is_blank") == PageVerdict::Blank, "white");
        rp.check(
            is_blank_blocks(&page, 100, 100, 0.0).expect("blocks") == PageVerdict::Blank,
            "white blocks",
        );
    }

    // --- Test 2: small mark ---
    // 20x20 black square inside the block spanning 72..120
    let mut m = white.to_mut();
    fill_rect(
        &mut m,
        EdgeBounds {
            top: 100,
            bottom: 120,
            left: 100,
            right: 120,
        },
        0,
    );
    let marked: scanmagic_core::Raster = m.into();
    for page in [marked.clone(), to_rgb(&marked).expect("rgb"), to_bilevel(&marked).expect("bilevel")] {
        // 400 of 90000 pixels
        rp.check(is_blank(&page, 1.0).expect("is_blank").is_blank(), "mark averages out");
        rp.check(!is_blank(&page, 0.4).expect("is_blank").is_blank(), "mark above 0.4%");
        rp.check(
            is_blank_blocks(&page, 100, 100, 5.0).expect("blocks") == PageVerdict::Content,
            "mark fills a block",
        );
    }

    // --- Test 3: margin ---
    let mut m = white.to_mut();
    fill_rect(
        &mut m,
        EdgeBounds {
            top: 0,
            bottom: 300,
            left: 0,
            right: 20,
        },
        0,
    );
    let shadow: scanmagic_core::Raster = m.into();
    rp.check(
        is_blank_blocks(&shadow, 100, 100, 1.0).expect("blocks") == PageVerdict::Blank,
        "margin shadow ignored",
    );
    rp.check(!is_blank(&shadow, 1.0).expect("is_blank").is_blank(), "shadow counts on average");

    // --- Test 4: resolution ---
    rp.check(is_blank_blocks(&white, 16, 100, 1.0).is_err(), "16 dpi rejected");

    assert!(rp.cleanup(), "blank regression test failed");
}
