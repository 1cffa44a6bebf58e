//! scanmagic-test - Regression test framework for scanmagic
//!
//! This crate provides a regression test framework supporting three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests and dump intermediate rasters for inspection
//!
//! It also builds the synthetic scans the tests run on (see [`synth`]), so
//! no image files are needed to exercise the engine.
//!
//! # Usage
//!
//! ```ignore
//! use scanmagic_test::RegParams;
//!
//! let mut rp = RegParams::new("edges");
//! rp.compare_values(50.0, bounds.top as f64, 2.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;
mod pnm;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use pnm::encode_pnm;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // scanmagic-test is at crates/scanmagic-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
