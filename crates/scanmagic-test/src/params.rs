//! Regression test parameters and operations

use crate::error::TestResult;
use crate::pnm::encode_pnm;
use crate::{golden_dir, regout_dir};
use scanmagic_core::{Raster, RasterAccess};
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running check index, the mode, and every
/// failure seen so far. Checks never panic; [`RegParams::cleanup`]
/// reports the overall outcome.
pub struct RegParams {
    /// Name of the test (e.g., "edges")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        if mode != RegTestMode::Compare {
            let _ = fs::create_dir_all(golden_dir());
            let _ = fs::create_dir_all(regout_dir());
        }

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Record a boolean check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if condition {
            true
        } else {
            let msg = format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            );
            self.fail(msg)
        }
    }

    /// Compare two rasters for identical geometry and pixels
    ///
    /// Row padding past the last pixel is ignored.
    pub fn compare_raster(&mut self, r1: &Raster, r2: &Raster) -> bool {
        self.index += 1;

        let (g1, g2) = (r1.geometry(), r2.geometry());
        if g1.format() != g2.format()
            || g1.depth() != g2.depth()
            || g1.width() != g2.width()
            || g1.height() != g2.height()
        {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - geometry mismatch \
                 {}x{} vs {}x{}",
                self.test_name,
                self.index,
                g1.width(),
                g1.height(),
                g2.width(),
                g2.height()
            );
            return self.fail(msg);
        }

        let row_len =
            scanmagic_core::RasterGeometry::min_stride(g1.format(), g1.depth(), g1.width());
        for y in 0..g1.height() {
            if r1.row_bytes(y)[..row_len] != r2.row_bytes(y)[..row_len] {
                let msg = format!(
                    "Failure in {}_reg: raster comparison for index {} - row {} differs",
                    self.test_name, self.index, y
                );
                return self.fail(msg);
            }
        }

        true
    }

    /// Compare two byte arrays
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Write a raster as PNM and check it against its golden file
    ///
    /// In generate mode the file becomes the new golden file; in display
    /// mode it is only written to the regout directory.
    pub fn write_raster_and_check(&mut self, raster: &Raster) -> TestResult<()> {
        self.index += 1;
        let data = encode_pnm(raster);

        match self.mode {
            RegTestMode::Generate => {
                let golden_path = self.golden_path("pnm");
                fs::write(&golden_path, &data)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                let golden_path = self.golden_path("pnm");
                if !Path::new(&golden_path).exists() {
                    let msg = format!(
                        "Failure in {}_reg: golden file not found: {}",
                        self.test_name, golden_path
                    );
                    self.fail(msg);
                    return Ok(());
                }
                let golden = fs::read(&golden_path)?;
                if golden != data {
                    let msg = format!(
                        "Failure in {}_reg, index {}: raster differs from {}",
                        self.test_name, self.index, golden_path
                    );
                    self.fail(msg);
                }
            }
            RegTestMode::Display => {
                let local_path = format!(
                    "{}/{}.{:02}.pnm",
                    regout_dir(),
                    self.test_name,
                    self.index
                );
                fs::write(&local_path, &data)?;
                eprintln!("Wrote: {}", local_path);
            }
        }

        Ok(())
    }

    fn golden_path(&self, ext: &str) -> String {
        format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        )
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmagic_core::RasterGeometry;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(
            mode,
            RegTestMode::Compare | RegTestMode::Generate | RegTestMode::Display
        ));
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_raster_ignores_padding() {
        let g = RasterGeometry::gray8(2, 2).unwrap();
        let padded = g.with_stride(3).unwrap();
        let a = Raster::from_bytes(g, vec![1, 2, 3, 4]).unwrap();
        let b = Raster::from_bytes(padded, vec![1, 2, 99, 3, 4, 99]).unwrap();
        let c = Raster::from_bytes(g, vec![1, 2, 3, 5]).unwrap();

        let mut rp = RegParams::new("test");
        assert!(rp.compare_raster(&a, &b));
        assert!(!rp.compare_raster(&a, &c));
        assert_eq!(rp.index(), 2);
    }
}
