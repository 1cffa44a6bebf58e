//! Cleanup options
//!
//! Which steps [`PageCleaner`](crate::PageCleaner) runs, and their
//! parameters. Every step is off by default.

use crate::{DocError, DocResult};
use scanmagic_core::Fixed;
use scanmagic_transform::Turn;

/// Background gray used to fill the corners uncovered by deskewing
pub const DEFAULT_BG_COLOR: u8 = 0xd6;

/// Which blank page classifier to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankCheck {
    /// Average darkness of the whole page
    #[default]
    Average,
    /// Darkest half-inch block inside a quarter-inch margin
    Blocks,
}

/// Options for the page cleanup pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupOptions {
    /// Level the page (default: false)
    pub deskew: bool,

    /// Fill byte for pixels uncovered by deskewing (default: 0xd6)
    pub bg_color: u8,

    /// Crop to the paper edges (default: false)
    pub crop: bool,

    /// Remove specks up to this many pixels across (default: None)
    pub despeckle: Option<u32>,

    /// Turn sideways pages upright (default: false)
    pub derotate: bool,

    /// Fixed clockwise rotation in degrees, a multiple of 90 (default: 0)
    pub rotate: i32,

    /// Drop pages at most this many percent dark (default: None)
    pub skip_blank: Option<f64>,

    /// Classifier used for `skip_blank` (default: Average)
    pub blank_check: BlankCheck,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            deskew: false,
            bg_color: DEFAULT_BG_COLOR,
            crop: false,
            despeckle: None,
            derotate: false,
            rotate: 0,
            skip_blank: None,
            blank_check: BlankCheck::Average,
        }
    }
}

impl CleanupOptions {
    /// Create new options with every step disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable deskewing
    pub fn with_deskew(mut self, deskew: bool) -> Self {
        self.deskew = deskew;
        self
    }

    /// Set the deskew background color
    pub fn with_bg_color(mut self, color: u8) -> Self {
        self.bg_color = color;
        self
    }

    /// Enable or disable cropping
    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    /// Set the despeckle diameter; `None` disables the step
    pub fn with_despeckle(mut self, diameter: Option<u32>) -> Self {
        self.despeckle = diameter;
        self
    }

    /// Enable or disable automatic turning of sideways pages
    pub fn with_derotate(mut self, derotate: bool) -> Self {
        self.derotate = derotate;
        self
    }

    /// Set the fixed rotation in degrees
    pub fn with_rotate(mut self, degrees: i32) -> Self {
        self.rotate = degrees;
        self
    }

    /// Set the blank threshold in percent; `None` keeps every page
    pub fn with_skip_blank(mut self, percent: Option<f64>) -> Self {
        self.skip_blank = percent;
        self
    }

    /// Set the blank threshold from a 16.16 fixed-point percentage
    pub fn with_skip_blank_fixed(mut self, percent: Fixed) -> Self {
        self.skip_blank = Some(percent.to_f64());
        self
    }

    /// Set the blank classifier
    pub fn with_blank_check(mut self, check: BlankCheck) -> Self {
        self.blank_check = check;
        self
    }

    /// Validate options
    pub fn validate(&self) -> DocResult<()> {
        if self.despeckle == Some(0) {
            return Err(DocError::InvalidParameter(
                "despeckle diameter must be at least 1".to_string(),
            ));
        }
        Turn::from_degrees(self.rotate)?;
        if let Some(thresh) = self.skip_blank {
            if !thresh.is_finite() || thresh < 0.0 {
                return Err(DocError::InvalidParameter(format!(
                    "blank threshold must be a non-negative percentage, got {thresh}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_every_step() {
        let opts = CleanupOptions::default();
        assert!(!opts.deskew && !opts.crop && !opts.derotate);
        assert_eq!(opts.despeckle, None);
        assert_eq!(opts.skip_blank, None);
        assert_eq!(opts.rotate, 0);
        assert_eq!(opts.bg_color, 0xd6);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(CleanupOptions::new().with_despeckle(Some(0)).validate().is_err());
        assert!(CleanupOptions::new().with_rotate(45).validate().is_err());
        assert!(CleanupOptions::new().with_rotate(-270).validate().is_ok());
        assert!(
            CleanupOptions::new()
                .with_skip_blank(Some(-2.0))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_skip_blank_fixed() {
        let opts = CleanupOptions::new().with_skip_blank_fixed(Fixed(5 << 16 | 0x8000));
        assert_eq!(opts.skip_blank, Some(5.5));
    }
}
