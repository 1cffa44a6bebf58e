//! Page cleanup pipeline
//!
//! Runs the enabled cleanup steps on each scanned side, in order:
//!
//! 1. deskew (find skew, rotate level)
//! 2. crop to the paper edges
//! 3. despeckle
//! 4. turn (suggested quarter turn plus the fixed rotation)
//! 5. blank check
//!
//! A step whose detection fails, or which does not handle the page's
//! format, is skipped and the page is kept as it is.
//!
//! # Duplex
//!
//! Both sides of a sheet share its skew and outline. The cleaner remembers
//! what it measured on the front and, for the back that follows, reuses it
//! mirrored left to right instead of measuring again. If the front could
//! not be measured the back is measured on its own. Quarter-turn user
//! rotations are reversed on the back, since the sheet was flipped about
//! its long edge.

use crate::{BlankCheck, CleanupOptions, DocError, DocResult};
use scanmagic_core::{EdgeBounds, Raster};
use scanmagic_filter::despeckle;
use scanmagic_recog::{
    SkewResult, find_edges, find_skew, find_turn, is_blank, is_blank_blocks,
};
use scanmagic_transform::{Turn, crop_in_place, rotate, turn};
use tracing::{debug, info, trace, warn};

/// Which side of the sheet a page is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSide {
    #[default]
    Front,
    Back,
}

/// What became of a cleaned page.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The cleaned page
    Kept(Raster),
    /// The page was blank and should be dropped
    Skipped,
}

impl PageOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, PageOutcome::Skipped)
    }

    /// The cleaned page, unless it was skipped.
    pub fn into_raster(self) -> Option<Raster> {
        match self {
            PageOutcome::Kept(raster) => Some(raster),
            PageOutcome::Skipped => None,
        }
    }
}

/// Measurements of the current sheet's front side.
#[derive(Debug, Clone, Copy, Default)]
struct SheetMemo {
    skew: Option<SkewResult>,
    crop: Option<EdgeBounds>,
}

/// Cleans scanned pages according to a set of [`CleanupOptions`].
///
/// # Example
/// ```
/// use scanmagic_core::{Raster, RasterGeometry};
/// use scanmagic_doc::{CleanupOptions, PageCleaner, PageSide};
///
/// let options = CleanupOptions::new().with_skip_blank(Some(1.0));
/// let mut cleaner = PageCleaner::new(options, 300, 300).unwrap();
///
/// let white = Raster::filled(RasterGeometry::gray8(64, 64).unwrap(), 255).unwrap();
/// assert!(cleaner.clean(white, PageSide::Front).unwrap().is_skipped());
/// ```
#[derive(Debug, Clone)]
pub struct PageCleaner {
    options: CleanupOptions,
    dpi_x: u32,
    dpi_y: u32,
    sheet: SheetMemo,
}

impl PageCleaner {
    /// Create a cleaner for scans at the given resolution.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::InvalidParameter`] for invalid options or a zero
    /// resolution.
    pub fn new(options: CleanupOptions, dpi_x: u32, dpi_y: u32) -> DocResult<Self> {
        options.validate()?;
        if dpi_x == 0 || dpi_y == 0 {
            return Err(DocError::InvalidParameter(format!(
                "resolution must be positive, got {dpi_x}x{dpi_y}"
            )));
        }
        Ok(Self {
            options,
            dpi_x,
            dpi_y,
            sheet: SheetMemo::default(),
        })
    }

    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Run the enabled steps on one side of a sheet.
    ///
    /// A front side starts a new sheet. A back side uses, and then forgets,
    /// the measurements of the front before it.
    pub fn clean(&mut self, page: Raster, side: PageSide) -> DocResult<PageOutcome> {
        trace!(?side, width = page.width(), height = page.height(), "clean: start");
        let memo = std::mem::take(&mut self.sheet);
        let mut page = page;

        if self.options.deskew {
            page = self.deskew_step(page, side, memo.skew)?;
        }
        if self.options.crop {
            page = self.crop_step(page, side, memo.crop)?;
        }
        if let Some(diameter) = self.options.despeckle {
            page = despeckle_step(page, diameter)?;
        }
        page = self.turn_step(page, side)?;

        if let Some(thresh) = self.options.skip_blank {
            let verdict = match self.options.blank_check {
                BlankCheck::Average => is_blank(&page, thresh)?,
                BlankCheck::Blocks => is_blank_blocks(&page, self.dpi_x, self.dpi_y, thresh)?,
            };
            if verdict.is_blank() {
                info!(?side, thresh, "clean: blank page skipped");
                return Ok(PageOutcome::Skipped);
            }
        }

        trace!(width = page.width(), height = page.height(), "clean: finish");
        Ok(PageOutcome::Kept(page))
    }

    fn deskew_step(
        &mut self,
        page: Raster,
        side: PageSide,
        front: Option<SkewResult>,
    ) -> DocResult<Raster> {
        let skew = match (side, front) {
            (PageSide::Back, Some(front)) => Some(front.mirrored(page.width())),
            _ => {
                let found = skippable("find skew", find_skew(&page, self.dpi_x, self.dpi_y))?;
                if side == PageSide::Front {
                    self.sheet.skew = found;
                }
                found
            }
        };
        let Some(skew) = skew else {
            return Ok(page);
        };
        debug!(
            center_x = skew.center_x,
            center_y = skew.center_y,
            slope = skew.slope,
            "deskew"
        );
        let level = rotate(
            &page,
            skew.center_x,
            skew.center_y,
            skew.slope,
            self.options.bg_color,
        );
        Ok(skippable("rotate", level)?.unwrap_or(page))
    }

    fn crop_step(
        &mut self,
        page: Raster,
        side: PageSide,
        front: Option<EdgeBounds>,
    ) -> DocResult<Raster> {
        let bounds = match (side, front) {
            (PageSide::Back, Some(front)) => Some(front.mirrored(page.width())),
            _ => {
                let found = skippable("find edges", find_edges(&page, self.dpi_x, self.dpi_y))?;
                if side == PageSide::Front {
                    self.sheet.crop = found;
                }
                found
            }
        };
        let Some(bounds) = bounds else {
            return Ok(page);
        };
        if let Err(e) = bounds.validate_within(page.width(), page.height()) {
            warn!(?bounds, error = %e, "crop: bounds do not fit, not cropping");
            return Ok(page);
        }
        debug!(?bounds, "crop");
        let mut m = page.into_mut();
        crop_in_place(&mut m, bounds)?;
        Ok(m.into())
    }

    fn turn_step(&self, page: Raster, side: PageSide) -> DocResult<Raster> {
        let mut degrees = 0;
        if self.options.derotate {
            let suggested = skippable("find turn", find_turn(&page, self.dpi_x, self.dpi_y))?;
            degrees += suggested.map_or(0, Turn::degrees);
        }
        degrees += self.options.rotate;
        if side == PageSide::Back && self.options.rotate % 180 != 0 {
            degrees += 180;
        }

        let t = Turn::from_degrees(degrees)?;
        if t == Turn::None {
            return Ok(page);
        }
        debug!(degrees = t.degrees(), "turn");
        Ok(turn(&page, t)?)
    }
}

fn despeckle_step(page: Raster, diameter: u32) -> DocResult<Raster> {
    let mut m = page.into_mut();
    skippable("despeckle", despeckle(&mut m, diameter))?;
    Ok(m.into())
}

/// Turn a step failure that should only skip the step into `None`.
fn skippable<T, E: Into<DocError>>(step: &str, result: Result<T, E>) -> DocResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let e = e.into();
            if !e.skips_step() {
                return Err(e);
            }
            info!(step, error = %e, "step skipped");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmagic_core::RasterGeometry;

    fn ramp(width: u32, height: u32) -> Raster {
        let g = RasterGeometry::gray8(width, height).unwrap();
        let data = (0..g.byte_len()).map(|i| (i * 13 % 251) as u8).collect();
        Raster::from_bytes(g, data).unwrap()
    }

    #[test]
    fn test_nothing_enabled_keeps_page() {
        let page = ramp(20, 10);
        let mut cleaner = PageCleaner::new(CleanupOptions::default(), 100, 100).unwrap();
        let out = cleaner
            .clean(page.clone(), PageSide::Front)
            .unwrap()
            .into_raster()
            .unwrap();
        assert_eq!(out.data(), page.data());
    }

    #[test]
    fn test_rejects_bad_setup() {
        assert!(PageCleaner::new(CleanupOptions::default(), 0, 100).is_err());
        let bad = CleanupOptions::new().with_rotate(30);
        assert!(PageCleaner::new(bad, 100, 100).is_err());
    }

    #[test]
    fn test_back_side_reverses_quarter_turn() {
        let page = ramp(20, 10);
        let options = CleanupOptions::new().with_rotate(90);
        let mut cleaner = PageCleaner::new(options, 100, 100).unwrap();

        let front = cleaner.clean(page.clone(), PageSide::Front).unwrap();
        let expected = turn(&page, Turn::Cw90).unwrap();
        assert_eq!(front.into_raster().unwrap().data(), expected.data());

        let back = cleaner.clean(page.clone(), PageSide::Back).unwrap();
        let expected = turn(&page, Turn::Cw270).unwrap();
        assert_eq!(back.into_raster().unwrap().data(), expected.data());
    }

    #[test]
    fn test_half_turn_is_not_reversed() {
        let page = ramp(8, 6);
        let options = CleanupOptions::new().with_rotate(180);
        let mut cleaner = PageCleaner::new(options, 100, 100).unwrap();
        let back = cleaner.clean(page.clone(), PageSide::Back).unwrap();
        let expected = turn(&page, Turn::Cw180).unwrap();
        assert_eq!(back.into_raster().unwrap().data(), expected.data());
    }

    #[test]
    fn test_failed_detection_keeps_page() {
        let page = Raster::filled(RasterGeometry::gray8(60, 60).unwrap(), 255).unwrap();
        let options = CleanupOptions::new().with_deskew(true).with_crop(true);
        let mut cleaner = PageCleaner::new(options, 100, 100).unwrap();
        let out = cleaner.clean(page.clone(), PageSide::Front).unwrap();
        let out = out.into_raster().unwrap();
        assert_eq!((out.width(), out.height()), (60, 60));
        assert_eq!(out.data(), page.data());
    }

    #[test]
    fn test_unsupported_despeckle_is_skipped() {
        let g = RasterGeometry::new(
            scanmagic_core::PixelFormat::Gray,
            scanmagic_core::BitDepth::Bit16,
            10,
            10,
        )
        .unwrap();
        let page = Raster::filled(g, 9).unwrap();
        let options = CleanupOptions::new().with_despeckle(Some(2));
        let mut cleaner = PageCleaner::new(options, 100, 100).unwrap();
        let out = cleaner.clean(page, PageSide::Front).unwrap();
        assert!(out.into_raster().unwrap().data().iter().all(|&v| v == 9));
    }

    #[test]
    fn test_skippable() {
        let found: DocResult<Option<u8>> = skippable(
            "edges",
            Err::<u8, _>(scanmagic_recog::RecogError::EdgesNotFound("none".into())),
        );
        assert!(matches!(found, Ok(None)));
        let fatal: DocResult<Option<u8>> =
            skippable("alloc", Err::<u8, _>(scanmagic_core::Error::AllocationFailed));
        assert!(fatal.is_err());
    }
}
