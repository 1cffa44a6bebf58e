//! scanmagic-doc - Page cleanup for scanned sheets
//!
//! Ties the geometry detection of `scanmagic-recog` to the rewrites of
//! `scanmagic-transform` and `scanmagic-filter`. A [`PageCleaner`] takes
//! the raw sides of each sheet as they come off the scanner and returns
//! them deskewed, cropped, despeckled, turned upright, or dropped as blank,
//! depending on its [`CleanupOptions`].
//!
//! # Example
//!
//! ```
//! use scanmagic_core::{Raster, RasterGeometry};
//! use scanmagic_doc::{CleanupOptions, PageCleaner, PageSide};
//!
//! let options = CleanupOptions::new()
//!     .with_deskew(true)
//!     .with_crop(true)
//!     .with_rotate(180);
//! let mut cleaner = PageCleaner::new(options, 200, 200).unwrap();
//!
//! let page = Raster::filled(RasterGeometry::gray8(32, 32).unwrap(), 255).unwrap();
//! let out = cleaner.clean(page, PageSide::Front).unwrap();
//! assert_eq!(out.into_raster().unwrap().width(), 32);
//! ```

mod cleaner;
mod error;
mod options;

pub use cleaner::{PageCleaner, PageOutcome, PageSide};
pub use error::{DocError, DocResult};
pub use options::{BlankCheck, CleanupOptions, DEFAULT_BG_COLOR};
