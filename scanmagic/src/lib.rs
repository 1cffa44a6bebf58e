//! Scanmagic - post-processing for scanned pages
//!
//! Cleans up page images as they come off a document scanner.
//!
//! # Overview
//!
//! - Raster buffers for bilevel, gray and RGB scans ([`Raster`])
//! - Paper edge, skew and orientation detection ([`recog`])
//! - Cropping, rotation and quarter turns ([`transform`])
//! - Speck removal ([`filter`])
//! - A per-sheet cleanup pipeline with duplex support ([`doc`])
//!
//! # Example
//!
//! ```
//! use scanmagic::{Raster, RasterGeometry};
//! use scanmagic::doc::{CleanupOptions, PageCleaner, PageSide};
//!
//! let mut cleaner = PageCleaner::new(
//!     CleanupOptions::new().with_skip_blank(Some(0.5)),
//!     300,
//!     300,
//! )
//! .unwrap();
//! let page = Raster::filled(RasterGeometry::gray8(640, 480).unwrap(), 255).unwrap();
//! assert!(cleaner.clean(page, PageSide::Front).unwrap().is_skipped());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use scanmagic_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use scanmagic_doc as doc;
pub use scanmagic_filter as filter;
pub use scanmagic_recog as recog;
pub use scanmagic_transform as transform;
