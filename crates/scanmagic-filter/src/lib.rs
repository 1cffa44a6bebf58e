//! scanmagic-filter - Cleanup filters for scanned pages
//!
//! Currently a single filter:
//!
//! - [`despeckle`] - removal of isolated dark specks smaller than a window

pub mod despeckle;
mod error;

pub use despeckle::despeckle;
pub use error::{FilterError, FilterResult};
