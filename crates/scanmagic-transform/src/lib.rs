//! scanmagic-transform - Geometric transformations for scanned pages
//!
//! This crate provides the operations that rewrite pixel data:
//!
//! - Cropping to a rectangle, copying or compacting in place
//! - Rotation by a small slope about an arbitrary pivot (deskew)
//! - Quarter turns (90, 180, 270 degrees clockwise)
//!
//! Every operation that changes the image size produces a new geometry
//! together with the new pixels; in-place variants swap both in only
//! after the output is complete.

pub mod crop;
mod error;
pub mod rotate;
pub mod turn;

pub use crop::{crop, crop_in_place};
pub use error::{TransformError, TransformResult};
pub use rotate::{rotate, rotate_in_place};
pub use turn::{Turn, turn, turn_in_place};
