//! scanmagic-recog - Page geometry detection
//!
//! This crate answers the questions a scan post-processor asks about a page
//! before rewriting it:
//!
//! - **Transitions**: where each scan line first crosses from background to
//!   paper ([`scan_transitions`])
//! - **Lines**: the dominant straight line through a transition array
//!   ([`find_best_line`], [`find_top_edge`])
//! - **Edges**: the rectangle the sheet occupies ([`find_edges`])
//! - **Skew**: how far the sheet is rotated and about which point to undo it
//!   ([`find_skew`], [`deskew`])
//! - **Orientation**: whether the page was fed sideways ([`find_turn`])
//! - **Blank pages**: whether the page is worth keeping ([`is_blank`],
//!   [`is_blank_blocks`])
//!
//! Detection failures ([`RecogError::EdgesNotFound`],
//! [`RecogError::SkewUndetectable`]) are ordinary outcomes; callers should
//! leave the page as it is.

pub mod blank;
pub mod edges;
mod error;
pub mod line;
pub mod orient;
pub mod skew;
pub mod transition;

pub use blank::{PageVerdict, is_blank, is_blank_blocks};
pub use edges::find_edges;
pub use error::{RecogError, RecogResult};
pub use line::{LineFit, LineSearch, LineSearchOptions, TopEdge, find_best_line, find_top_edge};
pub use orient::find_turn;
pub use skew::{SkewOptions, SkewResult, deskew, find_skew, find_skew_with_options};
pub use transition::{
    ScanDirection, TransitionArray, TransitionOptions, scan_transitions,
    scan_transitions_with_options,
};

// Re-export core for convenience
pub use scanmagic_core;
