//! Viewport geometry for the row grid.
//!
//! This module handles:
//! - Projecting surface scroll metrics into a pixel viewport
//! - Mapping the viewport to the visible row range (integer division over
//!   the uniform row extent)
//! - Expanding a row range by the preload margin

mod viewport;

pub use viewport::{RowRange, Viewport};
