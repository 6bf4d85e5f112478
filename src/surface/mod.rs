//! Rendering surface abstraction with pluggable implementations.
//!
//! This module provides:
//! - The surface-agnostic `RowSurface` trait and scroll metrics
//! - A DOM surface (wasm32, primary)
//! - A simulated in-memory surface for native tests, the CLI, and benches

pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use sim::SimSurface;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;

use crate::error::Result;

/// Current scroll geometry of the bound container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Scroll offset of the viewport top within the content, in pixels.
    pub scroll_top: f64,
    /// Visible height of the container, in pixels.
    pub viewport_height: f64,
}

/// Narrow capability interface over a concrete rendering surface.
///
/// The windowing algorithm owns row-container handles but only ever
/// manipulates them through these primitives, so it stays independent of
/// any particular surface and is unit-testable against [`SimSurface`].
pub trait RowSurface {
    /// Opaque row-container token. Handles stay valid while owned by the
    /// slot map or the recycling pool, attached or not.
    type Handle;

    /// Construct a fresh detached row container with `columns` cell slots.
    fn create_row(&mut self, columns: usize) -> Result<Self::Handle>;

    /// Attach a row container to the surface.
    fn attach_row(&mut self, handle: &Self::Handle) -> Result<()>;

    /// Detach a row container from the surface. The handle stays reusable.
    fn detach_row(&mut self, handle: &Self::Handle) -> Result<()>;

    /// Position a row container at a vertical offset, expressed as a
    /// surface-level transform rather than document flow.
    fn set_row_offset(&mut self, handle: &Self::Handle, y_px: f64) -> Result<()>;

    /// Set one cell's displayed text.
    fn set_cell_text(&mut self, handle: &Self::Handle, col: usize, text: &str) -> Result<()>;

    /// Blank one cell (used when the data source fails for it).
    fn clear_cell(&mut self, handle: &Self::Handle, col: usize) -> Result<()>;

    /// Read current scroll offset and visible height.
    fn metrics(&self) -> Result<SurfaceMetrics>;

    /// Move the minimal extent marker to `y_px`, forcing the container to
    /// report a scrollable extent at least that large.
    fn set_extent_marker(&mut self, y_px: f64) -> Result<()>;
}
